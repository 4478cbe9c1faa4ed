pub mod settings;
pub mod stats;
pub mod task;
pub mod theme;
pub mod timer;
