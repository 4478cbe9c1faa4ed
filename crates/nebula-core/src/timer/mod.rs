mod engine;
mod ticker;

pub use engine::{format_time, Timer, TimerMode, TimerState};
pub use ticker::{next_tick, Ticker};
