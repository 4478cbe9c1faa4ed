//! Timer commands for CLI.

use clap::Subcommand;
use nebula_core::{Config, Nebula, TimerMode};

use crate::output::Styler;
use crate::session;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print the timer state as JSON
    Status {
        /// Show a freshly selected mode instead of the default
        #[arg(long)]
        mode: Option<TimerMode>,
    },
    /// Run an interactive session on this terminal
    Run {
        /// Mode to start in: focus, short or long
        #[arg(long)]
        mode: Option<TimerMode>,
    },
}

pub fn run(
    app: &mut Nebula,
    styler: &Styler,
    config: &Config,
    action: TimerAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Status { mode } => {
            if let Some(mode) = mode {
                app.select_mode(mode);
            }
            let snapshot = app.timer().snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::Run { mode } => {
            if let Some(mode) = mode {
                app.select_mode(mode);
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(session::run(app, styler, config.tick_interval()));
            // stdin is read on a blocking thread that would hold up a normal drop
            runtime.shutdown_background();
            result?;
        }
    }
    Ok(())
}
