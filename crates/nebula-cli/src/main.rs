use clap::{Parser, Subcommand};
use nebula_core::{Config, Nebula};

mod commands;
mod output;
mod session;

use output::{Styler, TerminalBell};

#[derive(Parser)]
#[command(name = "nebula", version, about = "Nebula -- zen focus timer and task list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Focus statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Colour themes
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
}

/// Log to stderr. `NEBULA_LOG` wins over `RUST_LOG`, which wins over the
/// filter in `config.toml`.
fn init_tracing(config: &Config) {
    let directive = std::env::var("NEBULA_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| config.logging.filter.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
}

fn run(cli: Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let styler = Styler::new(config.display.color);
    let mut app = Nebula::open(config, Box::new(styler.clone()), Box::new(TerminalBell))?;

    match cli.command {
        Commands::Timer { action } => commands::timer::run(&mut app, &styler, config, action),
        Commands::Task { action } => commands::task::run(&mut app, &styler, action),
        Commands::Settings { action } => commands::settings::run(&mut app, action),
        Commands::Stats { action } => commands::stats::run(&mut app, action),
        Commands::Theme { action } => commands::theme::run(&mut app, action),
    }
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    if let Err(e) = run(cli, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
