//! Interactive timer session.
//!
//! Reads one command per line from stdin while the countdown renders in
//! place. Ticks only exist while the timer runs.

use std::io::Write;
use std::time::Duration;

use nebula_core::timer::{next_tick, Ticker};
use nebula_core::{Event, Nebula, TimerMode};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::Styler;

const HELP: &str = "commands: start (s), pause (p), reset (r), focus (f), short (sb), long (lb), status, help, quit (q)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    Select(TimerMode),
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let cmd = match line.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Self::Start,
            "pause" | "p" => Self::Pause,
            "reset" | "r" => Self::Reset,
            "focus" | "f" => Self::Select(TimerMode::Focus),
            "short" | "sb" => Self::Select(TimerMode::ShortBreak),
            "long" | "lb" => Self::Select(TimerMode::LongBreak),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Create the ticker when the timer starts running and drop it when it stops.
fn sync_ticker(ticker: &mut Option<Ticker>, running: bool, period: Duration) {
    match (running, ticker.is_some()) {
        (true, false) => *ticker = Some(Ticker::every(period)),
        (false, true) => *ticker = None,
        _ => {}
    }
}

fn status_line(app: &Nebula, styler: &Styler) -> String {
    let timer = app.timer();
    let state = if timer.is_running() { "running" } else { "paused" };
    let percent = (timer.progress() * 100.0).round();
    format!(
        "{} {} {:>3}% [{}]",
        styler.accent(timer.mode().label()),
        styler.primary(&timer.display()),
        percent,
        styler.dim(state),
    )
}

fn render(app: &Nebula, styler: &Styler) {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "\r{}   ", status_line(app, styler)).and_then(|()| stdout.flush());
}

fn apply(app: &mut Nebula, command: SessionCommand) -> Option<Event> {
    match command {
        SessionCommand::Start => app.start(),
        SessionCommand::Pause => app.pause(),
        SessionCommand::Reset => app.reset(),
        SessionCommand::Select(mode) => app.select_mode(mode),
        SessionCommand::Status | SessionCommand::Help | SessionCommand::Quit => None,
    }
}

pub async fn run(app: &mut Nebula, styler: &Styler, period: Duration) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Ticker> = None;

    println!("{}", styler.dim(HELP));
    render(app, styler);

    loop {
        sync_ticker(&mut ticker, app.timer().is_running(), period);

        tokio::select! {
            _ = next_tick(&mut ticker) => {
                if let Some(Event::TimerCompleted { mode, .. }) = app.tick() {
                    println!("\r{}", status_line(app, styler));
                    println!("{}", styler.accent(&format!("{} complete.", mode.label())));
                }
                render(app, styler);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    render(app, styler);
                    continue;
                }
                match SessionCommand::parse(&line) {
                    Some(SessionCommand::Quit) => break,
                    Some(SessionCommand::Help) => println!("{}", styler.dim(HELP)),
                    Some(SessionCommand::Status) => {
                        let snapshot = app.timer().snapshot();
                        println!("{}", serde_json::to_string(&snapshot)?);
                    }
                    Some(command) => {
                        if let Some(event) = apply(app, command) {
                            tracing::debug!(?event, "session command applied");
                        }
                    }
                    None => eprintln!("unknown command: {}", line.trim()),
                }
                render(app, styler);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    Ok(())
}
