//! Per-second tick source.
//!
//! A `Ticker` exists only while the timer runs: the owner creates one when
//! the timer enters the running state and drops it when the timer stops,
//! so no interval outlives the countdown it drives.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// Start ticking every `period`. The first tick fires one full period
    /// from now, not immediately.
    pub fn every(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

/// Wait for the next tick of `ticker`, or forever when there is none.
///
/// Lets a `select!` loop keep one branch for ticks whether or not the
/// timer is currently running.
pub async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(t) => t.tick().await,
        None => std::future::pending().await,
    }
}
