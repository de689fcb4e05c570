use crate::error::ConfigError;
use std::time::Duration;

/// The window a request budget is spread across.
pub const WINDOW_MS: u64 = 60_000;

/// Default number of requests per run.
pub const DEFAULT_BUDGET: u32 = 100;

/// Fixed-budget pacing: `budget` iterations, each padded to at least `WINDOW_MS / budget`
/// milliseconds.
///
/// The interval is whole milliseconds, so a budget of 100 gives 600 ms and a budget of 7 gives
/// 8571 ms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacer {
    budget: u32,
    interval: Duration,
}

impl Pacer {
    pub fn new(budget: u32) -> Result<Self, ConfigError> {
        if budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        Ok(Self {
            budget,
            interval: Duration::from_millis(WINDOW_MS / u64::from(budget)),
        })
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How much longer an iteration that took `elapsed` still has to wait.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.interval
            .checked_sub(elapsed)
            .filter(|rest| !rest.is_zero())
    }

    /// Sleep out the rest of the interval, if any.
    pub async fn pad(&self, elapsed: Duration) {
        if let Some(rest) = self.remaining(elapsed) {
            tokio::time::sleep(rest).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            interval: Duration::from_millis(WINDOW_MS / u64::from(DEFAULT_BUDGET)),
        }
    }
}
