//! Migration configuration

use std::time::Duration;

/// Saturation point of the polling backoff, in poll units
pub const DEFAULT_WAIT_SECONDS: u32 = 15;

/// How the controller answers the host's lifecycle calls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleMode {
    /// `on_event` polls until the migration is done; `is_complete` passes the
    /// event through unchanged
    #[default]
    Blocking,
    /// `on_event` and `is_complete` never sleep. Progress is carried in the
    /// event's `data` and advanced on every `is_complete` call.
    Resumable,
}

/// Configuration for index migrations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Backoff saturates at this many poll units
    ///
    /// Default: 15
    pub wait_seconds: u32,

    /// Length of one backoff unit
    ///
    /// Default: 1 second. Tests shrink it to keep polling fast.
    pub poll_unit: Duration,

    pub mode: LifecycleMode,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            wait_seconds: DEFAULT_WAIT_SECONDS,
            poll_unit: Duration::from_secs(1),
            mode: LifecycleMode::Blocking,
        }
    }
}

impl MigrationConfig {
    pub fn resumable() -> Self {
        Self {
            mode: LifecycleMode::Resumable,
            ..Self::default()
        }
    }

    pub fn with_poll_unit(mut self, poll_unit: Duration) -> Self {
        self.poll_unit = poll_unit;
        self
    }

    /// Delay before the poll following `attempt` failed checks
    pub fn poll_delay(&self, attempt: u32) -> Duration {
        let units = backoff_wait(attempt, self.wait_seconds);
        self.poll_unit.saturating_mul(units)
    }
}

/// `floor(wait ^ (min(attempt, wait) / wait))`
///
/// Starts at 1 and grows exponentially until it saturates at `wait_seconds`
/// once `attempt` reaches `wait_seconds`.
pub fn backoff_wait(attempt: u32, wait_seconds: u32) -> u32 {
    if wait_seconds == 0 {
        return 0;
    }
    let wait = f64::from(wait_seconds);
    let exponent = f64::from(attempt.min(wait_seconds)) / wait;
    wait.powf(exponent).floor() as u32
}
