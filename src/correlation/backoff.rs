//! Exponential backoff schedule for store polling

use std::time::Duration;

use crate::config::CorrelationConfig;

/// Exponent beyond which every delay is already capped
const MAX_EXPONENT: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&CorrelationConfig::default())
    }
}

impl BackoffPolicy {
    pub fn from_config(config: &CorrelationConfig) -> Self {
        Self {
            initial_delay: config.initial_poll_interval(),
            max_delay: config.max_poll_interval(),
            multiplier: config.backoff_multiplier,
            jitter_factor: config.jitter_factor,
        }
    }

    /// Delay before the poll following miss number `attempt` (1-based)
    ///
    /// `initial * multiplier^(attempt - 1)`, stretched by up to
    /// `jitter_factor`, never above `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT) as i32;
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        let jittered = if self.jitter_factor > 0.0 {
            base * (1.0 + fastrand::f64() * self.jitter_factor)
        } else {
            base
        };

        // f64::min ignores NaN, so a degenerate schedule falls back to the cap
        Duration::from_secs_f64(jittered.min(self.max_delay.as_secs_f64()).max(0.0))
    }

    /// Like [`delay_for`](Self::delay_for), but never past `remaining`
    pub fn delay_within(&self, attempt: u32, remaining: Duration) -> Duration {
        self.delay_for(attempt).min(remaining)
    }
}
