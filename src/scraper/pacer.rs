use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::scraper::config::{DelayConfig, DelayRange};
use crate::scraper::SessionError;

/// Named pacing bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Short,
    Medium,
    Long,
}

/// Samples jittered pauses so that actions never land on a fixed cadence
#[derive(Debug, Clone)]
pub struct Pacer {
    delays: DelayConfig,
}

impl Pacer {
    pub fn new(delays: DelayConfig) -> Self {
        Self { delays }
    }

    fn range(&self, severity: Severity) -> DelayRange {
        match severity {
            Severity::Short => self.delays.short_ms,
            Severity::Medium => self.delays.medium_ms,
            Severity::Long => self.delays.long_ms,
        }
    }

    /// Uniformly sample a pause for the given severity
    pub fn sample(&self, severity: Severity) -> Duration {
        let range = self.range(severity);
        let (min, max) = (range.min(), range.max());
        if max <= min {
            return min;
        }
        let millis = rand::rng().random_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    /// Sleep for a sampled pause, waking early with an error on cancellation
    pub async fn pause(
        &self,
        severity: Severity,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        let delay = self.sample(severity);
        trace!(?severity, ?delay, "pausing");

        if delay.is_zero() {
            return if cancel.is_cancelled() {
                Err(SessionError::Cancelled)
            } else {
                Ok(())
            };
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = cancel.cancelled() => Err(SessionError::Cancelled),
        }
    }
}
