//! Wall-clock bound for a whole run

use crate::error::{ResolverError, Result};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            limit,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.limit
    }

    /// Fail with [`ResolverError::Timeout`] once the limit has passed.
    pub fn check(&self, phase: &str) -> Result<()> {
        if self.is_expired() {
            return Err(ResolverError::Timeout {
                limit: self.limit,
                phase: phase.to_string(),
            });
        }
        Ok(())
    }
}
