use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::catalog::traits::CatalogSource;
use crate::catalog::Catalog;
use crate::error::LoadError;

/// Bounded exponential backoff for catalog loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Wait before attempt `attempt + 1`, given `attempt` failures so far
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(20);
        let ms = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Load the catalog, retrying transient failures up to the policy's limit
///
/// Permanent failures (malformed JSON, duplicate ids, client errors) are
/// returned immediately.
pub async fn load_with_retry(
    source: &dyn CatalogSource,
    policy: &RetryPolicy,
) -> Result<Catalog, LoadError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match source.load().await {
            Ok(catalog) => return Ok(catalog),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) if attempt >= max_attempts => {
                warn!(
                    source = source.source_name(),
                    attempts = attempt,
                    error = %err,
                    "giving up on catalog"
                );
                return Err(LoadError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                debug!(
                    source = source.source_name(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "catalog load failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
