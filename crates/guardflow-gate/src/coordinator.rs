//! Change-token coordination
//!
//! Serializes token-consuming exchanges per region, fetches a fresh token for
//! every attempt, and refetches on token-conflict failures until the overall
//! budget elapses. Token-fetch time counts against the same absolute deadline
//! as the mutating call, so total latency stays bounded even when conflicts
//! keep resolving late.

use crate::classify::is_retryable;
use crate::error::{ApiError, GateError, Result};
use crate::registry::RegionRegistry;
use crate::retry::{BackoffConfig, retry_until};
use crate::source::ChangeTokenSource;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Overall budget for one token-consuming exchange (milliseconds),
    /// covering token fetches and the mutating call together
    #[serde(default = "default_exchange_timeout")]
    pub exchange_timeout_ms: u64,

    /// Codes meaning the token went stale, was already consumed, or a change
    /// is still propagating; the exchange refetches a token and retries
    #[serde(default)]
    pub conflict_codes: Vec<String>,

    /// Codes retryable while issuing a token
    #[serde(default)]
    pub throttle_codes: Vec<String>,

    /// Delay policy between exchange attempts and token-fetch retries
    #[serde(default)]
    pub backoff: BackoffConfig,
}

fn default_exchange_timeout() -> u64 {
    900_000 // 15 minutes, the service's worst observed propagation window
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            exchange_timeout_ms: default_exchange_timeout(),
            conflict_codes: Vec::new(),
            throttle_codes: Vec::new(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Coordinates token-consuming exchanges against the target service.
///
/// One coordinator per token source; share it via [`Arc`]. The region registry
/// is passed in explicitly so callers control its scope.
pub struct TokenCoordinator<S> {
    source: Arc<S>,
    registry: RegionRegistry,
    config: CoordinatorConfig,
}

impl<S: ChangeTokenSource> TokenCoordinator<S> {
    pub fn new(source: Arc<S>, registry: RegionRegistry, config: CoordinatorConfig) -> Self {
        Self {
            source,
            registry,
            config,
        }
    }

    /// Run `operation` with a fresh change token, retrying the whole exchange
    /// on token-conflict failures.
    ///
    /// Holds the region lock for the full duration of the call: within a
    /// region, exchange N completes before exchange N+1 begins. Other regions
    /// proceed in parallel. Every invocation of `operation` receives a token
    /// obtained after the start of that attempt; a token is never reused.
    pub async fn retry_with_token<T, F, Fut>(&self, region: &str, mut operation: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = std::result::Result<T, ApiError>>,
    {
        let lock = self.registry.lock_for(region);
        let _guard = lock.lock().await;

        let budget = Duration::from_millis(self.config.exchange_timeout_ms);
        let deadline = Instant::now() + budget;
        let mut attempt: u32 = 0;

        loop {
            let token = self.fresh_token(deadline).await?;
            tracing::debug!(region, attempt, "submitting change with fresh token");

            match operation(token).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retryable(err.code(), &self.config.conflict_codes) {
                        return Err(GateError::Api(err));
                    }

                    let now = Instant::now();
                    if now >= deadline {
                        return Err(GateError::DeadlineExceeded {
                            budget,
                            attempts: attempt + 1,
                            last: err,
                        });
                    }

                    let delay = self.config.backoff.delay_for_attempt(attempt).min(deadline - now);
                    tracing::warn!(
                        region,
                        code = err.code(),
                        delay_ms = delay.as_millis() as u64,
                        "change token conflict, refetching token"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Fetch a brand-new token, retrying throttled issuance within whatever is
    /// left of the exchange budget.
    async fn fresh_token(&self, deadline: Instant) -> Result<String> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        retry_until(
            remaining,
            &self.config.backoff,
            || self.source.issue_change_token(),
            &self.config.throttle_codes,
        )
        .await
    }
}
