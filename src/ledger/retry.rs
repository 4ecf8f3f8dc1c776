// Rate limiting and retry for outbound ledger calls.
// The spreadsheet API meters requests per user; every call goes through a
// governor quota gate and transient 429s are retried on a bounded schedule.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use rand::Rng;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::ledger::errors::LedgerError;
use crate::ledger::traits::{LedgerOps, RowId};

/// Bounded backoff schedule for transient ledger failures: one immediate
/// attempt, then a retry after each listed delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub backoff: Vec<Duration>,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_millis(2500),
                Duration::from_secs(5),
            ],
            jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(backoff_ms: &[u64], jitter_ms: u64) -> Self {
        Self {
            backoff: backoff_ms.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            jitter: Duration::from_millis(jitter_ms),
        }
    }

    fn max_attempts(&self) -> usize {
        self.backoff.len() + 1
    }
}

/// Decorator adding quota gating and retry-on-rate-limit to any
/// [`LedgerOps`] implementation. Non-transient errors propagate immediately.
#[derive(Debug)]
pub struct RetryingLedger<L> {
    inner: L,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    policy: RetryPolicy,
}

impl<L: LedgerOps> RetryingLedger<L> {
    /// Wrap `inner` with the default quota (1 request/second, bursts of 10)
    /// and the default backoff schedule.
    pub fn new(inner: L) -> Self {
        Self::with_quota(inner, 1, 10)
    }

    /// The spreadsheet API allows 60 requests per minute per user; the
    /// defaults stay conservative and burst-friendly.
    pub fn with_quota(inner: L, requests_per_second: u32, burst_capacity: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_capacity).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            inner,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn sleep_jitter(&self) -> Duration {
        let cap = self.policy.jitter.as_millis() as u64;
        if cap == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=cap))
    }

    /// Execute one ledger call with quota gating and the backoff schedule.
    async fn execute_with_retry<'a, T, F>(
        &'a self,
        operation: &str,
        call: F,
    ) -> Result<T, LedgerError>
    where
        T: Send,
        F: Fn() -> Pin<Box<dyn Future<Output = Result<T, LedgerError>> + Send + 'a>>
            + Send
            + Sync,
    {
        let operation_id = uuid::Uuid::new_v4();
        let mut attempt = 0usize;

        loop {
            if self.policy.jitter > Duration::ZERO {
                self.rate_limiter
                    .until_ready_with_jitter(Jitter::up_to(self.policy.jitter))
                    .await;
            } else {
                self.rate_limiter.until_ready().await;
            }

            match call().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation,
                            operation_id = %operation_id,
                            attempts = attempt + 1,
                            "ledger call recovered after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt + 1 < self.policy.max_attempts() => {
                    let delay = self.policy.backoff[attempt] + self.sleep_jitter();
                    warn!(
                        operation,
                        operation_id = %operation_id,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "ledger rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        operation,
                        operation_id = %operation_id,
                        attempts = attempt + 1,
                        error = %err,
                        "ledger call failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl<L: LedgerOps> LedgerOps for RetryingLedger<L> {
    async fn column_values(&self, column: u32) -> Result<Vec<String>, LedgerError> {
        self.execute_with_retry("column_values", || Box::pin(self.inner.column_values(column)))
            .await
    }

    async fn read_field(&self, row: RowId, column: u32) -> Result<Option<String>, LedgerError> {
        self.execute_with_retry("read_field", || Box::pin(self.inner.read_field(row, column)))
            .await
    }

    async fn write_field(
        &self,
        row: RowId,
        column: u32,
        value: &str,
    ) -> Result<(), LedgerError> {
        self.execute_with_retry("write_field", || {
            Box::pin(self.inner.write_field(row, column, value))
        })
        .await
    }

    async fn append_row(&self, values: &[String]) -> Result<RowId, LedgerError> {
        self.execute_with_retry("append_row", || Box::pin(self.inner.append_row(values)))
            .await
    }

    async fn insert_row_after(&self, row: RowId) -> Result<RowId, LedgerError> {
        self.execute_with_retry("insert_row_after", || {
            Box::pin(self.inner.insert_row_after(row))
        })
        .await
    }

    async fn delete_row(&self, row: RowId) -> Result<(), LedgerError> {
        self.execute_with_retry("delete_row", || Box::pin(self.inner.delete_row(row)))
            .await
    }
}
