//! Rate-limited fetch with bounded retries.
//!
//! Every attempt passes through the shared [`RateGate`]. Outcomes are
//! handled as follows:
//!
//! | outcome            | retried | delay before retry                 | when exhausted            |
//! |--------------------|---------|------------------------------------|---------------------------|
//! | transport failure  | yes     | `min_request_delay * 2^attempt`    | transport error unchanged |
//! | 429                | yes     | `rate_limit_delay` (fixed)         | classified `rate_limited` |
//! | 5xx                | yes     | `min_request_delay * 2^attempt`    | classified `server_error` |
//! | other non-2xx      | no      |                                    | classified error          |
//! | 2xx, bad body      | no      |                                    | parse error               |
//!
//! `max_retries` counts retries beyond the first attempt, so a persistent
//! failure costs `max_retries + 1` requests.

use super::error::{ClassifiedError, FetchError};
use super::rate_gate::{RateGate, MIN_REQUEST_DELAY};
use super::transport::{FetchRequest, HttpTransport, Transport};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Wait after a 429 before trying again
pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(2000);

/// Retries allowed after the first attempt
pub const MAX_RETRIES: u32 = 3;

/// Delays and retry budget for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Base unit for exponential backoff
    pub min_request_delay: Duration,
    /// Fixed wait after a 429
    pub rate_limit_delay: Duration,
    /// Retries beyond the first attempt
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_request_delay: MIN_REQUEST_DELAY,
            rate_limit_delay: RATE_LIMIT_DELAY,
            max_retries: MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying attempt `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.min_request_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Issues requests through the rate gate and retries transient failures
pub struct Fetcher<T = HttpTransport> {
    transport: T,
    gate: Arc<RateGate>,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher sharing the given gate
    pub fn new(transport: T, gate: Arc<RateGate>) -> Self {
        Self {
            transport,
            gate,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Fetch `request` and parse the successful body as `P`
    pub async fn fetch_with_retry<P: DeserializeOwned>(
        &self,
        request: &FetchRequest,
    ) -> Result<P, FetchError> {
        let url = request.url.as_str();
        let mut retries_remaining = self.policy.max_retries;

        loop {
            let attempt = self.policy.max_retries - retries_remaining;

            self.gate.acquire().await;

            debug!(url = %url, attempt = attempt + 1, "Making API request");

            let delay = match self.transport.send(request).await {
                Ok(response) if response.status.is_success() => {
                    return match serde_json::from_slice::<P>(&response.body) {
                        Ok(data) => {
                            debug!(url = %url, "Request successful");
                            Ok(data)
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "Failed to parse response");
                            Err(FetchError::Parse(e))
                        }
                    };
                }
                Ok(response) => {
                    let status = response.status;
                    let retry_delay = if status == StatusCode::TOO_MANY_REQUESTS {
                        Some(self.policy.rate_limit_delay)
                    } else if status.is_server_error() {
                        Some(self.policy.backoff(attempt))
                    } else {
                        None
                    };

                    match retry_delay {
                        Some(delay) if retries_remaining > 0 => {
                            warn!(
                                url = %url,
                                status = status.as_u16(),
                                delay_ms = delay.as_millis() as u64,
                                retries_remaining,
                                "Retryable response, retrying after delay"
                            );
                            delay
                        }
                        _ => {
                            let error = ClassifiedError::from_response(status, &response.body);
                            warn!(
                                url = %url,
                                status = error.status,
                                kind = %error.kind,
                                message = %error.message,
                                "Request failed"
                            );
                            return Err(FetchError::Api(error));
                        }
                    }
                }
                Err(e) => {
                    if retries_remaining > 0 {
                        let delay = self.policy.backoff(attempt);
                        warn!(
                            url = %url,
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            retries_remaining,
                            "Request error, retrying after delay"
                        );
                        delay
                    } else {
                        warn!(
                            url = %url,
                            error = %e,
                            attempts = attempt + 1,
                            "Request failed after all retries"
                        );
                        return Err(FetchError::Transport(e));
                    }
                }
            };

            sleep(delay).await;
            retries_remaining -= 1;
        }
    }
}
