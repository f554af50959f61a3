//! One logical request with a per-attempt deadline and exponential backoff.
//!
//! # Retry Policy
//!
//! - Attempts: `max_retries + 1`
//! - Delay before retry `k` (1-based): `initial_backoff * 2^(k-1)`, no jitter
//! - Every failure class is retried: HTTP status, timeout, malformed payload, transport
//! - The deadline covers the whole attempt (headers, body, decode)
//!
//! Only the final attempt's error is surfaced. Earlier attempts are logged at
//! debug level and forgotten.

use std::time::Duration;

use serde_json::Value;

use crate::decode::{Decode, JsonDecoder};
use crate::race::{Settled, first_settled};
use crate::transport::{RawResponse, Transport};
use crate::{FetchError, FetchOutcome, FetchPolicy, FetchTarget};

/// Classify a completed response: non-2xx first, then decoding.
pub fn classify_response<D: Decode + ?Sized>(
    response: &RawResponse,
    decoder: &D,
) -> Result<Value, FetchError> {
    if !response.is_success() {
        return Err(FetchError::HttpStatus(response.status));
    }
    decoder
        .decode(&response.body)
        .map_err(|_| FetchError::MalformedPayload)
}

/// Fetches a single [`FetchTarget`] under a [`FetchPolicy`].
///
/// Holds no per-request state, so one fetcher serves any number of
/// concurrent fetches.
#[derive(Debug, Clone)]
pub struct ResilientFetcher<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
    policy: FetchPolicy,
}

impl<T: Transport> ResilientFetcher<T> {
    #[must_use]
    pub fn new(transport: T, policy: FetchPolicy) -> Self {
        Self::with_decoder(transport, JsonDecoder, policy)
    }
}

impl<T: Transport, D: Decode> ResilientFetcher<T, D> {
    #[must_use]
    pub fn with_decoder(transport: T, decoder: D, policy: FetchPolicy) -> Self {
        Self {
            transport,
            decoder,
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run attempts until one succeeds or the retry budget is spent.
    ///
    /// Never fails: every path ends in a settled [`FetchOutcome`].
    pub async fn fetch(&self, target: &FetchTarget) -> FetchOutcome {
        let timeout = target.timeout(&self.policy);

        // Attempts 0 through max_retries-1 may be followed by a retry.
        for step in 0..self.policy.max_retries {
            match self.attempt(target, timeout).await {
                Ok(payload) => return FetchOutcome::Success(payload),
                Err(error) => {
                    let delay = self.policy.backoff(step);
                    tracing::debug!(
                        resource = %target.key,
                        error = %error,
                        retry_count = step + 1,
                        delay_ms = delay.as_millis(),
                        "Retrying fetch after failure"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        // Final attempt: its classification is the one surfaced.
        match self.attempt(target, timeout).await {
            Ok(payload) => FetchOutcome::Success(payload),
            Err(error) => {
                tracing::debug!(
                    resource = %target.key,
                    error = %error,
                    attempts = self.policy.max_retries + 1,
                    "Fetch failed after exhausting retries"
                );
                FetchOutcome::Failure(error)
            }
        }
    }

    async fn attempt(&self, target: &FetchTarget, timeout: Duration) -> Result<Value, FetchError> {
        let request = async {
            let response = self
                .transport
                .issue(&target.url)
                .await
                .map_err(|e| FetchError::TransportFailure(e.to_string()))?;
            classify_response(&response, &self.decoder)
        };

        match first_settled(request, tokio::time::sleep(timeout)).await {
            Settled::First(result) => result,
            Settled::Second(()) => Err(FetchError::Timeout),
        }
    }
}
