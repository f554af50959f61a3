//! Resolved configuration types shared across crates.
//!
//! These types represent fully-validated, resolved configuration state.
//! Raw TOML deserialization structs (with `Option` fields) stay in
//! `triad-config`, which resolves them into these types at the parse boundary.

use std::time::Duration;

use crate::ResourceKey;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2500);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(300);

/// Timeout and retry policy applied to every resilient fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Deadline for a single attempt (request, body and decode).
    pub timeout: Duration,
    /// Retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    /// Delay before the first retry; doubles before each later one.
    pub initial_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }
}

impl FetchPolicy {
    /// Delay slept before retry number `step + 1` (`step` 0 is the first retry).
    #[must_use]
    pub fn backoff(&self, step: u32) -> Duration {
        let factor = 1u32.checked_shl(step).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor)
    }
}

/// A concrete address for one resource, produced by the caller's resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub key: ResourceKey,
    pub url: String,
    /// Replaces the policy timeout for this target only.
    pub timeout_override: Option<Duration>,
}

impl FetchTarget {
    #[must_use]
    pub fn new(key: ResourceKey, url: impl Into<String>) -> Self {
        Self {
            key,
            url: url.into(),
            timeout_override: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    #[must_use]
    pub fn timeout(&self, policy: &FetchPolicy) -> Duration {
        self.timeout_override.unwrap_or(policy.timeout)
    }
}
