//! Core domain types for Triad.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod sanitize;
pub use sanitize::sanitize_display_text;

pub mod records;
pub mod settings;
pub mod ui;

pub use records::{Comment, Company, Post, User};
pub use settings::{FetchPolicy, FetchTarget};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Resource Keys
// ============================================================================

/// One of the three logical datasets a dashboard load fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKey {
    Users,
    Posts,
    Comments,
}

impl ResourceKey {
    /// Every key, in the order downstream processing relies on.
    pub const ALL: [ResourceKey; 3] = [Self::Users, Self::Posts, Self::Comments];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Load Mode
// ============================================================================

/// Control-flow style used to drive a load cycle.
///
/// Purely presentational: both modes must yield the same aggregate result,
/// the same counters and the same status report for the same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    #[default]
    Promise,
    Async,
}

impl LoadMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Promise => "promise",
            Self::Async => "async",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Promise => "Promise",
            Self::Async => "Async/Await",
        }
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Promise => Self::Async,
            Self::Async => Self::Promise,
        }
    }

    /// Parse a mode name as written in config files and env vars.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "promise" => Some(Self::Promise),
            "async" | "async/await" => Some(Self::Async),
            _ => None,
        }
    }
}

// ============================================================================
// Fetch Outcomes
// ============================================================================

/// Classified reason a resilient fetch failed.
///
/// Only the final attempt's classification is ever surfaced; retry state
/// belongs to the fetch in flight, not to the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("invalid JSON response")]
    MalformedPayload,
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Settled result of one resource fetch. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Value),
    Failure(FetchError),
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }
}

/// The three settled outcomes of one load cycle.
///
/// Constructed once by the aggregator and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    users: FetchOutcome,
    posts: FetchOutcome,
    comments: FetchOutcome,
}

impl AggregateResult {
    #[must_use]
    pub fn new(users: FetchOutcome, posts: FetchOutcome, comments: FetchOutcome) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    #[must_use]
    pub fn users(&self) -> &FetchOutcome {
        &self.users
    }

    #[must_use]
    pub fn posts(&self) -> &FetchOutcome {
        &self.posts
    }

    #[must_use]
    pub fn comments(&self) -> &FetchOutcome {
        &self.comments
    }

    #[must_use]
    pub fn get(&self, key: ResourceKey) -> &FetchOutcome {
        match key {
            ResourceKey::Users => &self.users,
            ResourceKey::Posts => &self.posts,
            ResourceKey::Comments => &self.comments,
        }
    }

    /// Outcomes in `ResourceKey::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &FetchOutcome)> {
        ResourceKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    #[must_use]
    pub fn counters(&self) -> SessionCounters {
        self.iter()
            .fold(SessionCounters::default(), |mut counters, (_, outcome)| {
                if outcome.is_success() {
                    counters.success_count += 1;
                } else {
                    counters.failure_count += 1;
                }
                counters
            })
    }
}

/// Success/failure tallies of the most recently processed aggregate result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub success_count: u32,
    pub failure_count: u32,
}

// ============================================================================
// Status Reports
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Partial,
    Error,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of reconciling one aggregate result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: Status,
    /// `None` when there is nothing to surface.
    pub error: Option<String>,
    pub at: DateTime<Local>,
}

impl StatusReport {
    /// The error text as shown in the status panel, `-` when absent.
    #[must_use]
    pub fn error_display(&self) -> &str {
        self.error.as_deref().unwrap_or("-")
    }
}
