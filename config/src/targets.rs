//! Endpoint table and fault-injection target resolution.
//!
//! The fetch layer only ever sees a [`FetchTarget`]. Which address a resource
//! key maps to, and whether that address is deliberately broken for testing,
//! is decided here.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use triad_types::{FetchTarget, ResourceKey};

use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Timeout applied to every target when the `timeout` fault is enabled.
pub const FORCED_TIMEOUT: Duration = Duration::from_millis(1);

/// Validated addresses for the three resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
    users: Url,
    posts: Url,
    comments: Url,
}

impl Endpoints {
    /// Build the table from a base URL; each resource lives at `<base>/<key>`.
    pub fn from_base(base: &str) -> Result<Self, ConfigError> {
        Self::with_overrides(base, None, None, None)
    }

    pub(crate) fn with_overrides(
        base: &str,
        users: Option<&str>,
        posts: Option<&str>,
        comments: Option<&str>,
    ) -> Result<Self, ConfigError> {
        parse_url("endpoints.base_url", base)?;
        let base = base.trim().trim_end_matches('/').to_string();

        let pick = |field: &'static str, explicit: Option<&str>, key: ResourceKey| {
            let raw = explicit.map_or_else(|| format!("{base}/{key}"), str::to_string);
            parse_url(field, &raw)
        };

        Ok(Self {
            users: pick("endpoints.users", users, ResourceKey::Users)?,
            posts: pick("endpoints.posts", posts, ResourceKey::Posts)?,
            comments: pick("endpoints.comments", comments, ResourceKey::Comments)?,
            base,
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn url(&self, key: ResourceKey) -> &Url {
        match key {
            ResourceKey::Users => &self.users,
            ResourceKey::Posts => &self.posts,
            ResourceKey::Comments => &self.comments,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        let base = DEFAULT_BASE_URL;
        let parse = |key: ResourceKey| {
            Url::parse(&format!("{base}/{key}")).expect("default endpoints must parse")
        };
        Self {
            base: base.to_string(),
            users: parse(ResourceKey::Users),
            posts: parse(ResourceKey::Posts),
            comments: parse(ResourceKey::Comments),
        }
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
        source,
    })
}

/// Deliberate failure modes for exercising the resilience pipeline.
///
/// ```toml
/// [faults]
/// users_404 = true
/// comments_fail = true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FaultPlan {
    /// Point users at a path that does not exist.
    pub users_404: bool,
    /// Point every resource at the server-error route.
    pub force_500: bool,
    /// Give every target a deadline it cannot meet.
    pub timeout: bool,
    /// Point users at an HTML page instead of JSON.
    pub bad_json: bool,
    /// Point comments at a path that does not exist.
    pub comments_fail: bool,
}

impl FaultPlan {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.users_404 || self.force_500 || self.timeout || self.bad_json || self.comments_fail
    }
}

/// Maps resource keys to concrete fetch targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetResolver {
    endpoints: Endpoints,
    faults: FaultPlan,
}

impl TargetResolver {
    #[must_use]
    pub fn new(endpoints: Endpoints, faults: FaultPlan) -> Self {
        Self { endpoints, faults }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn faults(&self) -> FaultPlan {
        self.faults
    }

    /// Resolve the address for `key`. Fault flags are checked in a fixed
    /// order and the first one that applies to `key` wins.
    #[must_use]
    pub fn resolve(&self, key: ResourceKey) -> FetchTarget {
        let base = self.endpoints.base();
        let url = self.endpoints.url(key).as_str();
        let faults = &self.faults;

        let url = if faults.force_500 {
            format!("{base}/throw500")
        } else if key == ResourceKey::Users && faults.users_404 {
            format!("{url}s")
        } else if key == ResourceKey::Users && faults.bad_json {
            format!("{base}/")
        } else if key == ResourceKey::Comments && faults.comments_fail {
            format!("{url}s")
        } else {
            url.to_string()
        };

        let target = FetchTarget::new(key, url);
        if faults.timeout {
            target.with_timeout(FORCED_TIMEOUT)
        } else {
            target
        }
    }
}
