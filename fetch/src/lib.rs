//! Resilient fetching for the Triad dashboard.
//!
//! # Architecture
//!
//! The crate is layered leaf-first:
//!
//! - [`transport`] - the network boundary ([`Transport`], implemented over reqwest by [`HttpTransport`])
//! - [`decode`] - the payload boundary ([`Decode`], implemented with serde_json by [`JsonDecoder`])
//! - [`race`] - [`first_settled`], the timeout race combinator
//! - [`retry`] - [`ResilientFetcher`], one logical request with timeout, backoff and classification
//! - [`aggregate`] - [`Aggregator`], three concurrent fetches joined behind a settle-all barrier
//!
//! # Error Handling
//!
//! Nothing in this crate returns `Err` past the fetcher. Every failure path
//! ends in [`FetchOutcome::Failure`] carrying a classified [`FetchError`]:
//!
//! | Condition | Classification |
//! |-----------|----------------|
//! | Non-2xx status | `HttpStatus(code)` |
//! | Body is not valid JSON | `MalformedPayload` |
//! | Deadline elapsed first | `Timeout` |
//! | DNS, connect or body-read failure | `TransportFailure` |
//!
//! Only the final attempt's classification is surfaced.

pub mod aggregate;
pub mod decode;
pub mod race;
pub mod retry;
pub mod transport;

pub use aggregate::Aggregator;
pub use decode::{Decode, DecodeError, JsonDecoder};
pub use race::{Settled, first_settled};
pub use retry::{ResilientFetcher, classify_response};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};

pub use triad_types;
pub(crate) use triad_types::{
    AggregateResult, FetchError, FetchOutcome, FetchPolicy, FetchTarget, LoadMode, ResourceKey,
};

use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_REDIRECTS: usize = 5;

/// Process-wide HTTP client shared by every [`HttpTransport`].
///
/// No request timeout is configured here: deadlines belong to the fetcher's
/// timeout race, which also covers body download and decoding.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("Failed to build configured HTTP client: {e}. Using defaults.");
            reqwest::Client::new()
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .user_agent(concat!("triad/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}
