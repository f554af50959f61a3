//! Settle-all aggregation of the three dashboard resources.
//!
//! Both load modes issue the three fetches concurrently on the calling task
//! and yield only once every one of them has settled. They differ in how the
//! join is spelled, never in what it produces:
//!
//! - [`LoadMode::Promise`] chains a combinator over a joined future
//! - [`LoadMode::Async`] awaits a `join!` block directly

use std::time::Instant;

use futures_util::FutureExt;
use futures_util::future::join3;

use crate::decode::{Decode, JsonDecoder};
use crate::retry::ResilientFetcher;
use crate::transport::Transport;
use crate::{AggregateResult, FetchTarget, LoadMode, ResourceKey};

/// Drives one load cycle: three concurrent [`ResilientFetcher::fetch`] calls
/// joined into an [`AggregateResult`].
#[derive(Debug, Clone)]
pub struct Aggregator<T, D = JsonDecoder> {
    fetcher: ResilientFetcher<T, D>,
}

impl<T: Transport, D: Decode> Aggregator<T, D> {
    #[must_use]
    pub fn new(fetcher: ResilientFetcher<T, D>) -> Self {
        Self { fetcher }
    }

    #[must_use]
    pub fn fetcher(&self) -> &ResilientFetcher<T, D> {
        &self.fetcher
    }

    /// Fetch users, posts and comments concurrently and wait for all three.
    ///
    /// `resolve` picks the concrete target for each key; it is called once
    /// per key, in key order, before any request is issued. No outcome
    /// becomes observable before all three have settled.
    pub async fn load_all<R>(&self, mode: LoadMode, resolve: R) -> AggregateResult
    where
        R: Fn(ResourceKey) -> FetchTarget,
    {
        let [users, posts, comments] = ResourceKey::ALL.map(resolve);
        let started = Instant::now();

        let result = match mode {
            LoadMode::Promise => self.join_chained(&users, &posts, &comments).await,
            LoadMode::Async => self.join_awaited(&users, &posts, &comments).await,
        };

        let counters = result.counters();
        tracing::debug!(
            mode = mode.as_str(),
            succeeded = counters.success_count,
            failed = counters.failure_count,
            elapsed_ms = started.elapsed().as_millis(),
            "All fetches settled"
        );
        result
    }

    async fn join_chained(
        &self,
        users: &FetchTarget,
        posts: &FetchTarget,
        comments: &FetchTarget,
    ) -> AggregateResult {
        join3(
            self.fetcher.fetch(users),
            self.fetcher.fetch(posts),
            self.fetcher.fetch(comments),
        )
        .map(|(users, posts, comments)| AggregateResult::new(users, posts, comments))
        .await
    }

    async fn join_awaited(
        &self,
        users: &FetchTarget,
        posts: &FetchTarget,
        comments: &FetchTarget,
    ) -> AggregateResult {
        let (users, posts, comments) = tokio::join!(
            self.fetcher.fetch(users),
            self.fetcher.fetch(posts),
            self.fetcher.fetch(comments),
        );
        AggregateResult::new(users, posts, comments)
    }
}
