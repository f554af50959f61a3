//! First-settled-wins combinator.

use std::future::Future;
use std::pin::pin;

use futures_util::future::{Either, select};

/// Which side of a [`first_settled`] race finished first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled<A, B> {
    First(A),
    Second(B),
}

/// Run `first` and `second` concurrently and return whichever settles first.
///
/// The losing future is dropped before this returns, so its eventual result
/// can never be observed. Dropping a reqwest future cancels its I/O. When both
/// are ready on the same poll, `first` wins.
pub async fn first_settled<A, B>(first: A, second: B) -> Settled<A::Output, B::Output>
where
    A: Future,
    B: Future,
{
    let first = pin!(first);
    let second = pin!(second);

    match select(first, second).await {
        Either::Left((value, loser)) => {
            drop(loser);
            Settled::First(value)
        }
        Either::Right((value, loser)) => {
            drop(loser);
            Settled::Second(value)
        }
    }
}
