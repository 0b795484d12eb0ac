// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking-pool helper that keeps the caller's log context

use tokio::task::JoinError;

/// Run `f` on tokio's blocking pool under the caller's dispatcher and span
///
/// Pool threads do not inherit a thread-scoped dispatcher, so without this
/// events from blocking adapters would bypass a worker's own log sink.
pub(crate) async fn spawn_blocking_in_context<F, R>(f: F) -> Result<R, JoinError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let dispatch = tracing::dispatcher::get_default(|current| current.clone());
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        tracing::dispatcher::with_default(&dispatch, || span.in_scope(f))
    })
    .await
}

#[cfg(test)]
#[path = "blocking_tests.rs"]
mod tests;
