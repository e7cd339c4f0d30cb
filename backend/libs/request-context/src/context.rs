//! Task-local tracking value
//!
//! The value is bound with a `tokio` task-local scope around the request's
//! future, so two requests interleaved on the same worker thread each see
//! their own value. Work handed to `spawn` inherits the spawner's value.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use storefront_common::ids::{generate_id, TRACKING_PREFIX};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Returned by `current_or_untracked` outside of any request
pub const UNTRACKED: &str = "untracked";

tokio::task_local! {
    static TRACKING_ID: TrackingId;
}

/// Opaque per-request correlation value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackingId(Arc<str>);

impl TrackingId {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    /// Fresh `req_`-prefixed value
    pub fn generate() -> Self {
        Self::new(generate_id(TRACKING_PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracking value of the request currently executing, if any
pub fn current() -> Option<TrackingId> {
    TRACKING_ID.try_with(|id| id.clone()).ok()
}

pub fn current_or_untracked() -> String {
    current()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| UNTRACKED.to_string())
}

/// Run `fut` with `id` bound as the current tracking value
pub async fn scope<F>(id: TrackingId, fut: F) -> F::Output
where
    F: Future,
{
    TRACKING_ID.scope(id, fut).await
}

/// Synchronous variant of `scope`
pub fn sync_scope<F, R>(id: TrackingId, f: F) -> R
where
    F: FnOnce() -> R,
{
    TRACKING_ID.sync_scope(id, f)
}

/// Span wrapping one request; its fields show up on every nested log line
pub fn request_span(id: &TrackingId, upstream: Option<&str>) -> tracing::Span {
    let span = tracing::info_span!(
        "request",
        tracking_id = %id,
        upstream = tracing::field::Empty
    );
    if let Some(upstream) = upstream {
        span.record("upstream", upstream);
    }
    span
}

/// `tokio::spawn` that carries the caller's tracking value and span into
/// the new task
pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let span = tracing::Span::current();
    match current() {
        Some(id) => tokio::spawn(TRACKING_ID.scope(id, fut).instrument(span)),
        None => tokio::spawn(fut.instrument(span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn generated_ids_are_prefixed() {
        let id = TrackingId::generate();
        assert!(id.as_str().starts_with("req_"));
        assert_eq!(id.as_str().len(), "req_".len() + 8);
    }

    #[tokio::test]
    async fn absent_outside_any_request() {
        assert!(current().is_none());
        assert_eq!(current_or_untracked(), UNTRACKED);
    }

    #[tokio::test]
    async fn visible_across_await_points() {
        let observed = scope(TrackingId::new("req_async"), async {
            tokio::task::yield_now().await;
            current()
        })
        .await;

        assert_eq!(observed, Some(TrackingId::new("req_async")));
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn interleaved_requests_stay_isolated() {
        let first = scope(TrackingId::new("req_first"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            current_or_untracked()
        });
        let second = scope(TrackingId::new("req_second"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            current_or_untracked()
        });

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a, "req_first");
        assert_eq!(b, "req_second");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn isolated_across_worker_threads() {
        let handles: Vec<_> = (0..32)
            .map(|i| {
                tokio::spawn(scope(TrackingId::new(format!("req_{i}")), async move {
                    tokio::task::yield_now().await;
                    (i, current_or_untracked())
                }))
            })
            .collect();

        for handle in handles {
            let (i, seen) = handle.await.expect("task panicked");
            assert_eq!(seen, format!("req_{i}"));
        }
    }

    #[tokio::test]
    async fn spawned_tasks_inherit_the_value() {
        let seen = scope(TrackingId::new("req_parent"), async {
            spawn(async { current_or_untracked() })
                .await
                .expect("task panicked")
        })
        .await;

        assert_eq!(seen, "req_parent");
    }

    #[tokio::test]
    async fn plain_tokio_spawn_does_not_leak_the_value() {
        let seen = scope(TrackingId::new("req_parent"), async {
            tokio::spawn(async { current() }).await.expect("task panicked")
        })
        .await;

        assert!(seen.is_none());
    }

    #[test]
    fn sync_scope_binds_for_closure_only() {
        let inside = sync_scope(TrackingId::new("req_sync"), current);
        assert_eq!(inside, Some(TrackingId::new("req_sync")));
        assert!(current().is_none());
    }
}
