//! Task-scoped binding of the run currently being processed.
//!
//! Tool bodies never receive a run id. Telemetry recorded while a future
//! runs inside [`with_run`] is attributed to that run by reading the
//! task-local slot. The binding ends with the future, so a worker task can
//! never carry a stale id into unrelated work.

use std::future::Future;

use crate::domain::foundation::RunId;

tokio::task_local! {
    static CURRENT_RUN: RunId;
}

/// Runs `future` with `run_id` bound for its whole lifetime.
pub async fn with_run<F>(run_id: RunId, future: F) -> F::Output
where
    F: Future,
{
    CURRENT_RUN.scope(run_id, future).await
}

/// Synchronous counterpart of [`with_run`].
pub fn with_run_sync<R>(run_id: RunId, f: impl FnOnce() -> R) -> R {
    CURRENT_RUN.sync_scope(run_id, f)
}

/// Run bound to the calling task, if any.
pub fn current_run() -> Option<RunId> {
    CURRENT_RUN.try_with(|id| *id).ok()
}
