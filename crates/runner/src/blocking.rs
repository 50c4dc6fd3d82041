//! Synchronous stages of an experiment
//!
//! Volume reads, population builds, table allocation and checkpoint writes
//! are blocking. They run on the runtime's blocking pool so the number of
//! experiments in flight is bounded by the dispatcher's permits, not by the
//! number of async worker threads.

use crate::error::{Error, Result};

/// Run `work` on the blocking pool on behalf of `experiment`
pub(crate) async fn run_blocking<T, F>(experiment: &str, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|_| Error::WorkerPanicked(experiment.to_string()))
}
