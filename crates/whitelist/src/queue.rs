//! Process-wide serialized execution of document mutations
//!
//! A single worker task drains a FIFO channel of boxed futures and runs each
//! one to completion before taking the next. Every get-modify-put cycle on
//! the shared document goes through here, so a merge always starts from the
//! document state left by the previous merge.
//!
//! ```no_run
//! # async fn demo() -> whitelist::Result<()> {
//! use whitelist::queue::MutationQueue;
//!
//! let queue = MutationQueue::spawn();
//! let answer = queue.submit(async { Ok(41 + 1) }).await?;
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use futures::{future::BoxFuture, FutureExt};
use std::{future::Future, panic::AssertUnwindSafe};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

type Job = BoxFuture<'static, ()>;

/// Handle to the mutation worker
///
/// Clones share the same worker. The worker exits once every handle is
/// dropped and the queued jobs are drained.
#[derive(Clone)]
pub struct MutationQueue {
    jobs: mpsc::UnboundedSender<Job>,
}

impl MutationQueue {
    /// Start the worker on the current tokio runtime
    pub fn spawn() -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();

        tokio::spawn(async move {
            debug!("Mutation queue worker started");
            while let Some(job) = rx.recv().await {
                job.await;
            }
            debug!("Mutation queue worker stopped");
        });

        Self { jobs }
    }

    /// Queue `task` behind every previously submitted task
    ///
    /// The task is enqueued when this is called, not when the returned future
    /// is first polled, and it runs to completion even if that future is
    /// dropped. The future resolves to the task's own result; a failing or
    /// panicking task does not affect the tasks queued behind it.
    pub fn submit<F, T>(&self, task: F) -> impl Future<Output = Result<T>> + Send + 'static
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let job = async move {
            match AssertUnwindSafe(task).catch_unwind().await {
                Ok(result) => {
                    if result_tx.send(result).is_err() {
                        debug!("Mutation finished after its caller went away");
                    }
                }
                Err(_) => error!("Mutation task panicked"),
            }
        }
        .boxed();

        let enqueued = self.jobs.send(job).map_err(|_| Error::QueueClosed {
            message: "mutation worker is not running".to_string(),
        });

        async move {
            enqueued?;
            result_rx.await.map_err(|_| Error::QueueClosed {
                message: "mutation task aborted before reporting a result".to_string(),
            })?
        }
    }
}
