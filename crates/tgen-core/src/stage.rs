//! Bounded worker stage
//!
//! A stage is one dispatcher task pulling items off a bounded queue and
//! spawning one worker per item, with at most `parallelism` workers alive.
//! The dispatcher stops pulling while saturated, so a full queue blocks the
//! producer upstream.
//!
//! Completion flows downstream: once the input queue is closed and every
//! worker has finished, the handler (and the senders it captured) is dropped,
//! which closes the next stage's queue.

use crate::error::{GeneratorError, GeneratorResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};

/// Drive a stage until its input closes and all workers finish
///
/// `handler` runs on the dispatcher for every item, in queue order, and
/// returns the worker future to spawn. Returns the number of items dispatched.
///
/// # Errors
/// `GeneratorError::Stage` if a worker panicked. Remaining workers still run to
/// completion first.
pub(crate) async fn run_stage<I, F, Fut>(
    name: &'static str,
    mut input: mpsc::Receiver<I>,
    parallelism: usize,
    mut handler: F,
) -> GeneratorResult<usize>
where
    I: Send + 'static,
    F: FnMut(I) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    let limiter = Arc::new(Semaphore::new(parallelism));
    let mut workers = JoinSet::new();
    let mut dispatched = 0usize;
    let mut panicked: Option<String> = None;

    while let Some(item) = input.recv().await {
        let permit = Arc::clone(&limiter)
            .acquire_owned()
            .await
            .map_err(|e| GeneratorError::stage(name, e.to_string()))?;

        let worker = handler(item);
        workers.spawn(async move {
            worker.await;
            drop(permit);
        });
        dispatched += 1;

        while let Some(joined) = workers.try_join_next() {
            note_panic(name, joined, &mut panicked);
        }
    }

    drop(handler);

    while let Some(joined) = workers.join_next().await {
        note_panic(name, joined, &mut panicked);
    }

    tracing::debug!(stage = name, dispatched, "stage drained");

    match panicked {
        Some(message) => Err(GeneratorError::stage(name, message)),
        None => Ok(dispatched),
    }
}

fn note_panic(name: &'static str, joined: Result<(), JoinError>, panicked: &mut Option<String>) {
    if let Err(e) = joined {
        tracing::error!(stage = name, error = %e, "worker panicked");
        panicked.get_or_insert_with(|| e.to_string());
    }
}
