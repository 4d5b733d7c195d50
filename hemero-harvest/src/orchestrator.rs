//! Concurrent fan-out of session runs over a bounded worker pool.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use hemero_common::BrowserTarget;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::outcome::SessionOutcome;
use crate::runner::SessionRunner;

/// Runs one [`SessionRunner`] invocation per configured target, at most
/// `max_parallel` at a time, and collects every outcome.
///
/// Isolation contract: a failing (even panicking) session is reflected only
/// in its own [`SessionOutcome`]; siblings run to completion regardless.
pub struct Orchestrator {
    runner: Arc<SessionRunner>,
    max_parallel: usize,
}

impl Orchestrator {
    pub fn new(runner: SessionRunner, max_parallel: usize) -> Self {
        Self {
            runner: Arc::new(runner),
            max_parallel: max_parallel.max(1),
        }
    }

    /// Dispatch every target and wait for the pool to drain.
    ///
    /// Returns exactly one outcome per target, in input order; completion
    /// order across sessions is unspecified.
    pub async fn run_all(&self, targets: &[BrowserTarget]) -> Vec<SessionOutcome> {
        info!(
            target: "harvest.pool",
            sessions = targets.len(),
            max_parallel = self.max_parallel,
            "pool.start"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut dispatched = Vec::with_capacity(targets.len());
        let mut handles = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            let config_id = index + 1;
            // FIFO permits keep dispatch in input order once the pool has room.
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let runner = Arc::clone(&self.runner);
            let target = target.clone();
            dispatched.push((config_id, target.label(), Instant::now()));
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                runner.run(config_id, &target).await
            }));
        }

        let joined = join_all(handles).await;

        let mut outcomes = Vec::with_capacity(joined.len());
        for ((config_id, label, started), join_result) in dispatched.into_iter().zip(joined) {
            match join_result {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    // A panic inside a session never reaches the siblings;
                    // it degrades to a failure outcome here.
                    error!(
                        target: "harvest.pool",
                        config_id,
                        error = %join_error,
                        "session.task_panicked"
                    );
                    outcomes.push(SessionOutcome::failure(
                        config_id,
                        label,
                        format!("session task panicked: {join_error}"),
                        started.elapsed(),
                    ));
                }
            }
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            target: "harvest.pool",
            sessions = outcomes.len(),
            succeeded,
            failed = outcomes.len() - succeeded,
            "pool.drained"
        );

        outcomes
    }
}
