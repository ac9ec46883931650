use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::warn;

/// Background tasks owned by a long-lived container.
///
/// Fire-and-forget work is spawned here instead of onto a caller's stack
/// frame, so it keeps running after the caller returns. Finished tasks are
/// reaped on every spawn. Dropping the set aborts whatever is still running.
///
/// Waiting never takes the tasks away from the set: a dropped or cancelled
/// `wait_idle` leaves every task running, and any number of callers may
/// wait at once.
#[derive(Default)]
pub struct TaskSet {
    tasks: Mutex<JoinSet<()>>,
    idle: Arc<Idle>,
}

#[derive(Default)]
struct Idle {
    pending: AtomicUsize,
    notify: Notify,
}

/// Counts one task as outstanding until dropped, even when the task
/// panics or is aborted.
struct Pending(Arc<Idle>);

impl Pending {
    fn enter(idle: &Arc<Idle>) -> Self {
        idle.pending.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(idle))
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        if self.0.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.notify.notify_waiters();
        }
    }
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task onto the current tokio runtime.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pending = Pending::enter(&self.idle);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(done) = tasks.try_join_next() {
            log_panic(done);
        }
        tasks.spawn(async move {
            let _pending = pending;
            fut.await;
        });
    }

    /// Wait until every task, including ones spawned while waiting, is done.
    pub async fn wait_idle(&self) {
        loop {
            let mut idle = pin!(self.idle.notify.notified());
            // Register before checking, so a wake-up between the two is not missed.
            idle.as_mut().enable();
            if self.idle.pending.load(Ordering::SeqCst) == 0 {
                break;
            }
            idle.await;
        }
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(done) = tasks.try_join_next() {
            log_panic(done);
        }
    }
}

fn log_panic(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            warn!("background task panicked: {e}");
        }
    }
}
