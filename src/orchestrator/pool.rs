//! Fixed-size worker pool with an in-flight counter for bounded draining.

use crate::errors::OrchestratorError;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Decrements the in-flight count when the job finishes, even by panic.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    in_flight: Arc<AtomicUsize>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self, OrchestratorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("testmap-worker-{i}"))
            .panic_handler(|payload| {
                tracing::error!("worker panicked: {}", panic_message(payload.as_ref()));
            })
            .build()?;
        Ok(Self {
            pool,
            in_flight: Arc::new(AtomicUsize::new(0)),
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs submitted and not yet finished, queued ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = InFlightGuard::new(Arc::clone(&self.in_flight));
        self.pool.spawn(move || {
            let _guard = guard;
            job();
        });
    }

    /// Wait up to `grace` for every job to finish. Returns whether it did.
    pub fn drain(&self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;
        loop {
            if self.in_flight() == 0 {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep(DRAIN_POLL_INTERVAL.min(deadline - now));
        }
    }
}
