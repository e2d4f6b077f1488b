use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single-thread task queue for frame analysis and blocking device calls.
///
/// Jobs run in submission order on one dedicated worker thread, so frame
/// analysis is serialized: the next job cannot start until the previous one
/// returned (and released its frame). Cloning yields another handle to the
/// same worker.
///
/// `shutdown` runs every job already queued, then joins the worker.
#[derive(Clone)]
pub struct CameraExecutor {
    inner: Arc<Inner>,
}

struct Inner {
    tx: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CameraExecutor {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("camera-worker".into())
            .spawn(move || {
                for job in rx {
                    job();
                }
            })
            .expect("failed to spawn camera worker thread");

        Self {
            inner: Arc::new(Inner {
                tx: Mutex::new(Some(tx)),
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    /// Queue a job. Jobs submitted after `shutdown` are dropped with a
    /// warning.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self.inner.tx.lock().as_ref() {
            Some(tx) => {
                if tx.send(Box::new(job)).is_err() {
                    log::warn!("camera worker exited; job dropped");
                }
            }
            None => log::warn!("camera executor is shut down; job dropped"),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.tx.lock().is_none()
    }

    /// Stop accepting jobs, drain everything already queued, and join the
    /// worker. Idempotent; later calls return immediately.
    pub fn shutdown(&self) {
        self.inner.tx.lock().take();

        let worker = self.inner.worker.lock().take();
        if let Some(worker) = worker {
            if worker.thread().id() == thread::current().id() {
                log::warn!("executor shutdown requested from its own worker; skipping join");
                return;
            }
            let _ = worker.join();
        }
    }
}
