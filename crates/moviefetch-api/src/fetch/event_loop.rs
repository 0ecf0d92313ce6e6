//! Caller-side delivery queue.
//!
//! Workers never run callbacks themselves: they post a job through a
//! [`LoopHandle`] and the thread that owns the [`EventLoop`] runs it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// A terminal delivery queued for the caller's thread.
pub(crate) type Job = Box<dyn FnOnce() + Send>;

/// Cloneable sender side of an [`EventLoop`].
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct LoopHandle {
    /// Job queue.
    sender: Sender<Job>,
    /// Calls started through this loop whose delivery has not run yet.
    outstanding: Arc<AtomicUsize>,
}

impl LoopHandle {
    /// Registers a started call.
    pub(crate) fn begin(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Queues the terminal delivery of a call registered with [`Self::begin`].
    pub(crate) fn finish(&self, job: Job) {
        if self.sender.send(job).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!("event loop is gone, dropping delivery");
        }
    }
}

/// Single-threaded queue that runs fetch callbacks on the thread driving it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EventLoop {
    receiver: Receiver<Job>,
    handle: LoopHandle,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an empty loop.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            receiver,
            handle: LoopHandle {
                sender,
                outstanding: Arc::new(AtomicUsize::new(0)),
            },
        }
    }

    /// Returns a handle for posting deliveries to this loop.
    #[must_use]
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Number of started calls not yet delivered.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.handle.outstanding.load(Ordering::SeqCst)
    }

    fn dispatch(&self, job: Job) {
        self.handle.outstanding.fetch_sub(1, Ordering::SeqCst);
        job();
    }

    /// Runs every queued delivery without blocking.
    ///
    /// Returns the number of deliveries run.
    pub fn run_pending(&self) -> usize {
        let mut count = 0usize;
        while let Ok(job) = self.receiver.try_recv() {
            self.dispatch(job);
            count = count.saturating_add(1);
        }
        count
    }

    /// Blocks until every outstanding call has been delivered.
    pub fn run(&self) {
        while self.outstanding() > 0 {
            match self.receiver.recv() {
                Ok(job) => self.dispatch(job),
                Err(_) => break,
            }
        }
    }

    /// Like [`Self::run`], giving up after `timeout`.
    ///
    /// Returns `true` if the loop became idle.
    pub fn run_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.outstanding() > 0 {
            let remaining = deadline.map_or(timeout, |d| d.saturating_duration_since(Instant::now()));
            match self.receiver.recv_timeout(remaining) {
                Ok(job) => self.dispatch(job),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return self.outstanding() == 0;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;
    use std::thread;

    use super::*;

    #[test]
    fn test_new_loop_is_idle() {
        // Arrange
        let event_loop = EventLoop::new();

        // Act & Assert
        assert_eq!(event_loop.outstanding(), 0);
        assert_eq!(event_loop.run_pending(), 0);
        event_loop.run();
        assert!(event_loop.run_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_jobs_run_on_loop_thread() {
        // Arrange
        let event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let ran_on = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&ran_on);
        handle.begin();

        // Act
        thread::spawn(move || {
            handle.finish(Box::new(move || {
                *slot.lock().unwrap() = Some(thread::current().id());
            }));
        })
        .join()
        .unwrap();
        event_loop.run();

        // Assert
        assert_eq!(*ran_on.lock().unwrap(), Some(thread::current().id()));
        assert_eq!(event_loop.outstanding(), 0);
    }

    #[test]
    fn test_run_pending_counts_queued_jobs() {
        // Arrange
        let event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let c = Arc::clone(&counter);
            handle.begin();
            handle.finish(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }

        // Act
        let ran = event_loop.run_pending();

        // Assert
        assert_eq!(ran, 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(event_loop.run_pending(), 0);
    }

    #[test]
    fn test_run_timeout_reports_undelivered_call() {
        // Arrange
        let event_loop = EventLoop::new();
        event_loop.handle().begin();

        // Act
        let idle = event_loop.run_timeout(Duration::from_millis(50));

        // Assert
        assert!(!idle);
        assert_eq!(event_loop.outstanding(), 1);
    }

    #[test]
    fn test_finish_after_loop_dropped_does_not_panic() {
        // Arrange
        let event_loop = EventLoop::new();
        let handle = event_loop.handle();
        handle.begin();
        drop(event_loop);

        // Act
        handle.finish(Box::new(|| {}));

        // Assert
        assert_eq!(handle.outstanding.load(Ordering::SeqCst), 0);
    }
}
