//! Background work off the tick thread.
//!
//! A fixed set of worker threads drains a `crossbeam-channel` job queue for
//! fire-and-forget work. Paced tasks get a dedicated thread each and run on
//! game time: the owner sends elapsed milliseconds down a channel and the
//! task fires once for every interval boundary crossed. A paused or
//! hand-driven clock therefore paces the task exactly like the kitchen.
//!
//! Every thread holds the sending half of a completion channel; when the
//! thread exits (normally or by unwinding) the channel disconnects, which is
//! what [`TaskPool::shutdown`] waits on under one shared deadline.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task pool has been shut down")]
    ShutDown,
    #[error("failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// How shutdown ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every thread finished and was joined.
    Clean,
    /// These threads missed the deadline and were detached.
    Forced { detached: Vec<String> },
}

struct TaskThread {
    name: String,
    handle: JoinHandle<()>,
    done: Receiver<()>,
}

pub struct TaskPool {
    jobs: Option<Sender<Job>>,
    threads: Vec<TaskThread>,
}

impl std::fmt::Debug for TaskPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("threads", &self.threads.len())
            .field("open", &self.jobs.is_some())
            .finish()
    }
}

impl TaskPool {
    /// Start `workers` job threads (at least one).
    pub fn new(workers: usize) -> Result<Self, TaskError> {
        let (job_tx, job_rx) = unbounded::<Job>();
        let mut pool = Self {
            jobs: Some(job_tx),
            threads: Vec::new(),
        };

        for n in 0..workers.max(1) {
            let name = format!("nimons-worker-{n}");
            let jobs = job_rx.clone();
            pool.spawn_thread(name.clone(), move || {
                while let Ok(job) = jobs.recv() {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!(thread = %name, "background job panicked");
                    }
                }
            })?;
        }
        Ok(pool)
    }

    /// Queue a fire-and-forget job.
    pub fn submit<F>(&self, job: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let jobs = self.jobs.as_ref().ok_or(TaskError::ShutDown)?;
        jobs.send(Box::new(job)).map_err(|_| TaskError::ShutDown)
    }

    /// Run `task` once per `interval_ms` of game time on its own thread.
    ///
    /// Game time arrives on `pace` as elapsed milliseconds. The thread keeps
    /// going until every sender is dropped, and handles whatever was already
    /// sent before it exits. A panic inside one run is logged and the
    /// schedule continues.
    pub fn schedule_paced<F>(
        &mut self,
        name: &str,
        pace: Receiver<u64>,
        interval_ms: u64,
        mut task: F,
    ) -> Result<(), TaskError>
    where
        F: FnMut() + Send + 'static,
    {
        if self.jobs.is_none() {
            return Err(TaskError::ShutDown);
        }
        let interval_ms = interval_ms.max(1);
        let thread_name = name.to_string();
        self.spawn_thread(name.to_string(), move || {
            let mut next_ms = interval_ms;
            for elapsed_ms in pace.iter() {
                while elapsed_ms >= next_ms {
                    if catch_unwind(AssertUnwindSafe(&mut task)).is_err() {
                        error!(thread = %thread_name, "paced task panicked");
                    }
                    next_ms += interval_ms;
                }
            }
            debug!(thread = %thread_name, "paced task stopped");
        })
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.jobs.is_none()
    }

    /// Close the job queue, then wait for every thread until `timeout` has
    /// passed in total. Paced tasks only finish once their pace senders are
    /// dropped. Threads still running at the deadline are detached.
    pub fn shutdown(&mut self, timeout: Duration) -> ShutdownOutcome {
        self.jobs = None;

        let deadline = Instant::now() + timeout;
        let mut detached = Vec::new();
        for thread in self.threads.drain(..) {
            let left = deadline.saturating_duration_since(Instant::now());
            match thread.done.recv_timeout(left) {
                Err(RecvTimeoutError::Timeout) => {
                    warn!(thread = %thread.name, "thread missed shutdown deadline; detaching");
                    detached.push(thread.name);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    if thread.handle.join().is_err() {
                        error!(thread = %thread.name, "thread exited by panic");
                    }
                }
            }
        }

        if detached.is_empty() {
            ShutdownOutcome::Clean
        } else {
            ShutdownOutcome::Forced { detached }
        }
    }

    fn spawn_thread<F>(&mut self, name: String, body: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let (done_tx, done_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _done = done_tx;
                body();
            })
            .map_err(|source| TaskError::Spawn {
                name: name.clone(),
                source,
            })?;
        self.threads.push(TaskThread {
            name,
            handle,
            done: done_rx,
        });
        Ok(())
    }
}

impl Drop for TaskPool {
    /// Dropping without `shutdown` closes the job queue and detaches every
    /// thread.
    fn drop(&mut self) {
        self.jobs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn submitted_jobs_run() {
        let mut pool = TaskPool::new(2).unwrap();
        let (tx, rx) = unbounded();
        for i in 0..10 {
            let tx = tx.clone();
            pool.submit(move || tx.send(i).unwrap()).unwrap();
        }
        let mut got: Vec<i32> = (0..10)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        got.sort();
        assert_eq!(got, (0..10).collect::<Vec<_>>());
        assert_eq!(pool.shutdown(Duration::from_secs(2)), ShutdownOutcome::Clean);
    }

    #[test]
    fn job_panic_does_not_kill_worker() {
        let mut pool = TaskPool::new(1).unwrap();
        pool.submit(|| panic!("job failure")).unwrap();
        let (tx, rx) = unbounded();
        pool.submit(move || tx.send(42).unwrap()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
        assert_eq!(pool.shutdown(Duration::from_secs(2)), ShutdownOutcome::Clean);
    }

    #[test]
    fn paced_task_fires_per_boundary() {
        let mut pool = TaskPool::new(1).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let (pace, rx) = unbounded();
        pool.schedule_paced("ticker", rx, 10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        // 0 and 5 cross nothing, 10 crosses one boundary, 35 crosses two more.
        for elapsed in [0, 5, 10, 10, 35] {
            pace.send(elapsed).unwrap();
        }
        drop(pace);
        assert_eq!(pool.shutdown(Duration::from_secs(2)), ShutdownOutcome::Clean);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn paced_task_survives_a_panic() {
        let mut pool = TaskPool::new(1).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let (pace, rx) = unbounded();
        pool.schedule_paced("flaky", rx, 1, move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first run fails");
            }
        })
        .unwrap();

        pace.send(3).unwrap();
        drop(pace);
        assert_eq!(pool.shutdown(Duration::from_secs(2)), ShutdownOutcome::Clean);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn idle_paced_task_stops_when_pace_closes() {
        let mut pool = TaskPool::new(1).unwrap();
        let (pace, rx) = unbounded::<u64>();
        pool.schedule_paced("idle", rx, 3_600_000, || {}).unwrap();
        drop(pace);
        let start = Instant::now();
        assert_eq!(pool.shutdown(Duration::from_secs(2)), ShutdownOutcome::Clean);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn open_pace_is_detached_at_the_deadline() {
        let mut pool = TaskPool::new(1).unwrap();
        let (pace, rx) = unbounded::<u64>();
        pool.schedule_paced("held", rx, 10, || {}).unwrap();
        match pool.shutdown(Duration::from_millis(50)) {
            ShutdownOutcome::Forced { detached } => {
                assert_eq!(detached, vec!["held".to_string()]);
            }
            other => panic!("expected forced shutdown, got {other:?}"),
        }
        drop(pace);
    }

    #[test]
    fn stuck_job_is_detached() {
        let mut pool = TaskPool::new(1).unwrap();
        let (release_tx, release_rx) = unbounded::<()>();
        pool.submit(move || {
            let _ = release_rx.recv_timeout(Duration::from_secs(10));
        })
        .unwrap();
        // Let the worker pick the job up.
        thread::sleep(Duration::from_millis(20));

        match pool.shutdown(Duration::from_millis(50)) {
            ShutdownOutcome::Forced { detached } => {
                assert_eq!(detached, vec!["nimons-worker-0".to_string()]);
            }
            other => panic!("expected forced shutdown, got {other:?}"),
        }
        drop(release_tx);
    }

    #[test]
    fn submit_after_shutdown_fails() {
        let mut pool = TaskPool::new(1).unwrap();
        pool.shutdown(Duration::from_secs(1));
        assert!(matches!(pool.submit(|| {}), Err(TaskError::ShutDown)));
        assert!(pool.is_shut_down());
    }
}
