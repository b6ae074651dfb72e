use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

const WORKER_THREAD_PREFIX: &str = "picnote-decode";
const DEFAULT_WORKERS: usize = 1;
const DEFAULT_QUEUE_CAPACITY: usize = 4;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("task queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
    #[error("task scheduler has shut down")]
    Shutdown,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum TaskOutcome<T> {
    Completed(T),
    Cancelled,
    Panicked,
}

#[derive(Debug)]
pub struct TaskCompletion<T> {
    pub task_id: TaskId,
    pub outcome: TaskOutcome<T>,
}

/// Caller-side view of a scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Prevents the task from running if a worker has not picked it up yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

type Work<T> = Box<dyn FnOnce() -> T + Send + 'static>;

struct Job<T> {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
    work: Work<T>,
}

/// Fixed pool of worker threads fed by a bounded queue.
///
/// Results come back over a channel that the owning (UI) thread drains with
/// [`TaskScheduler::try_completion`]; nothing is ever delivered on a worker.
pub struct TaskScheduler<T: Send + 'static> {
    jobs: Option<SyncSender<Job<T>>>,
    completions: Receiver<TaskCompletion<T>>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
    next_id: u64,
}

impl<T: Send + 'static> TaskScheduler<T> {
    pub fn new(config: SchedulerConfig) -> ScheduleResult<Self> {
        let worker_count = config.workers.max(1);
        let queue_capacity = config.queue_capacity.max(1);
        let (job_tx, job_rx) = mpsc::sync_channel::<Job<T>>(queue_capacity);
        let (done_tx, done_rx) = mpsc::channel::<TaskCompletion<T>>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let worker = std::thread::Builder::new()
                .name(format!("{WORKER_THREAD_PREFIX}-{index}"))
                .spawn(move || worker_loop(job_rx, done_tx))?;
            workers.push(worker);
        }
        tracing::debug!(worker_count, queue_capacity, "task scheduler started");

        Ok(Self {
            jobs: Some(job_tx),
            completions: done_rx,
            workers,
            queue_capacity,
            next_id: 0,
        })
    }

    pub fn submit<W>(&mut self, work: W) -> ScheduleResult<TaskHandle>
    where
        W: FnOnce() -> T + Send + 'static,
    {
        let jobs = self.jobs.as_ref().ok_or(ScheduleError::Shutdown)?;
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let cancelled = Arc::new(AtomicBool::new(false));
        let job = Job {
            id,
            cancelled: cancelled.clone(),
            work: Box::new(work),
        };

        match jobs.try_send(job) {
            Ok(()) => Ok(TaskHandle { id, cancelled }),
            Err(TrySendError::Full(_)) => Err(ScheduleError::QueueFull {
                capacity: self.queue_capacity,
            }),
            Err(TrySendError::Disconnected(_)) => Err(ScheduleError::Shutdown),
        }
    }

    pub fn try_completion(&self) -> Option<TaskCompletion<T>> {
        self.completions.try_recv().ok()
    }

    pub fn wait_completion(&self, timeout: Duration) -> Option<TaskCompletion<T>> {
        self.completions.recv_timeout(timeout).ok()
    }
}

impl<T: Send + 'static> Drop for TaskScheduler<T> {
    fn drop(&mut self) {
        drop(self.jobs.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::warn!("decode worker exited with a panic");
            }
        }
    }
}

fn worker_loop<T: Send + 'static>(
    jobs: Arc<Mutex<Receiver<Job<T>>>>,
    completions: Sender<TaskCompletion<T>>,
) {
    loop {
        let next = {
            let receiver = jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            receiver.recv()
        };
        let Ok(job) = next else {
            break;
        };

        let outcome = if job.cancelled.load(Ordering::SeqCst) {
            TaskOutcome::Cancelled
        } else {
            match panic::catch_unwind(AssertUnwindSafe(job.work)) {
                Ok(value) => TaskOutcome::Completed(value),
                Err(_) => {
                    tracing::error!(task_id = job.id.get(), "background task panicked");
                    TaskOutcome::Panicked
                }
            }
        };

        if completions
            .send(TaskCompletion {
                task_id: job.id,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn completed_results_are_delivered_to_owner() {
        let mut scheduler = TaskScheduler::new(SchedulerConfig::default()).unwrap();
        let handle = scheduler.submit(|| 21 * 2).unwrap();

        let completion = scheduler.wait_completion(WAIT).expect("task should finish");
        assert_eq!(completion.task_id, handle.id());
        assert!(matches!(completion.outcome, TaskOutcome::Completed(42)));
    }

    #[test]
    fn task_ids_increase_per_submission() {
        let mut scheduler = TaskScheduler::new(SchedulerConfig::default()).unwrap();
        let first = scheduler.submit(|| ()).unwrap();
        let second = scheduler.submit(|| ()).unwrap();
        assert!(second.id() > first.id());
    }

    #[test]
    fn cancelled_task_never_runs() {
        let mut scheduler = TaskScheduler::new(SchedulerConfig {
            workers: 1,
            queue_capacity: 2,
        })
        .unwrap();
        let gate = Arc::new(Barrier::new(2));
        let blocker_gate = gate.clone();
        let _blocker = scheduler
            .submit(move || {
                blocker_gate.wait();
                0
            })
            .unwrap();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_in_task = ran.clone();
        let queued = scheduler
            .submit(move || {
                ran_in_task.store(true, Ordering::SeqCst);
                1
            })
            .unwrap();
        queued.cancel();
        gate.wait();

        let first = scheduler.wait_completion(WAIT).unwrap();
        let second = scheduler.wait_completion(WAIT).unwrap();
        assert!(matches!(first.outcome, TaskOutcome::Completed(0)));
        assert_eq!(second.task_id, queued.id());
        assert!(matches!(second.outcome, TaskOutcome::Cancelled));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_task_is_reported_and_worker_survives() {
        let mut scheduler = TaskScheduler::<u8>::new(SchedulerConfig::default()).unwrap();
        scheduler.submit(|| panic!("decoder exploded")).unwrap();
        let completion = scheduler.wait_completion(WAIT).unwrap();
        assert!(matches!(completion.outcome, TaskOutcome::Panicked));

        scheduler.submit(|| 7).unwrap();
        let completion = scheduler.wait_completion(WAIT).unwrap();
        assert!(matches!(completion.outcome, TaskOutcome::Completed(7)));
    }

    #[test]
    fn full_queue_rejects_submission() {
        let mut scheduler = TaskScheduler::new(SchedulerConfig {
            workers: 1,
            queue_capacity: 1,
        })
        .unwrap();
        let started = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let started_in_task = started.clone();
        let release_in_task = release.clone();
        let _running = scheduler
            .submit(move || {
                started_in_task.wait();
                release_in_task.wait();
            })
            .unwrap();
        started.wait();
        let _queued = scheduler.submit(|| ()).unwrap();

        let err = scheduler.submit(|| ()).unwrap_err();
        assert!(matches!(err, ScheduleError::QueueFull { capacity: 1 }));
        release.wait();
    }

    #[test]
    fn try_completion_is_empty_when_nothing_finished() {
        let scheduler = TaskScheduler::<()>::new(SchedulerConfig::default()).unwrap();
        assert!(scheduler.try_completion().is_none());
    }
}
