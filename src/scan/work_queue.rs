// Self-feeding work queue: a fixed pool of workers draining a task channel
// that handlers may push new tasks into while the run is in progress.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::trace;

enum Message<T> {
    Task(T),
    Stop,
}

/// Handle given to every task handler.
///
/// Pushing a task through it keeps the run alive until the pushed task has
/// been processed as well.
pub struct WorkerState<'q, T> {
    id: usize,
    sender: &'q Sender<Message<T>>,
    pending: &'q AtomicUsize,
    deferred: &'q Mutex<Vec<T>>,
    push_while_running: bool,
}

impl<T> WorkerState<'_, T> {
    /// Index of the worker running the current task, in `0..workers`
    pub fn worker_id(&self) -> usize {
        self.id
    }

    /// Queue another task for this run.
    ///
    /// With `push_while_running` disabled the task is held back until every
    /// task of the current round has finished.
    pub fn push_task(&self, task: T) {
        if self.push_while_running {
            self.pending.fetch_add(1, Ordering::AcqRel);
            // The receiving side lives for the whole round, so this cannot fail.
            let _ = self.sender.send(Message::Task(task));
        } else {
            self.deferred
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(task);
        }
    }
}

/// Marks one task as finished, even if its handler unwinds. The last task
/// out releases every worker.
struct Completion<'q, T> {
    pending: &'q AtomicUsize,
    sender: &'q Sender<Message<T>>,
    workers: usize,
}

impl<T> Drop for Completion<'_, T> {
    fn drop(&mut self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            for _ in 0..self.workers {
                let _ = self.sender.send(Message::Stop);
            }
        }
    }
}

/// Bounded worker pool with dynamic task injection
#[derive(Debug, Clone)]
pub struct WorkQueue {
    workers: usize,
    push_while_running: bool,
}

impl WorkQueue {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            push_while_running: true,
        }
    }

    /// Whether tasks pushed by a handler may start before the current round
    /// has drained
    pub fn with_push_while_running(mut self, enabled: bool) -> Self {
        self.push_while_running = enabled;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every seed task, plus everything pushed while running, exactly
    /// once. Returns the number of tasks processed.
    ///
    /// Completion is global: the call returns only when the queue is empty
    /// and no handler is still running. A panicking handler is propagated
    /// to the caller once the remaining workers have stopped.
    pub fn run<T, F>(&self, seeds: Vec<T>, handler: F) -> usize
    where
        T: Send,
        F: Fn(&WorkerState<'_, T>, T) + Sync,
    {
        let processed = AtomicUsize::new(0);
        let mut round = seeds;
        while !round.is_empty() {
            trace!("Work queue round with {} seed tasks", round.len());
            round = self.run_round(round, &handler, &processed);
        }
        processed.into_inner()
    }

    fn run_round<T, F>(&self, tasks: Vec<T>, handler: &F, processed: &AtomicUsize) -> Vec<T>
    where
        T: Send,
        F: Fn(&WorkerState<'_, T>, T) + Sync,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let pending = AtomicUsize::new(tasks.len());
        let deferred = Mutex::new(Vec::new());

        for task in tasks {
            let _ = sender.send(Message::Task(task));
        }

        thread::scope(|scope| {
            for id in 0..self.workers {
                let state = WorkerState {
                    id,
                    sender: &sender,
                    pending: &pending,
                    deferred: &deferred,
                    push_while_running: self.push_while_running,
                };
                let receiver: Receiver<Message<T>> = receiver.clone();
                let workers = self.workers;
                scope.spawn(move || {
                    while let Ok(Message::Task(task)) = receiver.recv() {
                        let _done = Completion {
                            pending: state.pending,
                            sender: state.sender,
                            workers,
                        };
                        handler(&state, task);
                        processed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        deferred.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Worker count for one scan: the platform default parallelism, capped
pub fn worker_count(cap: usize) -> usize {
    rayon::current_num_threads().min(cap).max(1)
}
