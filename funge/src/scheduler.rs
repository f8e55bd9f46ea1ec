use std::{
    collections::VecDeque,
    num::NonZeroUsize,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::debug;
use parking_lot::{Condvar, Mutex};

use crate::ArithmeticFault;

/// A unit of dataflow work. It may block on futures of tasks submitted
/// before it, never on later ones.
pub type Task = Box<dyn FnOnce() -> Result<(), ArithmeticFault> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub u64);

struct Queue {
    tasks: VecDeque<Task>,
    outstanding: usize,
    stopping: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    has_work: Condvar,
    idle: Condvar,
    fault: Mutex<Option<ArithmeticFault>>,
}

struct Worker {
    id: WorkerId,
    handle: Option<JoinHandle<()>>,
}

/// Fixed pool of workers sharing one FIFO queue.
///
/// Tasks are taken strictly in submission order. Since a task only waits on
/// cells produced by earlier tasks, the oldest running task always has its
/// inputs either resolved or in progress, so blocking inside a task cannot
/// starve the pool.
pub struct Scheduler {
    shared: Arc<Shared>,
    workers: Vec<Worker>,
}

impl Scheduler {
    pub fn new(workers: NonZeroUsize) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                outstanding: 0,
                stopping: false,
            }),
            has_work: Condvar::new(),
            idle: Condvar::new(),
            fault: Mutex::new(None),
        });

        let workers = (0..workers.get() as u64)
            .map(|n| {
                let id = WorkerId(n + 1);
                let me = Arc::clone(&shared);
                let handle = thread::Builder::new()
                    .name(format!("dataflow-worker-{}", id.0))
                    .spawn(move || worker_loop(&me, id))
                    .expect("spawn worker");
                Worker {
                    id,
                    handle: Some(handle),
                }
            })
            .collect();

        Self { shared, workers }
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    pub fn submit(&self, task: Task) {
        {
            let mut queue = self.shared.queue.lock();
            queue.tasks.push_back(task);
            queue.outstanding += 1;
        }
        self.shared.has_work.notify_one();
    }

    /// Blocks until every submitted task has finished.
    pub fn quiesce(&self) {
        let mut queue = self.shared.queue.lock();
        while queue.outstanding > 0 {
            self.shared.idle.wait(&mut queue);
        }
    }

    /// The first fault any task reported.
    #[must_use]
    pub fn fault(&self) -> Option<ArithmeticFault> {
        *self.shared.fault.lock()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shared.queue.lock().stopping = true;
        self.shared.has_work.notify_all();
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    debug!("dataflow worker {} panicked", worker.id.0);
                }
            }
        }
    }
}

fn worker_loop(shared: &Shared, id: WorkerId) {
    debug!("dataflow worker {} started", id.0);
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break task;
                }
                // queued work is drained before stopping, pending cells depend on it
                if queue.stopping {
                    debug!("dataflow worker {} stopped", id.0);
                    return;
                }
                shared.has_work.wait(&mut queue);
            }
        };

        if let Err(fault) = task() {
            shared.fault.lock().get_or_insert(fault);
        }

        let mut queue = shared.queue.lock();
        queue.outstanding -= 1;
        if queue.outstanding == 0 {
            shared.idle.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::future::{Future, pending};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pool(n: usize) -> Scheduler {
        Scheduler::new(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn runs_every_submitted_task() {
        let sched = pool(4);
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..64 {
            let ran = Arc::clone(&ran);
            sched.submit(Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
        }
        sched.quiesce();
        assert_eq!(ran.load(Ordering::SeqCst), 64);
        assert_eq!(sched.fault(), None);
    }

    #[test]
    fn dependent_chain_completes_on_a_single_worker() {
        let sched = pool(1);
        let mut input = Future::ready(0);
        for _ in 0..100 {
            let (promise, output) = pending();
            sched.submit(Box::new(move || {
                let value = input.wait()?;
                promise.resolve(Ok(value + 1));
                Ok(())
            }));
            input = output;
        }
        assert_eq!(input.wait(), Ok(100));
    }

    #[test]
    fn records_the_first_fault() {
        let sched = pool(2);
        sched.submit(Box::new(|| Err(ArithmeticFault::DivisionByZero)));
        sched.submit(Box::new(|| Ok(())));
        sched.quiesce();
        assert_eq!(sched.fault(), Some(ArithmeticFault::DivisionByZero));
    }

    #[test]
    fn drop_drains_queued_work() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let sched = pool(1);
            assert_eq!(sched.workers(), 1);
            for _ in 0..16 {
                let ran = Arc::clone(&ran);
                sched.submit(Box::new(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }));
            }
        }
        assert_eq!(ran.load(Ordering::SeqCst), 16);
    }
}
