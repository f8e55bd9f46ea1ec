use std::{fmt, sync::Arc};

use parking_lot::{Condvar, Mutex};

use crate::ArithmeticFault;

/// What a future settles to. Faults travel through the dataflow graph as
/// values so the dispatch thread can report them when it looks.
pub type Resolution = Result<i64, ArithmeticFault>;

#[derive(Debug, Default)]
struct Slot {
    value: Mutex<Option<Resolution>>,
    ready: Condvar,
}

/// The write end of a dataflow cell. Resolving consumes it, so every cell is
/// written at most once.
#[derive(Debug)]
pub struct Promise {
    slot: Arc<Slot>,
}

/// The read end of a dataflow cell.
pub struct Future {
    slot: Arc<Slot>,
}

/// Allocates an unresolved cell.
#[must_use]
pub fn pending() -> (Promise, Future) {
    let slot = Arc::new(Slot::default());
    (
        Promise {
            slot: Arc::clone(&slot),
        },
        Future { slot },
    )
}

impl Promise {
    pub fn resolve(self, value: Resolution) {
        *self.slot.value.lock() = Some(value);
        self.slot.ready.notify_all();
    }
}

impl Future {
    #[must_use]
    pub fn ready(value: i64) -> Self {
        Self {
            slot: Arc::new(Slot {
                value: Mutex::new(Some(Ok(value))),
                ready: Condvar::new(),
            }),
        }
    }

    /// Blocks until the producer resolved the cell.
    pub fn wait(&self) -> Resolution {
        let mut guard = self.slot.value.lock();
        loop {
            if let Some(value) = *guard {
                return value;
            }
            self.slot.ready.wait(&mut guard);
        }
    }

    #[must_use]
    pub fn peek(&self) -> Option<Resolution> {
        *self.slot.value.lock()
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Future({self})")
    }
}

impl fmt::Display for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(Ok(value)) => write!(f, "{value}"),
            Some(Err(_)) => write!(f, "!"),
            None => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn ready_future_does_not_block() {
        let future = Future::ready(7);
        assert_eq!(future.peek(), Some(Ok(7)));
        assert_eq!(future.wait(), Ok(7));
        assert_eq!(future.to_string(), "7");
    }

    #[test]
    fn pending_future_renders_as_unknown() {
        let (promise, future) = pending();
        assert_eq!(future.peek(), None);
        assert_eq!(future.to_string(), "?");
        promise.resolve(Err(ArithmeticFault::DivisionByZero));
        assert_eq!(future.to_string(), "!");
    }

    #[test]
    fn wait_blocks_until_resolved_on_another_thread() {
        let (promise, future) = pending();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            promise.resolve(Ok(42));
        });

        assert_eq!(future.wait(), Ok(42));
        producer.join().unwrap();
    }

    #[test]
    fn resolved_value_is_visible_to_every_read() {
        let (promise, future) = pending();
        let future = Arc::new(future);
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let future = Arc::clone(&future);
                thread::spawn(move || future.wait())
            })
            .collect();

        promise.resolve(Ok(-5));
        for reader in readers {
            assert_eq!(reader.join().unwrap(), Ok(-5));
        }
        assert_eq!(future.wait(), Ok(-5));
    }
}
