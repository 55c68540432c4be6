//! Blocking FIFO queue with an interrupt signal
//!
//! Consumers block in [`BlockingQueue::wait_and_pop`] until an item arrives
//! or the queue is interrupted. An interrupt wakes a waiter without an item;
//! the next push re-arms the queue.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    interrupted: bool,
}

/// Thread-safe FIFO handing items from one pipeline stage to the next
#[derive(Debug)]
pub struct BlockingQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Create an empty, non-interrupted queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                interrupted: false,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item and wake one waiting consumer.
    ///
    /// Clears the interrupt flag.
    pub fn push(&self, item: T) {
        {
            let mut state = self.lock();
            state.items.push_back(item);
            state.interrupted = false;
        }
        self.available.notify_one();
    }

    /// Block until an item is available or the queue is interrupted.
    ///
    /// Returns `None` only when the queue is interrupted and empty.
    pub fn wait_and_pop(&self) -> Option<T> {
        let mut state = self
            .available
            .wait_while(self.lock(), |state| {
                state.items.is_empty() && !state.interrupted
            })
            .unwrap_or_else(PoisonError::into_inner);
        state.items.pop_front()
    }

    /// Pop an item without blocking
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Wake one waiter without delivering an item.
    ///
    /// A second call before the next push is a no-op.
    pub fn interrupt(&self) {
        {
            let mut state = self.lock();
            if state.interrupted {
                return;
            }
            state.interrupted = true;
        }
        self.available.notify_one();
    }

    /// Whether the queue has been interrupted since the last push
    pub fn is_interrupted(&self) -> bool {
        self.lock().interrupted
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
