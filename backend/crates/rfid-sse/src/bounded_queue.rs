use crate::{QueueError, QueueResult};

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

/// FIFO queue with a fixed capacity and async waiting on both ends.
///
/// A capacity of 0 means unbounded. Items always come out in the order they
/// went in; there is no ordering among tasks waiting on the same end.
///
/// Closing the queue discards buffered items, wakes every waiter, and makes
/// `get` return `None` from then on.
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    /// Append `item`, waiting while the queue is full.
    ///
    /// Only fails when the queue is (or becomes) closed; the item is dropped.
    pub async fn put(&self, item: T) -> QueueResult<()> {
        let mut item = item;
        loop {
            let mut notified = pin!(self.not_full.notified());
            notified.as_mut().enable();

            match self.try_push(item) {
                Ok(()) => return Ok(()),
                Err((QueueError::Full, rejected)) => item = rejected,
                Err((e, _)) => return Err(e),
            }

            notified.await;
        }
    }

    /// Append `item` without waiting. `Full` leaves the queue untouched.
    pub fn put_nowait(&self, item: T) -> QueueResult<()> {
        self.try_push(item).map_err(|(e, _)| e)
    }

    /// Remove the oldest item, waiting while the queue is empty.
    ///
    /// Returns `None` once the queue has been closed.
    pub async fn get(&self) -> Option<T> {
        loop {
            let mut notified = pin!(self.not_empty.notified());
            notified.as_mut().enable();

            match self.try_pop() {
                Ok(item) => return Some(item),
                Err(QueueError::Closed) => return None,
                Err(_) => {}
            }

            notified.await;
        }
    }

    /// Remove the oldest item without waiting. `Empty` leaves the queue untouched.
    pub fn get_nowait(&self) -> QueueResult<T> {
        self.try_pop()
    }

    /// Close the queue, returning how many buffered items were discarded.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.lock();
            if state.closed {
                return 0;
            }
            state.closed = true;
            let discarded = state.items.len();
            state.items.clear();
            discarded
        };

        self.not_empty.notify_waiters();
        self.not_full.notify_waiters();
        discarded
    }

    pub fn size(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Never true for an unbounded queue.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.lock().items.len() >= self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn try_push(&self, item: T) -> Result<(), (QueueError, T)> {
        {
            let mut state = self.lock();
            if state.closed {
                return Err((QueueError::Closed, item));
            }
            if self.capacity > 0 && state.items.len() >= self.capacity {
                return Err((QueueError::Full, item));
            }
            state.items.push_back(item);
        }

        self.not_empty.notify_one();
        Ok(())
    }

    fn try_pop(&self) -> QueueResult<T> {
        let item = {
            let mut state = self.lock();
            match state.items.pop_front() {
                Some(item) => item,
                None if state.closed => return Err(QueueError::Closed),
                None => return Err(QueueError::Empty),
            }
        };

        self.not_full.notify_one();
        Ok(item)
    }

    // The state is plain data, so a panic elsewhere cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}
