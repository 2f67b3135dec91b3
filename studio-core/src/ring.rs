//! Fixed-capacity buffer that drops the oldest item on overflow.

use std::collections::VecDeque;

/// Bounded FIFO used for edit history and bot log events. Never grows past `capacity`.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `item` as the newest entry, evicting the oldest when full.
    /// Returns the evicted item, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.buf.len() >= self.capacity {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.buf.iter().rev()
    }
}
