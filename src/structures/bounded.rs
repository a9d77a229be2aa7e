//! Capacity-limited sorted list for top-k selection.

use std::slice;

/// The `k` smallest items pushed so far, kept in ascending order.
///
/// Equal items keep their push order, so when `T` breaks ties on an
/// insertion counter the earliest item wins. Once full, an item is only
/// accepted if it is strictly smaller than [`last`](Self::last), which is
/// then evicted.
#[derive(Debug, Clone)]
pub struct BoundedSortedList<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Ord> BoundedSortedList<T> {
    /// Create an empty list. `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self {
            // Reserve one extra slot for the insert-then-evict step.
            items: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Offer an item. Returns `true` if it was kept.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() && self.items.last().is_some_and(|worst| item >= *worst) {
            return false;
        }
        let pos = self.items.partition_point(|x| *x <= item);
        self.items.insert(pos, item);
        if self.items.len() > self.capacity {
            self.items.pop();
        }
        true
    }

    /// Current worst (largest) item, used as the pruning bound.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Current best (smallest) item.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate in ascending order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consume into an ascending `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a BoundedSortedList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
