//! Sorting permutations over parallel arrays.

use std::cmp::Ordering;

/// A permutation that sorts a key sequence ascending.
///
/// Build it once from the keys, then [`apply`](Self::apply) it to every
/// array that runs parallel to them. Sorting is stable: equal keys keep
/// their original relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    order: Vec<usize>,
}

impl IndexTable {
    /// Sort by naturally ordered keys.
    pub fn new<K: Ord>(keys: &[K]) -> Self {
        Self::sort_by(keys.len(), |a, b| keys[a].cmp(&keys[b]))
    }

    /// Sort by floating-point keys using IEEE 754 total ordering.
    pub fn from_f64(keys: &[f64]) -> Self {
        Self::sort_by(keys.len(), |a, b| keys[a].total_cmp(&keys[b]))
    }

    /// Sort positions `0..len` with a comparator over positions.
    pub fn sort_by(len: usize, mut cmp: impl FnMut(usize, usize) -> Ordering) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| cmp(a, b));
        Self { order }
    }

    /// Position in the original sequence of the `i`-th smallest key.
    pub fn index(&self, i: usize) -> usize {
        self.order[i]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Return `values` reordered by this permutation.
    ///
    /// # Panics
    ///
    /// If `values` is not as long as the key sequence.
    pub fn apply<T: Clone>(&self, values: &[T]) -> Vec<T> {
        assert_eq!(values.len(), self.order.len(), "parallel array length mismatch");
        self.order.iter().map(|&i| values[i].clone()).collect()
    }

    /// Reorder `values` in place.
    ///
    /// # Panics
    ///
    /// If `values` is not as long as the key sequence.
    pub fn apply_in_place<T>(&self, values: &mut Vec<T>) {
        assert_eq!(values.len(), self.order.len(), "parallel array length mismatch");
        let mut slots: Vec<Option<T>> = values.drain(..).map(Some).collect();
        values.extend(self.order.iter().filter_map(|&i| slots[i].take()));
    }
}
