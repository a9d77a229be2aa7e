//! Small ordered containers shared by the collection searches.
//!
//! - [`BoundedSortedList`]: keeps the `k` smallest items seen so far.
//! - [`IndexTable`]: a sorting permutation that can be replayed over
//!   parallel arrays.

mod bounded;
mod index_table;

pub use bounded::BoundedSortedList;
pub use index_table::IndexTable;
