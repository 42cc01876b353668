//! ordered-hashset: a single-threaded set that remembers insertion order
//! and supports positional access, slicing and set algebra.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one logical collection seen both as a hash-unique set and as a
//!   random-access sequence, with the two views consistent after every
//!   mutation.
//! - Layers:
//!   - Store (`OrderedSet`): hash index + ordered sequence of stable slot
//!     handles, with the positional primitives (`get`, `pop_at`,
//!     `replace`, `delete_at`, `slice`, `splice`).
//!   - Algebra: union/intersection/difference/symmetric difference and
//!     their `*_update` forms, written only against store primitives.
//!   - Iteration & comparison: borrowing iterators, a detached fail-fast
//!     `Cursor`, and lexicographic ordering.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no locking.
//! - Keys are owned by the set; results of slicing and algebra clone keys.
//!   Use `Rc<T>` keys to share.
//! - Positions are dense: removal never leaves a visible gap.
//! - Uniqueness holds after every operation, including `replace` and
//!   `splice`.
//!
//! Hashing
//! - Keys are hashed through a policy `S: KeyHasher<K>`, called once per
//!   key on the way into a set. The hash is stored with the key and reused
//!   for rehashing, cloning, slicing, splicing and for keys a set operation
//!   keeps from its receiver. Keys taken from another set, and probes
//!   against another set, go through that set's policy.
//! - The default policy `StdHasher<RandomState>` never fails. Policies for
//!   dynamically typed keys may reject keys; lookups then report
//!   `SetError::UnhashableKey`, except `discard`, which treats such a key
//!   as absent.
//!
//! Removal cost
//! - Removing from the middle leaves a tombstone in the sequence. A
//!   Fenwick tree over live flags maps dense positions to raw slots in
//!   O(log n); the sequence is compacted once tombstones outnumber live
//!   keys, so removal is O(log n) amortized and positional reads are O(1)
//!   whenever nothing is pending compaction.
//!
//! Notes and non-goals
//! - No persistence, no thread-safety, no resizing policy knobs.
//! - Comparison is lexicographic over sequence order, not by subset
//!   relation; use `is_subset`/`is_superset` for the latter.
//! - `OrderedSet` does not implement `Hash`.

mod algebra;
mod compare;
mod cursor;
mod error;
mod hashing;
mod rank;
#[cfg(feature = "serde")]
mod serde_impl;
mod store;
mod store_proptest;

// Public surface
pub use algebra::Operand;
pub use compare::CompareOp;
pub use cursor::{Cursor, IntoIter, Iter};
pub use error::{SetError, Unhashable};
pub use hashing::{KeyHasher, StdHasher};
pub use store::OrderedSet;
