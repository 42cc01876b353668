//! Iteration over an `OrderedSet`.
//!
//! `Iter` borrows the set, so the compiler already rules out mutation while
//! it is alive. `Cursor` is detached: it is advanced against the set on
//! each step, which lets the caller mutate the set in between. To keep
//! that sound the cursor snapshots the set's size and fails fast once the
//! size changes.

use crate::error::SetError;
use crate::store::{Entry, OrderedSet};
use slotmap::DefaultKey;
use tracing::debug;

/// Borrowing iterator over keys in order.
pub struct Iter<'a, K> {
    order: core::slice::Iter<'a, Option<DefaultKey>>,
    slots: &'a slotmap::SlotMap<DefaultKey, Entry<K>>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        for slot in self.order.by_ref().flatten() {
            if let Some(e) = slots.get(*slot) {
                self.remaining -= 1;
                return Some(&e.key);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        while let Some(slot) = self.order.next_back() {
            if let Some(e) = slot.and_then(|s| slots.get(s)) {
                self.remaining -= 1;
                return Some(&e.key);
            }
        }
        None
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}

impl<'a, K> Clone for Iter<'a, K> {
    fn clone(&self) -> Self {
        Iter {
            order: self.order.clone(),
            slots: self.slots,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator over keys in order.
pub struct IntoIter<K> {
    inner: std::vec::IntoIter<K>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K, S> OrderedSet<K, S> {
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            order: self.order.iter(),
            slots: &self.slots,
            remaining: self.len(),
        }
    }

    /// Start a fail-fast cursor at the first position.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            state: State::Active {
                size: self.len(),
                next: 0,
            },
        }
    }
}

impl<'a, K, S> IntoIterator for &'a OrderedSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S> IntoIterator for OrderedSet<K, S> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order = core::mem::take(&mut self.order);
        let keys: Vec<K> = order
            .into_iter()
            .flatten()
            .filter_map(|slot| self.slots.remove(slot))
            .map(|e| e.key)
            .collect();
        IntoIter {
            inner: keys.into_iter(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Active { size: usize, next: usize },
    Exhausted,
    Poisoned,
}

/// Detached, non-restartable cursor over an `OrderedSet`.
///
/// Each [`advance`](Cursor::advance) compares the set's current size with
/// the size seen when the cursor was created. On mismatch it yields
/// `Err(ConcurrentModification)` and every later advance does the same.
/// Replacing keys without changing the size is not detected.
///
/// A cursor must be advanced against the set that created it.
#[derive(Clone, Debug)]
pub struct Cursor {
    state: State,
}

impl Cursor {
    pub fn advance<'s, K, S>(&mut self, set: &'s OrderedSet<K, S>) -> Option<Result<&'s K, SetError>> {
        match self.state {
            State::Exhausted => None,
            State::Poisoned => Some(Err(SetError::ConcurrentModification)),
            State::Active { size, next } => {
                if size != set.len() {
                    debug!(
                        expected = size,
                        actual = set.len(),
                        "set changed size during iteration"
                    );
                    self.state = State::Poisoned;
                    return Some(Err(SetError::ConcurrentModification));
                }
                if next >= size {
                    self.state = State::Exhausted;
                    return None;
                }
                self.state = State::Active {
                    size,
                    next: next + 1,
                };
                Some(set.get(next as isize))
            }
        }
    }

    /// Keys left to yield, or 0 once the size snapshot no longer holds.
    pub fn len_hint<K, S>(&self, set: &OrderedSet<K, S>) -> usize {
        match self.state {
            State::Active { size, next } if size == set.len() => size - next,
            _ => 0,
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }
}
