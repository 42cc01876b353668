//! Lexicographic comparison of sets by sequence order.
//!
//! Two sets compare like the sequences of their keys, not by subset
//! relation: `[1, 2] < [1, 2, 3]` and `[1, 3] > [1, 2, 9]`.

use crate::store::OrderedSet;
use core::cmp::Ordering;
use core::fmt;

/// The six rich-comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareOp {
    fn sizes(self, a: usize, b: usize) -> bool {
        match self {
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }

    fn keys<K: PartialOrd>(self, a: &K, b: &K) -> bool {
        match self {
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
}

/// First position where the two sequences hold unequal keys.
fn first_difference<'a, K, S1, S2>(
    a: &'a OrderedSet<K, S1>,
    b: &'a OrderedSet<K, S2>,
) -> Option<(&'a K, &'a K)>
where
    K: PartialEq,
{
    a.iter().zip(b.iter()).find(|(x, y)| x != y)
}

impl<K, S> OrderedSet<K, S> {
    /// Evaluate `self <op> other` lexicographically.
    ///
    /// Lengths settle `Eq`/`Ne` up front. Otherwise the first unequal pair
    /// decides, using the pair's own ordering for `Lt`/`Le`/`Gt`/`Ge`; when
    /// one sequence is a prefix of the other the lengths decide.
    pub fn rich_compare<S2>(&self, other: &OrderedSet<K, S2>, op: CompareOp) -> bool
    where
        K: PartialOrd,
    {
        let (la, lb) = (self.len(), other.len());
        if la != lb && matches!(op, CompareOp::Eq | CompareOp::Ne) {
            return op == CompareOp::Ne;
        }
        match first_difference(self, other) {
            None => op.sizes(la, lb),
            Some(_) if op == CompareOp::Eq => false,
            Some(_) if op == CompareOp::Ne => true,
            Some((x, y)) => op.keys(x, y),
        }
    }
}

impl<K: PartialEq, S1, S2> PartialEq<OrderedSet<K, S2>> for OrderedSet<K, S1> {
    fn eq(&self, other: &OrderedSet<K, S2>) -> bool {
        self.len() == other.len() && first_difference(self, other).is_none()
    }
}

impl<K: Eq, S> Eq for OrderedSet<K, S> {}

impl<K: PartialOrd, S1, S2> PartialOrd<OrderedSet<K, S2>> for OrderedSet<K, S1> {
    fn partial_cmp(&self, other: &OrderedSet<K, S2>) -> Option<Ordering> {
        match first_difference(self, other) {
            Some((x, y)) => x.partial_cmp(y),
            None => Some(self.len().cmp(&other.len())),
        }
    }
}

impl<K: Ord, S> Ord for OrderedSet<K, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        match first_difference(self, other) {
            Some((x, y)) => x.cmp(y),
            None => self.len().cmp(&other.len()),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for OrderedSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OrderedSet(")?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}
