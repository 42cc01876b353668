//! RankTree: maps dense positions to raw sequence slots.
//!
//! The order sequence keeps tombstones where entries were removed. A
//! Fenwick tree over the per-slot live flags answers "how many live slots
//! precede raw slot `p`" (`rank`) and "which raw slot holds the `n`th live
//! entry" (`select`) in O(log n). When there are no tombstones both are the
//! identity and short-circuit.

#[derive(Clone, Debug, Default)]
pub(crate) struct RankTree {
    // 1-based Fenwick nodes stored at `tree[j - 1]`.
    tree: Vec<usize>,
    live: usize,
}

#[inline]
fn lowbit(j: usize) -> usize {
    j & j.wrapping_neg()
}

impl RankTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Tree over `n` raw slots, all live.
    pub(crate) fn all_live(n: usize) -> Self {
        let tree = (1..=n).map(lowbit).collect();
        Self { tree, live: n }
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            tree: Vec::with_capacity(n),
            live: 0,
        }
    }

    /// Number of raw slots, live or dead.
    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.tree.len()
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.tree.len() - self.live
    }

    #[inline]
    fn is_dense(&self) -> bool {
        self.live == self.tree.len()
    }

    /// Append a live raw slot.
    pub(crate) fn push_live(&mut self) {
        let j = self.tree.len() + 1;
        let lo = j - lowbit(j);
        let mut sum = 1;
        let mut i = j - 1;
        while i > lo {
            sum += self.tree[i - 1];
            i -= lowbit(i);
        }
        self.tree.push(sum);
        self.live += 1;
    }

    /// Drop the last raw slot, which must already be dead.
    pub(crate) fn pop_dead(&mut self) {
        debug_assert!(self.tombstones() > 0);
        self.tree.pop();
    }

    /// Mark raw slot `pos` dead.
    pub(crate) fn kill(&mut self, pos: usize) {
        debug_assert!(pos < self.tree.len());
        let n = self.tree.len();
        let mut j = pos + 1;
        while j <= n {
            self.tree[j - 1] -= 1;
            j += lowbit(j);
        }
        self.live -= 1;
    }

    /// Number of live slots strictly before raw slot `pos`.
    pub(crate) fn rank(&self, pos: usize) -> usize {
        if self.is_dense() {
            return pos;
        }
        let mut sum = 0;
        let mut j = pos;
        while j > 0 {
            sum += self.tree[j - 1];
            j -= lowbit(j);
        }
        sum
    }

    /// Raw slot of the `nth` live entry (0-based).
    pub(crate) fn select(&self, nth: usize) -> Option<usize> {
        if nth >= self.live {
            return None;
        }
        if self.is_dense() {
            return Some(nth);
        }
        let n = self.tree.len();
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        let mut pos = 0;
        let mut remaining = nth;
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next - 1] <= remaining {
                pos = next;
                remaining -= self.tree[next - 1];
            }
            step >>= 1;
        }
        Some(pos)
    }

    pub(crate) fn clear(&mut self) {
        self.tree.clear();
        self.live = 0;
    }
}
