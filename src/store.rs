//! OrderedSet: the dual-index store.
//!
//! Two views are kept in lockstep:
//! - `order`: raw sequence of slot handles in insertion order. Removal
//!   leaves a tombstone (`None`); `ranks` maps dense positions onto raw
//!   slots. Trailing tombstones are trimmed immediately and the sequence is
//!   compacted once tombstones outnumber live entries.
//! - `index`: hash table of slot handles, probed with the hash stored in
//!   each slot so keys are hashed exactly once, on the way in.
//!
//! `slots` owns the keys. A slot handle is stable for the lifetime of its
//! entry, so compaction only rewrites `Entry::pos` and never touches the
//! index.

use crate::error::SetError;
use crate::hashing::{KeyHasher, StdHasher};
use crate::rank::RankTree;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

/// Tombstones tolerated before compaction is considered at all.
const COMPACT_FLOOR: usize = 32;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K> {
    pub(crate) key: K,
    pub(crate) hash: u64,
    // raw position in `order`
    pub(crate) pos: usize,
}

/// An insertion-ordered set with positional access.
///
/// Membership, `add` and `discard` are O(1) amortized. Positional reads are
/// O(1) while no removals are pending compaction and O(log n) otherwise.
///
/// Keys are hashed through the policy `S`. The default policy wraps
/// `RandomState` and never fails; custom [`KeyHasher`]s may reject keys,
/// which surfaces as [`SetError::UnhashableKey`].
pub struct OrderedSet<K, S = StdHasher> {
    pub(crate) hasher: S,
    index: HashTable<DefaultKey>,
    pub(crate) slots: SlotMap<DefaultKey, Entry<K>>,
    pub(crate) order: Vec<Option<DefaultKey>>,
    ranks: RankTree,
}

impl<K> OrderedSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(StdHasher::default())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self::with_capacity_and_hasher(n, StdHasher::default())
    }
}

impl<K, S: Default> Default for OrderedSet<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> OrderedSet<K, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            order: Vec::new(),
            ranks: RankTree::new(),
        }
    }

    pub fn with_capacity_and_hasher(n: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(n),
            slots: SlotMap::with_capacity_and_key(n),
            order: Vec::with_capacity(n),
            ranks: RankTree::with_capacity(n),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remove every key, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.order.clear();
        self.ranks.clear();
    }

    /// Key at `position`; negative positions count from the end.
    pub fn get(&self, position: isize) -> Result<&K, SetError> {
        let at = self.normalize(position)?;
        Ok(&self.slots[self.slot_at(at)].key)
    }

    pub fn first(&self) -> Option<&K> {
        self.get(0).ok()
    }

    pub fn last(&self) -> Option<&K> {
        self.get(-1).ok()
    }

    /// Resolve a possibly negative position into `[0, len)`.
    pub(crate) fn normalize(&self, position: isize) -> Result<usize, SetError> {
        let len = self.len();
        let at = if position < 0 {
            position + len as isize
        } else {
            position
        };
        if at < 0 || at as usize >= len {
            return Err(SetError::IndexOutOfRange {
                index: position,
                len,
            });
        }
        Ok(at as usize)
    }

    /// Clamp slice bounds the way sequence slicing does.
    pub(crate) fn clamp(&self, lo: isize, hi: isize) -> (usize, usize) {
        let len = self.len() as isize;
        let lo = lo.clamp(0, len);
        let hi = hi.clamp(lo, len);
        (lo as usize, hi as usize)
    }

    /// Handle of the live entry at dense position `at` (< len).
    pub(crate) fn slot_at(&self, at: usize) -> DefaultKey {
        let raw = self
            .ranks
            .select(at)
            .expect("dense position below len maps to a live slot");
        self.order[raw].expect("rank tree only selects live slots")
    }

    /// Dense position of a live entry.
    pub(crate) fn position_of(&self, slot: DefaultKey) -> usize {
        self.ranks.rank(self.slots[slot].pos)
    }

    /// Append a key whose hash is known and which is known to be absent.
    pub(crate) fn push_unique(&mut self, key: K, hash: u64) {
        let pos = self.order.len();
        let slot = self.slots.insert(Entry { key, hash, pos });
        let slots = &self.slots;
        self.index
            .insert_unique(hash, slot, |&s| slots.get(s).map_or(0, |e| e.hash));
        self.order.push(Some(slot));
        self.ranks.push_live();
    }

    /// Detach a live entry from both views and return its key.
    fn take_slot(&mut self, slot: DefaultKey) -> K {
        let entry = self
            .slots
            .remove(slot)
            .expect("slot handle refers to a live entry");
        if let Ok(found) = self.index.find_entry(entry.hash, |&s| s == slot) {
            found.remove();
        }
        self.order[entry.pos] = None;
        self.ranks.kill(entry.pos);
        self.settle();
        entry.key
    }

    /// Trim trailing tombstones; compact when tombstones dominate.
    fn settle(&mut self) {
        while let Some(None) = self.order.last() {
            self.order.pop();
            self.ranks.pop_dead();
        }
        let dead = self.ranks.tombstones();
        if dead > COMPACT_FLOOR && dead > self.ranks.live() {
            self.compact();
        }
    }

    fn compact(&mut self) {
        trace!(
            live = self.ranks.live(),
            tombstones = self.ranks.tombstones(),
            "compacting order sequence"
        );
        self.order.retain(Option::is_some);
        for (pos, &slot) in self.order.iter().flatten().enumerate() {
            if let Some(entry) = self.slots.get_mut(slot) {
                entry.pos = pos;
            }
        }
        self.ranks = RankTree::all_live(self.order.len());
    }

    /// Remove and return the key at `position`.
    pub fn pop_at(&mut self, position: isize) -> Result<K, SetError> {
        let at = self.normalize(position)?;
        let slot = self.slot_at(at);
        Ok(self.take_slot(slot))
    }

    /// Remove and return the last key.
    pub fn pop(&mut self) -> Result<K, SetError> {
        self.pop_at(-1)
    }

    /// Remove the key at `position`, shifting later keys down by one.
    pub fn delete_at(&mut self, position: isize) -> Result<(), SetError> {
        self.pop_at(position).map(drop)
    }

    /// Iterate live entries in order, with their stored hashes.
    pub(crate) fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry<K>> + '_ {
        self.order
            .iter()
            .filter_map(move |slot| slot.and_then(|s| self.slots.get(s)))
    }

    /// New set holding the keys at positions `[lo, hi)` (clamped).
    pub fn slice(&self, lo: isize, hi: isize) -> Self
    where
        K: Clone,
        S: Clone,
    {
        let (lo, hi) = self.clamp(lo, hi);
        let mut out = Self::with_capacity_and_hasher(hi - lo, self.hasher.clone());
        for entry in self.entries().skip(lo).take(hi - lo) {
            out.push_unique(entry.key.clone(), entry.hash);
        }
        out
    }
}

impl<K, S> OrderedSet<K, S>
where
    K: Eq,
{
    fn find_slot<Q>(&self, hash: u64, key: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index
            .find(hash, |&s| {
                self.slots
                    .get(s)
                    .map(|e| <K as Borrow<Q>>::borrow(&e.key) == key)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Insert a key with a precomputed hash unless an equal key is present.
    pub(crate) fn insert_hashed(&mut self, key: K, hash: u64) -> bool {
        let slots = &self.slots;
        match self.index.entry(
            hash,
            |&s| slots.get(s).map(|e| e.key == key).unwrap_or(false),
            |&s| slots.get(s).map_or(0, |e| e.hash),
        ) {
            hashbrown::hash_table::Entry::Occupied(_) => false,
            hashbrown::hash_table::Entry::Vacant(v) => {
                let pos = self.order.len();
                let slot = self.slots.insert(Entry { key, hash, pos });
                let _ = v.insert(slot);
                self.order.push(Some(slot));
                self.ranks.push_live();
                true
            }
        }
    }
}

impl<K, S> OrderedSet<K, S>
where
    K: Eq,
    S: KeyHasher<K>,
{
    /// Build a set from `keys`, keeping the first occurrence of duplicates.
    pub fn from_keys_with_hasher<I>(keys: I, hasher: S) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = K>,
    {
        let mut set = Self::with_hasher(hasher);
        set.update(keys)?;
        Ok(set)
    }

    fn make_hash<Q>(&self, key: &Q) -> Result<u64, SetError>
    where
        Q: ?Sized,
        S: KeyHasher<Q>,
    {
        Ok(self.hasher.hash_key(key)?)
    }

    pub fn contains<Q>(&self, key: &Q) -> Result<bool, SetError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        S: KeyHasher<Q>,
    {
        let hash = self.make_hash(key)?;
        Ok(self.find_slot(hash, key).is_some())
    }

    /// Append `key` unless an equal key is present. Returns whether it was added.
    pub fn add(&mut self, key: K) -> Result<bool, SetError> {
        let hash = self.make_hash(&key)?;
        Ok(self.insert_hashed(key, hash))
    }

    /// Add each key in iteration order. Stops at the first unhashable key;
    /// keys before it stay added.
    pub fn update<I>(&mut self, keys: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.add(key)?;
        }
        Ok(())
    }

    /// Remove `key` if present. Unhashable keys count as absent.
    pub fn discard<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        S: KeyHasher<Q>,
    {
        let Ok(hash) = self.make_hash(key) else {
            return false;
        };
        match self.find_slot(hash, key) {
            Some(slot) => {
                self.take_slot(slot);
                true
            }
            None => false,
        }
    }

    /// Remove and return `key`, or fail with `NotAMember`.
    ///
    /// A key the hashing policy rejects cannot be a member, so it is also
    /// reported as `NotAMember` rather than `UnhashableKey`.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, SetError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        S: KeyHasher<Q>,
    {
        let slot = self
            .make_hash(key)
            .ok()
            .and_then(|hash| self.find_slot(hash, key))
            .ok_or(SetError::NotAMember)?;
        Ok(self.take_slot(slot))
    }

    /// Current position of `key`.
    pub fn index_of<Q>(&self, key: &Q) -> Result<usize, SetError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        S: KeyHasher<Q>,
    {
        let hash = self.make_hash(key)?;
        let slot = self.find_slot(hash, key).ok_or(SetError::NotAMember)?;
        Ok(self.position_of(slot))
    }

    /// Overwrite the key at `position`, returning the previous key.
    ///
    /// Fails with `DuplicateKey`, leaving the set unchanged, if `key` equals
    /// a member at another position.
    pub fn replace(&mut self, position: isize, key: K) -> Result<K, SetError> {
        let at = self.normalize(position)?;
        let hash = self.make_hash(&key)?;
        let slot = self.slot_at(at);
        match self.find_slot(hash, &key) {
            Some(other) if other != slot => return Err(SetError::DuplicateKey),
            Some(_) => {
                return Ok(core::mem::replace(&mut self.slots[slot].key, key));
            }
            None => {}
        }
        let old_hash = self.slots[slot].hash;
        if let Ok(found) = self.index.find_entry(old_hash, |&s| s == slot) {
            found.remove();
        }
        let entry = &mut self.slots[slot];
        entry.hash = hash;
        let old = core::mem::replace(&mut entry.key, key);
        let slots = &self.slots;
        self.index
            .insert_unique(hash, slot, |&s| slots.get(s).map_or(0, |e| e.hash));
        Ok(old)
    }

    /// Replace positions `[lo, hi)` (clamped) with the distinct `keys`.
    ///
    /// The prefix `[0, lo)` and suffix `[hi, len)` of the current sequence
    /// survive unchanged; incoming keys equal to one of them are dropped.
    /// If any incoming key is unhashable the set is left untouched.
    pub fn splice<I>(&mut self, lo: isize, hi: isize, keys: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = K>,
    {
        let (lo, hi) = self.clamp(lo, hi);
        let mut incoming = Vec::new();
        for key in keys {
            let hash = self.make_hash(&key)?;
            let in_suffix = self
                .find_slot(hash, &key)
                .is_some_and(|slot| self.position_of(slot) >= hi);
            if !in_suffix {
                incoming.push((key, hash));
            }
        }
        trace!(lo, hi, incoming = incoming.len(), "splicing order sequence");

        let mut old_slots = core::mem::take(&mut self.slots);
        let old_order = core::mem::take(&mut self.order);
        self.index.clear();
        self.ranks.clear();
        let mut incoming = Some(incoming);
        let live = old_order.into_iter().flatten();
        for (at, slot) in live.enumerate() {
            if at == lo {
                for (key, hash) in incoming.take().into_iter().flatten() {
                    self.insert_hashed(key, hash);
                }
            }
            let Some(entry) = old_slots.remove(slot) else {
                continue;
            };
            if at < lo || at >= hi {
                self.insert_hashed(entry.key, entry.hash);
            }
        }
        for (key, hash) in incoming.into_iter().flatten() {
            self.insert_hashed(key, hash);
        }
        Ok(())
    }
}

impl<K, S> OrderedSet<K, StdHasher<S>>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Infallible `add` for the standard hashing policy.
    pub fn insert(&mut self, key: K) -> bool {
        let hash = self.hasher.hash_one(&key);
        self.insert_hashed(key, hash)
    }
}

impl<K: Clone, S: Clone> Clone for OrderedSet<K, S> {
    /// Compacted copy; stored hashes are carried over with the policy.
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher.clone());
        for entry in self.entries() {
            out.push_unique(entry.key.clone(), entry.hash);
        }
        out
    }
}

impl<K, S> core::ops::Index<usize> for OrderedSet<K, S> {
    type Output = K;

    /// # Panics
    /// If `position >= len`.
    fn index(&self, position: usize) -> &K {
        assert!(
            position < self.len(),
            "index {} out of range for set of length {}",
            position,
            self.len()
        );
        &self.slots[self.slot_at(position)].key
    }
}

impl<K, S> FromIterator<K> for OrderedSet<K, StdHasher<S>>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(StdHasher::default());
        set.extend(iter);
        set
    }
}

impl<K, S> Extend<K> for OrderedSet<K, StdHasher<S>>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, S, const N: usize> From<[K; N]> for OrderedSet<K, StdHasher<S>>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}
