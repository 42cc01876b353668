//! Hashing policies.
//!
//! The set never hashes keys itself; it asks its policy `S: KeyHasher<K>`.
//! Policies built on `BuildHasher` never fail. Policies for dynamically
//! typed keys may reject some values with [`Unhashable`].

use crate::error::Unhashable;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Computes the hash of a key, or reports that it has none.
///
/// Implementations must be deterministic for a given policy instance and
/// must agree with `Eq`: equal keys hash equally. Cloning a policy must
/// preserve its hash function, since stored hashes are reused by clones.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> Result<u64, Unhashable>;
}

/// Infallible policy over any `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct StdHasher<S = RandomState>(S);

impl<S> StdHasher<S> {
    pub fn new(build: S) -> Self {
        StdHasher(build)
    }

    pub fn build_hasher(&self) -> &S {
        &self.0
    }
}

impl<S: BuildHasher> StdHasher<S> {
    #[inline]
    pub(crate) fn hash_one<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.0.hash_one(key)
    }
}

impl<K, S> KeyHasher<K> for StdHasher<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> Result<u64, Unhashable> {
        Ok(self.hash_one(key))
    }
}
