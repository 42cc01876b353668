//! Set algebra over `OrderedSet`.
//!
//! Everything here is written against the public store primitives
//! (`contains`, `add`, `clone`, iteration) and never reaches into the
//! index or sequence directly.
//!
//! Results keep sequence order: the receiver's keys first, in its order,
//! then any keys contributed by the other operand, in the operand's order.

use crate::error::SetError;
use crate::hashing::KeyHasher;
use crate::store::OrderedSet;
use std::borrow::Cow;

/// Right-hand operand of a set operation.
///
/// `Keys` are materialized into a fresh set, in order, using the
/// receiver's hashing policy before membership is tested against them.
/// `Unsupported` stands for a foreign value with no keys to offer; every
/// operation answers it with the soft [`SetError::UnsupportedOperand`].
#[derive(Debug)]
pub enum Operand<'a, K, S> {
    Set(&'a OrderedSet<K, S>),
    Keys(Vec<K>),
    Unsupported(&'static str),
}

impl<'a, K, S> Operand<'a, K, S> {
    pub fn keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Operand::Keys(keys.into_iter().collect())
    }

    /// A value of type `T` that cannot take part in set algebra.
    pub fn unsupported<T: ?Sized>() -> Self {
        Operand::Unsupported(core::any::type_name::<T>())
    }
}

impl<'a, K, S> From<&'a OrderedSet<K, S>> for Operand<'a, K, S> {
    fn from(set: &'a OrderedSet<K, S>) -> Self {
        Operand::Set(set)
    }
}

impl<'a, K, S> From<Vec<K>> for Operand<'a, K, S> {
    fn from(keys: Vec<K>) -> Self {
        Operand::Keys(keys)
    }
}

impl<'a, K: Clone, S> From<&'a [K]> for Operand<'a, K, S> {
    fn from(keys: &'a [K]) -> Self {
        Operand::Keys(keys.to_vec())
    }
}

impl<'a, K, S> Operand<'a, K, S>
where
    K: Clone + Eq,
    S: KeyHasher<K> + Clone,
{
    fn materialize(self, hasher: &S) -> Result<Cow<'a, OrderedSet<K, S>>, SetError> {
        match self {
            Operand::Set(set) => Ok(Cow::Borrowed(set)),
            Operand::Keys(keys) => Ok(Cow::Owned(OrderedSet::from_keys_with_hasher(
                keys,
                hasher.clone(),
            )?)),
            Operand::Unsupported(name) => Err(SetError::UnsupportedOperand(name)),
        }
    }
}

impl<K, S> OrderedSet<K, S>
where
    K: Clone + Eq,
    S: KeyHasher<K> + Clone,
{
    /// Keys of `self` passing `keep`, in `self`'s order. Stored hashes are
    /// carried over, so kept keys are not hashed again.
    fn filtered<F>(&self, mut keep: F) -> Result<Self, SetError>
    where
        F: FnMut(&K) -> Result<bool, SetError>,
    {
        let mut out = Self::with_hasher(self.hasher.clone());
        for entry in self.entries() {
            if keep(&entry.key)? {
                out.push_unique(entry.key.clone(), entry.hash);
            }
        }
        Ok(out)
    }

    /// `self` followed by the keys of `other` not already present.
    pub fn union<'a>(&self, other: impl Into<Operand<'a, K, S>>) -> Result<Self, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let mut out = self.clone();
        match other.into() {
            Operand::Set(set) => {
                for key in set.iter() {
                    out.add(key.clone())?;
                }
            }
            Operand::Keys(keys) => out.update(keys)?,
            Operand::Unsupported(name) => return Err(SetError::UnsupportedOperand(name)),
        }
        Ok(out)
    }

    /// Keys of `self` that `other` also holds, in `self`'s order.
    pub fn intersection<'a>(&self, other: impl Into<Operand<'a, K, S>>) -> Result<Self, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let other = other.into().materialize(&self.hasher)?;
        self.filtered(|key| other.contains(key))
    }

    /// Keys of `self` that `other` does not hold, in `self`'s order.
    pub fn difference<'a>(&self, other: impl Into<Operand<'a, K, S>>) -> Result<Self, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let other = other.into().materialize(&self.hasher)?;
        self.filtered(|key| Ok(!other.contains(key)?))
    }

    /// `self - other` followed by `other - self`.
    pub fn symmetric_difference<'a>(
        &self,
        other: impl Into<Operand<'a, K, S>>,
    ) -> Result<Self, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let other = other.into().materialize(&self.hasher)?;
        let mut out = self.filtered(|key| Ok(!other.contains(key)?))?;
        for key in other.iter() {
            if !self.contains(key)? {
                out.add(key.clone())?;
            }
        }
        Ok(out)
    }

    /// Replace `self` with `self | other`; unchanged on error.
    pub fn union_update<'a>(&mut self, other: impl Into<Operand<'a, K, S>>) -> Result<(), SetError>
    where
        K: 'a,
        S: 'a,
    {
        *self = self.union(other)?;
        Ok(())
    }

    /// Replace `self` with `self & other`; unchanged on error.
    pub fn intersection_update<'a>(
        &mut self,
        other: impl Into<Operand<'a, K, S>>,
    ) -> Result<(), SetError>
    where
        K: 'a,
        S: 'a,
    {
        *self = self.intersection(other)?;
        Ok(())
    }

    /// Replace `self` with `self - other`; unchanged on error.
    pub fn difference_update<'a>(
        &mut self,
        other: impl Into<Operand<'a, K, S>>,
    ) -> Result<(), SetError>
    where
        K: 'a,
        S: 'a,
    {
        *self = self.difference(other)?;
        Ok(())
    }

    /// Replace `self` with `self ^ other`; unchanged on error.
    pub fn symmetric_difference_update<'a>(
        &mut self,
        other: impl Into<Operand<'a, K, S>>,
    ) -> Result<(), SetError>
    where
        K: 'a,
        S: 'a,
    {
        *self = self.symmetric_difference(other)?;
        Ok(())
    }

    /// Whether every key of `self` is in `other`.
    pub fn is_subset<'a>(&self, other: impl Into<Operand<'a, K, S>>) -> Result<bool, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let other = other.into().materialize(&self.hasher)?;
        if self.len() > other.len() {
            return Ok(false);
        }
        for key in self.iter() {
            if !other.contains(key)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether every key of `other` is in `self`.
    pub fn is_superset<'a>(&self, other: impl Into<Operand<'a, K, S>>) -> Result<bool, SetError>
    where
        K: 'a,
        S: 'a,
    {
        let other = other.into().materialize(&self.hasher)?;
        other.is_subset(self)
    }
}

macro_rules! set_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<'a, 'b, K, S> core::ops::$trait<&'b OrderedSet<K, S>> for &'a OrderedSet<K, S>
        where
            K: Clone + Eq,
            S: KeyHasher<K> + Clone,
        {
            type Output = Result<OrderedSet<K, S>, SetError>;

            fn $method(self, rhs: &'b OrderedSet<K, S>) -> Self::Output {
                self.$op(rhs)
            }
        }
    };
}

set_operator!(BitOr, bitor, union);
set_operator!(BitAnd, bitand, intersection);
set_operator!(Sub, sub, difference);
set_operator!(BitXor, bitxor, symmetric_difference);
