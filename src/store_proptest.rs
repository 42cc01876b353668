#![cfg(test)]

// Property tests for OrderedSet kept inside the crate so they can check the
// index, slot map and rank tree directly.

use crate::error::SetError;
use crate::hashing::StdHasher;
use crate::store::OrderedSet;
use proptest::prelude::*;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists. Positions are raw and get reduced modulo a range that
// includes out-of-range and negative values.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize),
    Discard(usize),
    Remove(usize),
    Contains(String),
    IndexOf(usize),
    Pop,
    PopAt(i16),
    Replace(i16, usize),
    DeleteAt(i16),
    Splice(i16, i16, Vec<usize>),
    Slice(i16, i16),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let pos = -14i16..14;
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Add),
            2 => idx.clone().prop_map(OpI::Discard),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => "[a-z]{0,4}".prop_map(OpI::Contains),
            1 => idx.clone().prop_map(OpI::IndexOf),
            1 => Just(OpI::Pop),
            1 => pos.clone().prop_map(OpI::PopAt),
            1 => (pos.clone(), idx.clone()).prop_map(|(p, i)| OpI::Replace(p, i)),
            1 => pos.clone().prop_map(OpI::DeleteAt),
            1 => (pos.clone(), pos.clone(), proptest::collection::vec(idx.clone(), 0..5))
                .prop_map(|(lo, hi, ks)| OpI::Splice(lo, hi, ks)),
            1 => (pos.clone(), pos.clone()).prop_map(|(lo, hi)| OpI::Slice(lo, hi)),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn normalize(position: i16, len: usize) -> Option<usize> {
    let at = if position < 0 {
        position as isize + len as isize
    } else {
        position as isize
    };
    (at >= 0 && (at as usize) < len).then_some(at as usize)
}

fn clamp(lo: i16, hi: i16, len: usize) -> (usize, usize) {
    let len = len as isize;
    let lo = (lo as isize).clamp(0, len);
    let hi = (hi as isize).clamp(lo, len);
    (lo as usize, hi as usize)
}

fn keys_of<S>(s: &OrderedSet<Key, S>) -> Vec<Key> {
    s.iter().cloned().collect()
}

fn check<S>(sut: &OrderedSet<Key, S>, model: &[Key]) -> Result<(), TestCaseError>
where
    S: crate::hashing::KeyHasher<Key> + crate::hashing::KeyHasher<str>,
{
    prop_assert_eq!(keys_of(sut), model.to_vec());
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    for (at, k) in model.iter().enumerate() {
        prop_assert_eq!(sut.index_of(k), Ok(at));
        prop_assert_eq!(sut.index_of(k.0.as_str()), Ok(at));
        prop_assert_eq!(sut.get(at as isize), Ok(k));
        prop_assert_eq!(sut.get(at as isize - model.len() as isize), Ok(k));
    }
    let live = sut.order.iter().filter(|o| o.is_some()).count();
    prop_assert_eq!(live, model.len());
    prop_assert_eq!(sut.slots.len(), model.len());
    Ok(())
}

// Apply one op to both the set and a Vec model, then compare.
fn step<S>(sut: &mut OrderedSet<Key, S>, model: &mut Vec<Key>, pool: &[String], op: OpI) -> Result<(), TestCaseError>
where
    S: crate::hashing::KeyHasher<Key> + crate::hashing::KeyHasher<str> + Clone,
{
    match op {
        OpI::Add(i) => {
            let k = key_from(pool, i);
            let fresh = !model.contains(&k);
            prop_assert_eq!(sut.add(k.clone()), Ok(fresh));
            if fresh {
                model.push(k);
            }
        }
        OpI::Discard(i) => {
            let k = key_from(pool, i);
            let at = model.iter().position(|m| *m == k);
            prop_assert_eq!(sut.discard(&k), at.is_some());
            if let Some(at) = at {
                model.remove(at);
            }
        }
        OpI::Remove(i) => {
            let k = key_from(pool, i);
            match model.iter().position(|m| *m == k) {
                Some(at) => {
                    prop_assert_eq!(sut.remove(&k), Ok(model.remove(at)));
                }
                None => prop_assert_eq!(sut.remove(&k), Err(SetError::NotAMember)),
            }
        }
        OpI::Contains(s) => {
            let has = model.iter().any(|k| k.0 == s);
            prop_assert_eq!(sut.contains(s.as_str()), Ok(has));
        }
        OpI::IndexOf(i) => {
            let k = key_from(pool, i);
            let expected = model
                .iter()
                .position(|m| *m == k)
                .ok_or(SetError::NotAMember);
            prop_assert_eq!(sut.index_of(&k), expected);
        }
        OpI::Pop => match model.pop() {
            Some(k) => prop_assert_eq!(sut.pop(), Ok(k)),
            None => prop_assert!(sut.pop().is_err()),
        },
        OpI::PopAt(p) => match normalize(p, model.len()) {
            Some(at) => prop_assert_eq!(sut.pop_at(p as isize), Ok(model.remove(at))),
            None => {
                let out_of_range = matches!(
                    sut.pop_at(p as isize),
                    Err(SetError::IndexOutOfRange { .. })
                );
                prop_assert!(out_of_range, "pop_at({}) should be out of range", p);
            }
        },
        OpI::DeleteAt(p) => match normalize(p, model.len()) {
            Some(at) => {
                prop_assert_eq!(sut.delete_at(p as isize), Ok(()));
                model.remove(at);
            }
            None => prop_assert!(sut.delete_at(p as isize).is_err()),
        },
        OpI::Replace(p, i) => {
            let k = key_from(pool, i);
            let res = sut.replace(p as isize, k.clone());
            match normalize(p, model.len()) {
                None => {
                    let out_of_range = matches!(res, Err(SetError::IndexOutOfRange { .. }));
                    prop_assert!(out_of_range, "replace({}) should be out of range", p);
                }
                Some(at) => match model.iter().position(|m| *m == k) {
                    Some(other) if other != at => prop_assert_eq!(res, Err(SetError::DuplicateKey)),
                    _ => {
                        let old = std::mem::replace(&mut model[at], k);
                        prop_assert_eq!(res, Ok(old));
                    }
                },
            }
        }
        OpI::Splice(lo, hi, ks) => {
            let (l, h) = clamp(lo, hi, model.len());
            let mut next: Vec<Key> = model[..l].to_vec();
            let suffix = &model[h..];
            for i in &ks {
                let k = key_from(pool, *i);
                if !next.contains(&k) && !suffix.contains(&k) {
                    next.push(k);
                }
            }
            next.extend_from_slice(suffix);
            let incoming: Vec<Key> = ks.iter().map(|i| key_from(pool, *i)).collect();
            prop_assert_eq!(sut.splice(lo as isize, hi as isize, incoming), Ok(()));
            *model = next;
        }
        OpI::Slice(lo, hi) => {
            let (l, h) = clamp(lo, hi, model.len());
            let part = sut.slice(lo as isize, hi as isize);
            check(&part, &model[l..h])?;
        }
        OpI::Clear => {
            sut.clear();
            model.clear();
        }
    }
    check(sut, model)
}

// Property: state-machine equivalence against a Vec model.
// Invariants exercised across random operation sequences:
// - Uniqueness: `add` reports freshness and never duplicates a key.
// - Order: new keys append; re-adding does not move a key; removals shift.
// - Bijection: len == live sequence slots == slot count, and
//   get(index_of(k)) == k for every member, before and after compaction.
// - Positional ops honour negative positions and reject out-of-range ones.
// - Slices and splices match the model's clamped Vec operations.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: OrderedSet<Key> = OrderedSet::new();
        let mut model: Vec<Key> = Vec::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
        }
        // A clone is compact and equal.
        let copy = sut.clone();
        check(&copy, &model)?;
        prop_assert_eq!(copy, sut);
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstHasher;
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same state machine under worst-case collisions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let build = BuildHasherDefault::<ConstHasher>::default();
        prop_assert_eq!(build.hash_one("a"), build.hash_one("b"));
        let mut sut: OrderedSet<Key, StdHasher<BuildHasherDefault<ConstHasher>>> =
            OrderedSet::with_hasher(StdHasher::new(build));
        let mut model: Vec<Key> = Vec::new();
        for op in ops {
            step(&mut sut, &mut model, &pool, op)?;
        }
    }
}

// Property: long runs of middle deletions keep positions dense through
// several compactions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_dense_positions_under_churn(n in 40usize..300, picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..400)) {
        let mut sut: OrderedSet<usize> = (0..n).collect();
        let mut model: Vec<usize> = (0..n).collect();
        let mut next = n;
        for (round, pick) in picks.into_iter().enumerate() {
            if model.is_empty() || round % 5 == 4 {
                sut.insert(next);
                model.push(next);
                next += 1;
            } else {
                let at = pick.index(model.len());
                prop_assert_eq!(sut.pop_at(at as isize), Ok(model.remove(at)));
            }
            prop_assert_eq!(sut.len(), model.len());
            if let Some(k) = model.last() {
                prop_assert_eq!(sut.index_of(k), Ok(model.len() - 1));
                prop_assert_eq!(sut.get(-1), Ok(k));
            }
        }
        prop_assert_eq!(sut.iter().copied().collect::<Vec<_>>(), model);
    }
}
