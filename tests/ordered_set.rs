// OrderedSet integration suite.
//
// Each test documents the behavior verified. Core invariants exercised:
// - Uniqueness: each distinct key is stored once, at its first position.
// - Order: new keys append; re-adding never moves a key.
// - Positions: dense, negative positions count from the end.
// - Fail-fast: a cursor errors once the set's size changes under it.
// - Hashing policy: unhashable keys surface as UnhashableKey, except in
//   `discard`, which treats them as absent.
use ordered_hashset::{
    CompareOp, KeyHasher, Operand, OrderedSet, SetError, StdHasher, Unhashable,
};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

fn keys<K: Clone, S>(s: &OrderedSet<K, S>) -> Vec<K> {
    s.iter().cloned().collect()
}

// Test: construction collapses duplicates onto the first occurrence.
#[test]
fn construction_keeps_first_occurrence() {
    let s: OrderedSet<i32> = [3, 1, 2, 1].into();
    assert_eq!(keys(&s), vec![3, 1, 2]);
    assert_eq!(s.len(), 3);
}

// Test: pop without a position takes the last key.
#[test]
fn pop_takes_last() {
    let mut s: OrderedSet<i32> = [3, 1, 2].into();
    assert_eq!(s.pop(), Ok(2));
    assert_eq!(keys(&s), vec![3, 1]);
}

// Test: strict vs lenient removal of an absent key.
#[test]
fn remove_absent_fails_discard_does_not() {
    let mut s: OrderedSet<i32> = [3, 1].into();
    assert_eq!(s.remove(&9), Err(SetError::NotAMember));
    assert!(!s.discard(&9));
    assert_eq!(keys(&s), vec![3, 1]);
}

// Test: lexicographic equality and ordering.
#[test]
fn lexicographic_comparison() {
    let a: OrderedSet<i32> = [1, 2, 3].into();
    let b: OrderedSet<i32> = [1, 2, 3].into();
    let short: OrderedSet<i32> = [1, 2].into();
    assert!(a == b);
    assert!(short < a);
    assert!(short.rich_compare(&a, CompareOp::Lt));
    assert!(!short.rich_compare(&a, CompareOp::Eq));
    // Same members, different order: not equal as sequences.
    let rev: OrderedSet<i32> = [3, 2, 1].into();
    assert!(a != rev);
    assert_eq!(a.is_subset(&rev), Ok(true));
}

// Test: a cursor fails fast after the set grows mid-iteration.
#[test]
fn cursor_detects_growth() {
    let mut s: OrderedSet<i32> = [1, 2, 3].into();
    let mut cursor = s.cursor();
    assert_eq!(cursor.advance(&s), Some(Ok(&1)));
    s.add(4).unwrap();
    assert_eq!(
        cursor.advance(&s),
        Some(Err(SetError::ConcurrentModification))
    );
    assert_eq!(
        cursor.advance(&s),
        Some(Err(SetError::ConcurrentModification))
    );
}

// Test: removing the current key while iterating is caught as well.
#[test]
fn cursor_detects_removal_during_iteration() {
    let mut s: OrderedSet<i32> = (0..5).collect();
    let mut cursor = s.cursor();
    let mut seen = Vec::new();
    let err = loop {
        match cursor.advance(&s) {
            Some(Ok(k)) => {
                let k = *k;
                seen.push(k);
                if k == 2 {
                    s.discard(&k);
                }
            }
            Some(Err(e)) => break Some(e),
            None => break None,
        }
    };
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(err, Some(SetError::ConcurrentModification));
}

// Test: slicing returns a new set with the clamped range.
#[test]
fn slice_middle() {
    let s: OrderedSet<i32> = [1, 2, 3, 4].into();
    let expected: OrderedSet<i32> = [2, 3].into();
    assert_eq!(s.slice(1, 3), expected);
    assert_eq!(s.slice(0, s.len() as isize), s);
}

// Test: positions stay dense and index_of/get agree after mixed mutations.
#[test]
fn bijection_after_mixed_mutations() {
    let mut s: OrderedSet<String> = OrderedSet::new();
    for w in "the quick brown fox jumps over the lazy dog".split(' ') {
        s.insert(w.to_string());
    }
    assert_eq!(s.len(), 8);
    s.discard("quick");
    s.delete_at(0).unwrap();
    s.replace(-1, "cat".to_string()).unwrap();
    s.splice(1, 2, ["red".to_string(), "brown".to_string()]).unwrap();
    assert_eq!(
        keys(&s),
        vec!["brown", "red", "jumps", "over", "lazy", "cat"]
    );
    for (at, k) in keys(&s).iter().enumerate() {
        assert_eq!(s.index_of(k.as_str()), Ok(at));
        assert_eq!(s.get(at as isize), Ok(k));
    }
}

// Test: Index<usize> panics past the end.
#[test]
#[should_panic(expected = "out of range")]
fn index_operator_panics_out_of_range() {
    let s: OrderedSet<i32> = [1].into();
    let _ = s[1];
}

// A dynamically typed key whose hashing policy rejects lists, the way a
// host runtime rejects mutable containers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd)]
enum Value {
    Int(i64),
    Str(String),
    List(Vec<i64>),
}

#[derive(Clone, Default)]
struct ValueHasher(RandomState);

impl KeyHasher<Value> for ValueHasher {
    fn hash_key(&self, key: &Value) -> Result<u64, Unhashable> {
        match key {
            Value::Int(i) => Ok(self.0.hash_one(i)),
            Value::Str(s) => Ok(self.0.hash_one(s)),
            Value::List(_) => Err(Unhashable),
        }
    }
}

fn values(items: Vec<Value>) -> Result<OrderedSet<Value, ValueHasher>, SetError> {
    OrderedSet::from_keys_with_hasher(items, ValueHasher::default())
}

// Test: unhashable keys are rejected by lookups and mutators.
#[test]
fn unhashable_keys_are_reported() {
    let list = Value::List(vec![1]);
    let mut s = values(vec![Value::Int(1), Value::Str("a".into())]).unwrap();
    assert_eq!(s.contains(&list), Err(SetError::UnhashableKey));
    assert_eq!(s.add(list.clone()), Err(SetError::UnhashableKey));
    assert_eq!(s.index_of(&list), Err(SetError::UnhashableKey));
    assert_eq!(s.replace(0, list.clone()), Err(SetError::UnhashableKey));
    assert_eq!(s.len(), 2);
    assert!(values(vec![Value::Int(1), list]).is_err());
}

// Test: discard swallows unhashable keys; remove reports them as absent.
#[test]
fn discard_treats_unhashable_as_absent() {
    let list = Value::List(vec![]);
    let mut s = values(vec![Value::Int(7)]).unwrap();
    assert!(!s.discard(&list));
    assert_eq!(s.remove(&list), Err(SetError::NotAMember));
    assert_eq!(s.len(), 1);
}

// Test: splice and *_update are atomic when a key is unhashable.
#[test]
fn failed_bulk_operations_leave_set_untouched() {
    let mut s = values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
    let before = s.clone();
    let res = s.splice(0, 1, vec![Value::Int(9), Value::List(vec![2])]);
    assert_eq!(res, Err(SetError::UnhashableKey));
    assert_eq!(s, before);

    let res = s.union_update(vec![Value::Int(4), Value::List(vec![])]);
    assert_eq!(res, Err(SetError::UnhashableKey));
    let res = s.intersection_update(vec![Value::List(vec![]), Value::Int(1)]);
    assert_eq!(res, Err(SetError::UnhashableKey));
    assert_eq!(s, before);
}

// Test: an unsupported operand is a soft error callers can match on.
#[test]
fn unsupported_operand_allows_fallback() {
    let a: OrderedSet<i32> = [1, 2].into();
    let res = a.symmetric_difference(Operand::unsupported::<f64>());
    match res {
        Err(e) if e.is_unsupported() => {}
        other => panic!("expected a soft unsupported error, got {:?}", other),
    }
}

// Test: a policy other than RandomState plugs into the same API.
#[test]
fn custom_build_hasher_policy() {
    #[derive(Clone, Default)]
    struct Fnv;
    impl BuildHasher for Fnv {
        type Hasher = FnvHasher;
        fn build_hasher(&self) -> FnvHasher {
            FnvHasher(0xcbf29ce484222325)
        }
    }
    struct FnvHasher(u64);
    impl std::hash::Hasher for FnvHasher {
        fn write(&mut self, bytes: &[u8]) {
            for b in bytes {
                self.0 ^= *b as u64;
                self.0 = self.0.wrapping_mul(0x100000001b3);
            }
        }
        fn finish(&self) -> u64 {
            self.0
        }
    }

    fn policy_hash<T: Hash>(t: &T) -> u64 {
        StdHasher::new(Fnv).hash_key(t).unwrap()
    }
    assert_eq!(policy_hash(&"abc"), policy_hash(&"abc"));

    let mut s: OrderedSet<&str, StdHasher<Fnv>> = OrderedSet::default();
    s.extend(["x", "y", "x", "z"]);
    assert_eq!(keys(&s), vec!["x", "y", "z"]);
    let t: OrderedSet<&str, StdHasher<Fnv>> = ["z", "w"].into_iter().collect();
    assert_eq!(keys(&(&s | &t).unwrap()), vec!["x", "y", "z", "w"]);
}
