//! Serialization hook: a set is externalized as the sequence of its keys.

use crate::hashing::KeyHasher;
use crate::store::OrderedSet;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{Error as _, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound on preallocation from an untrusted length hint.
const MAX_PREALLOCATED_KEYS: usize = 4096;

impl<K, S> Serialize for OrderedSet<K, S>
where
    K: Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

struct OrderedSetVisitor<K, S> {
    marker: PhantomData<fn() -> OrderedSet<K, S>>,
}

impl<'de, K, S> Visitor<'de> for OrderedSetVisitor<K, S>
where
    K: Deserialize<'de> + Eq,
    S: KeyHasher<K> + Default,
{
    type Value = OrderedSet<K, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of set keys")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_KEYS);
        let mut set = OrderedSet::with_capacity_and_hasher(capacity, S::default());
        while let Some(key) = access.next_element()? {
            set.add(key).map_err(A::Error::custom)?;
        }
        Ok(set)
    }
}

impl<'de, K, S> Deserialize<'de> for OrderedSet<K, S>
where
    K: Deserialize<'de> + Eq,
    S: KeyHasher<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedSetVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::OrderedSet;
    use serde::de::value::{Error as ValueError, U32Deserializer};
    use serde::de::{DeserializeSeed, IntoDeserializer, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer};

    // Sequence whose reported length is far larger than what it yields.
    struct OverstatedSeq {
        keys: std::vec::IntoIter<u32>,
    }

    impl<'de> SeqAccess<'de> for OverstatedSeq {
        type Error = ValueError;

        fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, ValueError>
        where
            T: DeserializeSeed<'de>,
        {
            match self.keys.next() {
                Some(k) => {
                    let de: U32Deserializer<ValueError> = k.into_deserializer();
                    seed.deserialize(de).map(Some)
                }
                None => Ok(None),
            }
        }

        fn size_hint(&self) -> Option<usize> {
            Some(usize::MAX / 2)
        }
    }

    impl<'de> Deserializer<'de> for OverstatedSeq {
        type Error = ValueError;

        fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
            visitor.visit_seq(self)
        }

        serde::forward_to_deserialize_any! {
            bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
            bytes byte_buf option unit unit_struct newtype_struct seq tuple
            tuple_struct map struct enum identifier ignored_any
        }
    }

    #[test]
    fn serializes_keys_in_order() {
        let s: OrderedSet<i32> = [3, 1, 2].into();
        assert_eq!(serde_json::to_string(&s).unwrap(), "[3,1,2]");
    }

    #[test]
    fn deserializes_by_bulk_insert() {
        let s: OrderedSet<String> = serde_json::from_str(r#"["b","a","b","c"]"#).unwrap();
        let keys: Vec<&str> = s.iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn length_hint_is_not_trusted_for_allocation() {
        let input = OverstatedSeq {
            keys: vec![4, 2, 4].into_iter(),
        };
        let s = OrderedSet::<u32>::deserialize(input).unwrap();
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![4, 2]);
    }

    #[test]
    fn round_trip_preserves_order() {
        let mut s: OrderedSet<u32> = (0..20).rev().collect();
        s.discard(&7);
        let json = serde_json::to_string(&s).unwrap();
        let back: OrderedSet<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
