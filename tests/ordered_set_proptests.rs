use ordered_hashset::{CompareOp, OrderedSet};
use proptest::prelude::*;

fn arb_set() -> impl Strategy<Value = OrderedSet<u8>> {
    proptest::collection::vec(0u8..24, 0..32).prop_map(|v| v.into_iter().collect())
}

fn keys(s: &OrderedSet<u8>) -> Vec<u8> {
    s.iter().copied().collect()
}

// Set algebra laws over random small-domain sets, so operands overlap often.
proptest! {
    #[test]
    fn prop_union_membership_is_commutative(a in arb_set(), b in arb_set()) {
        let ab = (&a | &b).unwrap();
        let ba = (&b | &a).unwrap();
        prop_assert_eq!(ab.len(), ba.len());
        prop_assert_eq!(ab.is_subset(&ba), Ok(true));
        // Receiver's keys come first, in the receiver's order.
        prop_assert_eq!(&keys(&ab)[..a.len()], &keys(&a)[..]);
    }

    #[test]
    fn prop_self_algebra(a in arb_set()) {
        prop_assert_eq!((&a & &a).unwrap(), a.clone());
        prop_assert_eq!((&a | &a).unwrap(), a.clone());
        prop_assert!((&a - &a).unwrap().is_empty());
        prop_assert!((&a ^ &a).unwrap().is_empty());
    }

    #[test]
    fn prop_difference_partitions_receiver(a in arb_set(), b in arb_set()) {
        let inter = (&a & &b).unwrap();
        let diff = (&a - &b).unwrap();
        prop_assert_eq!(inter.len() + diff.len(), a.len());
        for k in a.iter() {
            prop_assert_ne!(inter.contains(k), diff.contains(k));
        }
    }

    #[test]
    fn prop_symmetric_difference_disjoint_from_intersection(a in arb_set(), b in arb_set()) {
        let sym = (&a ^ &b).unwrap();
        let inter = (&a & &b).unwrap();
        prop_assert!((&sym & &inter).unwrap().is_empty());
        prop_assert_eq!(sym.len() + inter.len(), (&a | &b).unwrap().len());
    }

    #[test]
    fn prop_updates_match_pure_forms(a in arb_set(), b in arb_set()) {
        let mut u = a.clone();
        u.union_update(&b).unwrap();
        prop_assert_eq!(u, (&a | &b).unwrap());
        let mut i = a.clone();
        i.intersection_update(keys(&b)).unwrap();
        prop_assert_eq!(i, (&a & &b).unwrap());
        let mut d = a.clone();
        d.difference_update(&b).unwrap();
        prop_assert_eq!(d, (&a - &b).unwrap());
        let mut x = a.clone();
        x.symmetric_difference_update(keys(&b)).unwrap();
        prop_assert_eq!(x, (&a ^ &b).unwrap());
    }

    #[test]
    fn prop_rebuild_and_full_slice_round_trip(a in arb_set()) {
        prop_assert_eq!(a.slice(0, a.len() as isize), a.clone());
        let rebuilt: OrderedSet<u8> = a.iter().copied().collect();
        prop_assert_eq!(&rebuilt, &a);
        let owned: Vec<u8> = a.clone().into_iter().collect();
        prop_assert_eq!(owned, keys(&a));
        let back: Vec<u8> = a.iter().rev().copied().collect();
        prop_assert_eq!(back, keys(&a).into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn prop_comparison_matches_vec(a in arb_set(), b in arb_set()) {
        let (ka, kb) = (keys(&a), keys(&b));
        prop_assert_eq!(a.cmp(&b), ka.cmp(&kb));
        prop_assert_eq!(a == b, ka == kb);
        prop_assert_eq!(a.rich_compare(&b, CompareOp::Le), ka <= kb);
        prop_assert_eq!(a.rich_compare(&b, CompareOp::Gt), ka > kb);
    }
}
