use super::common::{clones, init_tracing, reset_clones, tracked, Tracked};
use crate::generic::sequence::Sequence;
use crate::{DynamicList, List, PackedBoolList, SmallInlineList};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Append(i32),
    Remove,
    RemoveAt(usize, bool),
    SetSize(usize),
    Shrink,
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Append),
        1 => Just(Op::Remove),
        2 => (0..40usize, any::<bool>()).prop_map(|(index, fast)| Op::RemoveAt(index, fast)),
        1 => (0..40usize).prop_map(Op::SetSize),
        1 => Just(Op::Shrink),
        1 => Just(Op::Clear),
    ]
}

/// Applies `op` to a `Vec`, the reference behaviour for every list.
fn apply_model(model: &mut Vec<i32>, op: &Op) {
    match *op {
        Op::Append(value) => model.push(value),
        Op::Remove => {
            model.pop();
        }
        Op::RemoveAt(index, fast) if index < model.len() => {
            if fast {
                model.swap_remove(index);
            } else {
                model.remove(index);
            }
        }
        Op::RemoveAt(..) => {}
        Op::SetSize(n) => model.resize(n, 0),
        Op::Shrink => {}
        Op::Clear => model.clear(),
    }
}

fn append_then_check<S: Sequence<i32>>(sequence: &mut S, values: &[i32]) {
    for &value in values {
        let len = sequence.len();
        sequence.append(value).unwrap();
        assert_eq!(sequence.len(), len + 1);
        assert_eq!(sequence.as_slice().last(), Some(&value));
        assert!(sequence.capacity() >= sequence.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, ..ProptestConfig::default()
    })]

    #[test]
    fn test_append_grows_by_one(values in prop::collection::vec(any::<i32>(), 0..100)) {
        append_then_check(&mut List::new(), &values);
        append_then_check(&mut DynamicList::<i32, 4>::new(), &values);
        append_then_check(&mut SmallInlineList::<i32, 4>::new(), &values);
        append_then_check(&mut Vec::new(), &values);
    }

    #[test]
    fn test_dynamic_list_matches_vec(ops in prop::collection::vec(op(), 0..80)) {
        let mut list = DynamicList::<i32, 4>::new();
        let mut model = Vec::new();
        for op in &ops {
            match *op {
                Op::Append(value) => list.append(value).unwrap(),
                Op::Remove => {
                    prop_assert_eq!(list.remove().ok(), model.last().copied());
                }
                Op::RemoveAt(index, fast) => {
                    prop_assert_eq!(list.remove_at(index, fast).ok(), model.get(index).copied());
                }
                Op::SetSize(n) => list.set_size(n).unwrap(),
                Op::Shrink => list.shrink().unwrap(),
                Op::Clear => list.clear(),
            }
            apply_model(&mut model, op);
            prop_assert_eq!(list.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn test_small_list_matches_vec(ops in prop::collection::vec(op(), 0..80)) {
        let mut list = SmallInlineList::<i32, 3>::new();
        let mut model = Vec::new();
        for op in &ops {
            match *op {
                Op::Append(value) => list.append(value).unwrap(),
                Op::Remove => {
                    prop_assert_eq!(list.remove().ok(), model.last().copied());
                }
                Op::RemoveAt(index, fast) => {
                    prop_assert_eq!(list.remove_at(index, fast).ok(), model.get(index).copied());
                }
                Op::SetSize(n) => list.set_size(n).unwrap(),
                Op::Shrink => list.shrink().unwrap(),
                Op::Clear => list.clear(),
            }
            apply_model(&mut model, op);
            prop_assert_eq!(list.as_slice(), model.as_slice());
            if matches!(op, Op::Shrink) {
                prop_assert_eq!(list.is_inline(), model.len() <= 3);
            }
        }
    }

    #[test]
    fn test_reallocations_are_logarithmic(n in 1..2000usize) {
        let mut list = DynamicList::<usize, 4>::new();
        let mut reallocations = 0;
        let mut capacity = list.capacity();
        for value in 0..n {
            list.append(value).unwrap();
            if list.capacity() != capacity {
                capacity = list.capacity();
                reallocations += 1;
            }
        }
        prop_assert!(reallocations <= n.ilog2() as usize + 2);
    }

    #[test]
    fn test_shrink_keeps_minimum(
        items in prop::collection::vec(any::<u8>(), 0..200),
        removed in 0..200usize,
        source in 0..5u8,
    ) {
        let mut list: DynamicList<u8, 8> = match source {
            0 => {
                let mut appended = DynamicList::new();
                for &item in &items {
                    appended.append(item).unwrap();
                }
                appended
            }
            1 => DynamicList::from_slice(&items),
            2 => DynamicList::with_len(items.len()).unwrap(),
            3 => DynamicList::from_slice(&items).clone(),
            _ => DynamicList::from(List::from(items.clone())),
        };
        for _ in 0..removed.min(list.len()) {
            list.remove().unwrap();
        }
        list.shrink().unwrap();
        prop_assert_eq!(list.capacity(), list.len().max(8));
    }

    #[test]
    fn test_used_is_sorted_unique(indices in prop::collection::vec(0..300usize, 0..50)) {
        let mut bits = PackedBoolList::new();
        bits.set_indices(&indices).unwrap();

        let mut expected = indices.clone();
        expected.sort_unstable();
        expected.dedup();
        let used = bits.used();
        prop_assert_eq!(used.as_slice(), expected.as_slice());
        prop_assert_eq!(bits.count(), expected.len());
    }

    #[test]
    fn test_bit_operator_lengths(
        left in prop::collection::vec(any::<bool>(), 0..200),
        right in prop::collection::vec(any::<bool>(), 0..200),
    ) {
        let left = PackedBoolList::from_bools(&left).unwrap();
        let right = PackedBoolList::from_bools(&right).unwrap();
        let shorter = left.len().min(right.len());
        let longer = left.len().max(right.len());

        let mut and = left.clone();
        and &= &right;
        prop_assert_eq!(and.len(), shorter);
        for index in 0..shorter {
            prop_assert_eq!(and.get(index), left.get(index) && right.get(index));
        }

        let mut or = left.clone();
        or |= &right;
        prop_assert_eq!(or.len(), longer);

        let mut xor = left.clone();
        xor ^= &right;
        prop_assert_eq!(xor.len(), longer);
        for index in 0..longer {
            prop_assert_eq!(or.get(index), left.get(index) || right.get(index));
            prop_assert_eq!(xor.get(index), left.get(index) != right.get(index));
        }

        prop_assert_eq!(!&!&left, left.clone());
        prop_assert_eq!((!&left).count(), left.len() - left.count());
    }
}

#[test]
fn test_dynamic_list_scenario() {
    let mut list = DynamicList::<i32, 4>::new();
    for value in 0..=4 {
        list.append(value).unwrap();
    }
    assert_eq!(list.len(), 5);
    assert!(list.capacity() >= 8);
    list.remove_at(1, true).unwrap();
    assert_eq!(list.as_slice(), &[0, 4, 2, 3]);
}

#[test]
fn test_list_resize_scenario() {
    let mut list = List::<i32>::with_len(3).unwrap();
    list.as_mut_slice().copy_from_slice(&[7, 8, 9]);
    list.set_size(5).unwrap();
    assert_eq!(list.as_slice(), &[7, 8, 9, 0, 0]);
    list.set_size(2).unwrap();
    assert_eq!(list.as_slice(), &[7, 8]);
}

#[test]
fn test_growth_moves_without_cloning() {
    init_tracing();
    reset_clones();
    let mut dynamic = DynamicList::<Tracked, 2>::new();
    let mut small = SmallInlineList::<Tracked, 2>::new();
    let mut list = List::new();
    for item in tracked(100) {
        dynamic.append(item.clone()).unwrap();
        small.append(item.clone()).unwrap();
        list.append(item).unwrap();
    }
    assert_eq!(clones(), 200);

    reset_clones();
    dynamic.shrink().unwrap();
    small.shrink().unwrap();
    list.set_size(50).unwrap();
    assert_eq!(clones(), 0);
}

#[test]
fn test_transfer_copies_nothing() {
    let mut source = DynamicList::<Tracked, 4>::from(tracked(10));
    let ptr = source.as_ptr();
    reset_clones();

    let mut target = DynamicList::<Tracked, 16>::new();
    target.transfer_from(&mut source);
    assert_eq!(clones(), 0);
    assert_eq!(target.as_ptr(), ptr);
    assert!(source.is_empty());
    assert_eq!(source.capacity(), 0);

    let mut list = List::from(tracked(3));
    target.transfer_from_list(&mut list);
    assert_eq!(clones(), 0);
    assert!(list.is_empty());
    assert_eq!(target.len(), 3);

    let mut small_source = SmallInlineList::<Tracked, 2>::from(tracked(2));
    let mut small_target = SmallInlineList::<Tracked, 2>::new();
    small_target.transfer_from(&mut small_source);
    assert_eq!(clones(), 0);
    assert!(small_source.is_empty());
    assert_eq!(small_target.as_slice(), &[Tracked(0), Tracked(1)]);
}

#[test]
fn test_into_list_copies_nothing() {
    let mut dynamic = DynamicList::<Tracked, 16>::new();
    for item in tracked(5) {
        dynamic.append(item).unwrap();
    }
    reset_clones();
    let list = dynamic.into_list().unwrap();
    assert_eq!(clones(), 0);
    assert_eq!(list.capacity(), 5);
}

#[test]
fn test_clone_is_deep() {
    let original = DynamicList::<Tracked, 4>::from(tracked(4));
    reset_clones();
    let copy = original.clone();
    assert_eq!(clones(), 4);
    assert_eq!(copy, original);
    assert_ne!(copy.as_ptr(), original.as_ptr());
}

#[test]
fn test_packed_bool_list_scenario() {
    init_tracing();
    let mut bits = PackedBoolList::with_len(10).unwrap();
    bits.set_indices(&[2, 5, 7]).unwrap();
    assert_eq!(bits.used().as_slice(), &[2, 5, 7]);
    bits.unset_indices(&[5]).unwrap();
    assert_eq!(bits.used().as_slice(), &[2, 7]);
}

#[test]
fn test_serde_round_trip_across_types() {
    let dynamic: DynamicList<u32> = crate::dynamic_list![1, 2, 3];
    let json = serde_json::to_string(&dynamic).unwrap();
    assert_eq!(json, "[1,2,3]");

    let list: List<u32> = serde_json::from_str(&json).unwrap();
    let small: SmallInlineList<u32, 4> = serde_json::from_str(&json).unwrap();
    assert_eq!(list.as_slice(), dynamic.as_slice());
    assert_eq!(small.as_slice(), dynamic.as_slice());
}
