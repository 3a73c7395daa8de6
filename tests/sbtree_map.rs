use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sbtree::{Error, Rank, SbTreeMap};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates random keys in a range small enough to force collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Mirrors the keep-first insert on the model map: only a vacant key is
/// written, and the return reports whether the write happened.
fn model_insert(model: &mut BTreeMap<i64, i64>, key: i64, value: i64) -> bool {
    use std::collections::btree_map::Entry;
    match model.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            true
        }
        Entry::Occupied(_) => false,
    }
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    At(i64),
    ContainsKey(i64),
    Count(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::At),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::Count),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both SbTreeMap and a
    /// keep-first-modeled BTreeMap and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = SbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    let (cursor, inserted) = sb_map.insert(*k, *v);
                    let bt_inserted = model_insert(&mut bt_map, *k, *v);
                    prop_assert_eq!(inserted, bt_inserted, "insert({}, {})", k, v);
                    // Either way the cursor names the stored element.
                    let stored = bt_map.get(k).unwrap();
                    prop_assert_eq!(sb_map.cursor_key_value(cursor), Ok((k, stored)), "insert({}, {}) cursor", k, v);
                }
                MapOp::Remove(k) => {
                    let sb_result = sb_map.remove(k);
                    let bt_result = bt_map.remove(k);
                    prop_assert_eq!(sb_result, bt_result, "remove({})", k);
                }
                MapOp::Get(k) => {
                    let sb_result = sb_map.get(k);
                    let bt_result = bt_map.get(k);
                    prop_assert_eq!(sb_result, bt_result, "get({})", k);
                }
                MapOp::At(k) => {
                    let sb_result = sb_map.at(k);
                    let bt_result = bt_map.get(k).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(sb_result, bt_result, "at({})", k);
                }
                MapOp::ContainsKey(k) => {
                    let sb_result = sb_map.contains_key(k);
                    let bt_result = bt_map.contains_key(k);
                    prop_assert_eq!(sb_result, bt_result, "contains_key({})", k);
                }
                MapOp::Count(k) => {
                    let sb_result = sb_map.count(k);
                    let bt_result = usize::from(bt_map.contains_key(k));
                    prop_assert_eq!(sb_result, bt_result, "count({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    let sb_result = sb_map.get_key_value(k);
                    let bt_result = bt_map.get_key_value(k);
                    prop_assert_eq!(sb_result, bt_result, "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    let sb_result = sb_map.first_key_value();
                    let bt_result = bt_map.first_key_value();
                    prop_assert_eq!(sb_result, bt_result, "first_key_value");
                }
                MapOp::LastKeyValue => {
                    let sb_result = sb_map.last_key_value();
                    let bt_result = bt_map.last_key_value();
                    prop_assert_eq!(sb_result, bt_result, "last_key_value");
                }
                MapOp::PopFirst => {
                    let sb_result = sb_map.pop_first();
                    let bt_result = bt_map.pop_first();
                    prop_assert_eq!(sb_result, bt_result, "pop_first");
                }
                MapOp::PopLast => {
                    let sb_result = sb_map.pop_last();
                    let bt_result = bt_map.pop_last();
                    prop_assert_eq!(sb_result, bt_result, "pop_last");
                }
            }
            prop_assert_eq!(sb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(sb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// First insert of a key wins; later inserts with the same key change
    /// nothing and report the existing element.
    #[test]
    fn insert_never_overwrites(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = SbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            let (cursor, inserted) = sb_map.insert(*k, *v);
            prop_assert_eq!(inserted, model_insert(&mut bt_map, *k, *v), "insert({}, {}) flag", k, v);
            prop_assert_eq!(sb_map.cursor_value(cursor), Ok(bt_map.get(k).unwrap()), "insert({}, {}) cursor value", k, v);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "keep-first content mismatch");
    }

    /// Tests that iteration order matches BTreeMap in every iterator flavor.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        // Forward iteration
        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "iter() mismatch");

        // Reverse iteration
        let sb_rev: Vec<_> = sb_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_rev, &bt_rev, "iter().rev() mismatch");

        // Keys
        let sb_keys: Vec<_> = sb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&sb_keys, &bt_keys, "keys() mismatch");

        // Values
        let sb_vals: Vec<_> = sb_map.values().copied().collect();
        let bt_vals: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&sb_vals, &bt_vals, "values() mismatch");

        // into_iter
        let sb_into: Vec<_> = sb_map.clone().into_iter().collect();
        let bt_into: Vec<_> = bt_map.clone().into_iter().collect();
        prop_assert_eq!(&sb_into, &bt_into, "into_iter() mismatch");

        // into_keys
        let sb_into_keys: Vec<_> = sb_map.clone().into_keys().collect();
        let bt_into_keys: Vec<_> = bt_map.clone().into_keys().collect();
        prop_assert_eq!(&sb_into_keys, &bt_into_keys, "into_keys() mismatch");

        // into_values
        let sb_into_vals: Vec<_> = sb_map.clone().into_values().collect();
        let bt_into_vals: Vec<_> = bt_map.clone().into_values().collect();
        prop_assert_eq!(&sb_into_vals, &bt_into_vals, "into_values() mismatch");
    }

    /// Tests ExactSizeIterator and DoubleEndedIterator behavior.
    #[test]
    fn iter_size_and_double_ended(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();

        let iter = sb_map.iter();
        let len = iter.len();
        prop_assert_eq!(len, sb_map.len(), "ExactSizeIterator len mismatch");

        // Alternating front/back should yield all elements exactly once.
        let mut from_front = Vec::new();
        let mut from_back = Vec::new();
        let mut iter = sb_map.iter();
        let mut toggle = true;
        loop {
            if toggle {
                if let Some(item) = iter.next() {
                    from_front.push(item);
                } else {
                    break;
                }
            } else if let Some(item) = iter.next_back() {
                from_back.push(item);
            } else {
                break;
            }
            toggle = !toggle;
        }
        prop_assert_eq!(from_front.len() + from_back.len(), sb_map.len());

        from_back.reverse();
        from_front.extend(from_back);
        let expected: Vec<_> = sb_map.iter().collect();
        prop_assert_eq!(from_front, expected, "meet-in-the-middle traversal mismatch");
    }

    /// Tests get_mut applies mutations identically to BTreeMap.
    #[test]
    fn get_mut_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        keys_to_mutate in proptest::collection::vec(key_strategy(), 100),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for k in &keys_to_mutate {
            if let Some(v) = sb_map.get_mut(k) {
                *v += 1;
            }
            if let Some(v) = bt_map.get_mut(k) {
                *v += 1;
            }
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "get_mut mismatch");
    }

    /// Tests at_mut mutates present keys and rejects absent ones.
    #[test]
    fn at_mut_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        keys_to_mutate in proptest::collection::vec(key_strategy(), 100),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for k in &keys_to_mutate {
            match sb_map.at_mut(k) {
                Ok(v) => *v = v.wrapping_mul(3),
                Err(err) => prop_assert_eq!(err, Error::KeyNotFound, "at_mut({}) error", k),
            }
            if let Some(v) = bt_map.get_mut(k) {
                *v = v.wrapping_mul(3);
            }
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "at_mut mismatch");
    }

    /// Tests retain matches BTreeMap.
    #[test]
    fn retain_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        sb_map.retain(|k, _v| k % 3 != 0);
        bt_map.retain(|k, _v| k % 3 != 0);

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "retain mismatch");
        prop_assert_eq!(sb_map.len(), bt_map.len(), "retain len mismatch");
    }

    /// Tests that clear produces an empty, reusable map.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        sb_map.clear();
        prop_assert!(sb_map.is_empty());
        prop_assert_eq!(sb_map.len(), 0);
        prop_assert_eq!(sb_map.iter().count(), 0);

        let (_, inserted) = sb_map.insert(1, 1);
        prop_assert!(inserted, "map should be usable after clear");
    }

    /// Tests remove_entry matches BTreeMap.
    #[test]
    fn remove_entry_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        keys_to_remove in proptest::collection::vec(key_strategy(), TEST_SIZE / 5),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for k in &keys_to_remove {
            let sb_result = sb_map.remove_entry(k);
            let bt_result = bt_map.remove_entry(k);
            prop_assert_eq!(sb_result, bt_result, "remove_entry({})", k);
        }

        prop_assert_eq!(sb_map.len(), bt_map.len());
    }
}

// ─── Entry API ───────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests the Entry API matches BTreeMap behavior.
    #[test]
    fn entry_api_matches_btreemap(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        entry_keys in proptest::collection::vec(key_strategy(), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = initial.iter().cloned().collect();

        for k in &entry_keys {
            let sb_val = *sb_map.entry(*k).or_insert(999);
            let bt_val = *bt_map.entry(*k).or_insert(999);
            prop_assert_eq!(sb_val, bt_val, "entry({}).or_insert", k);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "entry API content mismatch");
    }

    /// Tests and_modify + or_insert pattern.
    #[test]
    fn entry_and_modify_or_insert(keys in proptest::collection::vec(key_strategy(), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = SbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for k in &keys {
            sb_map.entry(*k).and_modify(|v| *v += 1).or_insert(1);
            bt_map.entry(*k).and_modify(|v| *v += 1).or_insert(1);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "and_modify/or_insert mismatch");
    }

    /// Tests or_insert_with matches BTreeMap.
    #[test]
    fn entry_or_insert_with(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = initial.iter().cloned().collect();

        for k in &keys {
            let sb_val = *sb_map.entry(*k).or_insert_with(|| k.wrapping_mul(2));
            let bt_val = *bt_map.entry(*k).or_insert_with(|| k.wrapping_mul(2));
            prop_assert_eq!(sb_val, bt_val, "or_insert_with({}) value mismatch", k);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "or_insert_with content mismatch");
    }

    /// Tests or_insert_with_key matches BTreeMap.
    #[test]
    fn entry_or_insert_with_key(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = initial.iter().cloned().collect();

        for k in &keys {
            let sb_val = *sb_map.entry(*k).or_insert_with_key(|key| key.wrapping_add(100));
            let bt_val = *bt_map.entry(*k).or_insert_with_key(|key| key.wrapping_add(100));
            prop_assert_eq!(sb_val, bt_val, "or_insert_with_key({}) value mismatch", k);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "or_insert_with_key content mismatch");
    }

    /// Tests or_default matches BTreeMap.
    #[test]
    fn entry_or_default(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = initial.iter().cloned().collect();

        for k in &keys {
            let sb_val = *sb_map.entry(*k).or_default();
            let bt_val = *bt_map.entry(*k).or_default();
            prop_assert_eq!(sb_val, bt_val, "or_default({}) value mismatch", k);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "or_default content mismatch");
    }

    /// Tests insert_entry overwrites through the entry even though plain
    /// insert does not.
    #[test]
    fn entry_insert_entry(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        insertions in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();

        for (k, v) in &insertions {
            let sb_entry = sb_map.entry(*k).insert_entry(*v);
            prop_assert_eq!(*sb_entry.key(), *k, "insert_entry key mismatch");
            prop_assert_eq!(*sb_entry.get(), *v, "insert_entry value mismatch");
        }

        // Later insertions overwrite earlier ones for duplicate keys.
        let expected: BTreeMap<i64, i64> = insertions.iter().cloned().collect();
        for (k, v) in &expected {
            prop_assert_eq!(sb_map.get(k), Some(v), "insert_entry final value mismatch for key {}", k);
        }
    }

    /// Tests VacantEntry::into_key returns the correct key.
    #[test]
    fn vacant_entry_into_key(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        new_keys in proptest::collection::vec(key_strategy(), 100),
    ) {
        let sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();

        for k in &new_keys {
            if !sb_map.contains_key(k) {
                let mut test_map = sb_map.clone();
                if let sbtree::sbtree_map::Entry::Vacant(v) = test_map.entry(*k) {
                    let returned_key = v.into_key();
                    prop_assert_eq!(returned_key, *k, "into_key() returned wrong key");
                }
            }
        }
    }

    /// Tests first_entry and last_entry agree with first/last_key_value.
    #[test]
    fn first_last_entry_matches(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        if let Some(entry) = sb_map.first_entry() {
            let bt_first = bt_map.first_key_value().unwrap();
            prop_assert_eq!(entry.key(), bt_first.0, "first_entry key");
            prop_assert_eq!(entry.get(), bt_first.1, "first_entry value");
        } else {
            prop_assert!(bt_map.is_empty());
        }

        if let Some(entry) = sb_map.last_entry() {
            let bt_last = bt_map.last_key_value().unwrap();
            prop_assert_eq!(entry.key(), bt_last.0, "last_entry key");
            prop_assert_eq!(entry.get(), bt_last.1, "last_entry value");
        } else {
            prop_assert!(bt_map.is_empty());
        }
    }

    /// Tests first_entry mutation via get_mut and insert.
    #[test]
    fn first_entry_mutation(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        if let Some(mut entry) = sb_map.first_entry() {
            *entry.get_mut() = 999_999;
        }
        if let Some(mut entry) = bt_map.first_entry() {
            *entry.get_mut() = 999_999;
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "first_entry get_mut mismatch");

        if let Some(mut entry) = sb_map.first_entry() {
            let old = entry.insert(888_888);
            prop_assert_eq!(old, 999_999, "first_entry insert should return old value");
        }
        if let Some(mut entry) = bt_map.first_entry() {
            entry.insert(888_888);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "first_entry insert mismatch");
    }

    /// Tests last_entry removal via remove_entry.
    #[test]
    fn last_entry_remove(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        let sb_result = sb_map.last_entry().map(|e| e.remove_entry());
        let bt_result = bt_map.last_entry().map(|e| e.remove_entry());
        prop_assert_eq!(sb_result, bt_result, "last_entry remove_entry mismatch");

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "last_entry remove content mismatch");
    }
}

// ─── Order-statistic operations (compared against a sorted Vec) ──────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests select against a sorted Vec oracle. Ranks are one-based.
    #[test]
    fn select_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().cloned())
            .into_iter()
            .collect();

        prop_assert_eq!(sb_map.len(), sorted.len());

        for (position, (ek, ev)) in sorted.iter().enumerate() {
            let rank = position + 1;
            let sb_result = sb_map.select(rank);
            let expected = Some((ek, ev));
            prop_assert_eq!(sb_result, expected, "select({}) mismatch", rank);
        }

        // Rank zero and ranks past len() are rejected.
        prop_assert_eq!(sb_map.select(0), None);
        prop_assert_eq!(sb_map.select(sorted.len() + 1), None);
        prop_assert_eq!(sb_map.select(sorted.len() + 100), None);
    }

    /// Tests select_mut against a sorted Vec oracle.
    #[test]
    fn select_mut_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().cloned())
            .into_iter()
            .collect();

        for (position, (expected_k, _)) in sorted.iter().enumerate() {
            let rank = position + 1;
            if let Some((k, v)) = sb_map.select_mut(rank) {
                prop_assert_eq!(*k, *expected_k, "select_mut({}) key mismatch", rank);
                *v = rank as i64;
            } else {
                prop_assert!(false, "select_mut({}) returned None unexpectedly", rank);
            }
        }

        for position in 0..sorted.len() {
            let rank = position + 1;
            let (_, v) = sb_map.select(rank).unwrap();
            prop_assert_eq!(*v, rank as i64, "mutation at rank {} did not persist", rank);
        }

        prop_assert_eq!(sb_map.select_mut(0), None);
    }

    /// Tests rank_of against a sorted Vec oracle. Ranks are one-based.
    #[test]
    fn rank_of_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().cloned())
            .into_iter()
            .collect();

        for (position, (k, _)) in sorted.iter().enumerate() {
            let rank = sb_map.rank_of(k);
            prop_assert_eq!(rank, Some(position + 1), "rank_of({})", k);
        }

        for probe in [i64::MIN, i64::MAX, 99_999, -99_999] {
            if !sb_map.contains_key(&probe) {
                prop_assert_eq!(sb_map.rank_of(&probe), None, "rank_of({}) should be None", probe);
            }
        }
    }

    /// Tests Index<Rank> and IndexMut<Rank>.
    #[test]
    fn index_by_rank_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().cloned())
            .into_iter()
            .collect();

        for (position, (_, expected_v)) in sorted.iter().enumerate() {
            prop_assert_eq!(sb_map[Rank(position + 1)], *expected_v, "Index[Rank({})]", position + 1);
        }

        sb_map[Rank(1)] = 42;
        prop_assert_eq!(sb_map[Rank(1)], 42, "IndexMut[Rank(1)]");
    }

    /// Tests that rank_of and select invert each other.
    #[test]
    fn rank_select_roundtrip(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();

        for rank in 1..=sb_map.len() {
            let (k, _v) = sb_map.select(rank).unwrap();
            let recovered_rank = sb_map.rank_of(k).unwrap();
            prop_assert_eq!(recovered_rank, rank, "roundtrip rank mismatch at rank {}", rank);
        }
    }

    /// Tests order-statistic operations after a mix of inserts and removes.
    #[test]
    fn order_stats_after_mutations(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = SbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    sb_map.insert(*k, *v);
                    model_insert(&mut bt_map, *k, *v);
                }
                MapOp::Remove(k) => {
                    sb_map.remove(k);
                    bt_map.remove(k);
                }
                _ => {}
            }
        }

        let sorted: Vec<(i64, i64)> = bt_map.into_iter().collect();
        prop_assert_eq!(sb_map.len(), sorted.len());

        // Spot-check ranks at various positions.
        let check_positions = [0, 1, sorted.len() / 4, sorted.len() / 2, sorted.len() * 3 / 4, sorted.len().saturating_sub(1)];
        for &position in &check_positions {
            if position < sorted.len() {
                let rank = position + 1;
                let sb_result = sb_map.select(rank);
                let expected = Some((&sorted[position].0, &sorted[position].1));
                prop_assert_eq!(sb_result, expected, "select({}) after mutations", rank);

                let recovered = sb_map.rank_of(&sorted[position].0);
                prop_assert_eq!(recovered, Some(rank), "rank_of after mutations at rank {}", rank);
            }
        }
    }
}

// ─── Extend, iter_mut, and trait impls ───────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests Extend matches BTreeMap (both are last-wins).
    #[test]
    fn extend_matches_btreemap(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        extra in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
    ) {
        let mut sb_map: SbTreeMap<i64, i64> = initial.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = initial.iter().cloned().collect();

        sb_map.extend(extra.iter().cloned());
        bt_map.extend(extra.iter().cloned());

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "extend mismatch");
    }

    /// Tests iter_mut produces the same sequence and allows mutation.
    #[test]
    fn iter_mut_matches(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for (_, v) in sb_map.iter_mut() {
            *v = v.wrapping_add(1);
        }
        for (_, v) in bt_map.iter_mut() {
            *v = v.wrapping_add(1);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "iter_mut mismatch");
    }

    /// Tests IterMut double-ended traversal with alternating next/next_back.
    #[test]
    fn iter_mut_double_ended_traversal(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        let mut sb_keys = Vec::new();
        let mut bt_keys = Vec::new();

        {
            let mut sb_iter = sb_map.iter_mut();
            let mut bt_iter = bt_map.iter_mut();

            let mut toggle = true;
            loop {
                if toggle {
                    match (sb_iter.next(), bt_iter.next()) {
                        (Some((sb_k, sb_v)), Some((bt_k, bt_v))) => {
                            prop_assert_eq!(*sb_k, *bt_k, "iter_mut next() key mismatch");
                            prop_assert_eq!(*sb_v, *bt_v, "iter_mut next() value mismatch");
                            sb_keys.push(*sb_k);
                            bt_keys.push(*bt_k);
                            *sb_v = sb_v.wrapping_add(100);
                            *bt_v = bt_v.wrapping_add(100);
                        }
                        (None, None) => break,
                        (sb, bt) => {
                            prop_assert!(false, "iter_mut next() mismatch: sb={:?}, bt={:?}",
                                sb.map(|(k, _)| k), bt.map(|(k, _)| k));
                        }
                    }
                } else {
                    match (sb_iter.next_back(), bt_iter.next_back()) {
                        (Some((sb_k, sb_v)), Some((bt_k, bt_v))) => {
                            prop_assert_eq!(*sb_k, *bt_k, "iter_mut next_back() key mismatch");
                            prop_assert_eq!(*sb_v, *bt_v, "iter_mut next_back() value mismatch");
                            sb_keys.push(*sb_k);
                            bt_keys.push(*bt_k);
                            *sb_v = sb_v.wrapping_add(200);
                            *bt_v = bt_v.wrapping_add(200);
                        }
                        (None, None) => break,
                        (sb, bt) => {
                            prop_assert!(false, "iter_mut next_back() mismatch: sb={:?}, bt={:?}",
                                sb.map(|(k, _)| k), bt.map(|(k, _)| k));
                        }
                    }
                }
                toggle = !toggle;
            }
        }

        prop_assert_eq!(sb_keys.len(), bt_keys.len(), "iter_mut double-ended total count mismatch");
        prop_assert_eq!(sb_keys.len(), sb_map.len(), "iter_mut should visit all elements");

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "iter_mut double-ended mutations mismatch");

        let mut sb_keys_sorted = sb_keys.clone();
        sb_keys_sorted.sort_unstable();
        let dedup_len = sb_keys_sorted.len();
        sb_keys_sorted.dedup();
        prop_assert_eq!(sb_keys_sorted.len(), dedup_len, "iter_mut yielded duplicate keys");
    }

    /// Tests values_mut produces the same result.
    #[test]
    fn values_mut_matches(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for v in sb_map.values_mut() {
            *v = v.wrapping_mul(2);
        }
        for v in bt_map.values_mut() {
            *v = v.wrapping_mul(2);
        }

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "values_mut mismatch");
    }

    /// Tests FromIterator is last-wins, matching BTreeMap collect.
    #[test]
    fn from_iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &bt_items, "FromIterator mismatch");
    }

    /// Tests Clone produces an equal, structurally independent map.
    #[test]
    fn clone_produces_equal_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let cloned = sb_map.clone();

        prop_assert_eq!(sb_map.len(), cloned.len());
        prop_assert!(sb_map == cloned, "equality must not depend on map identity");

        let sb_items: Vec<_> = sb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let cl_items: Vec<_> = cloned.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&sb_items, &cl_items, "clone content mismatch");
    }

    /// Tests PartialEq / Eq.
    #[test]
    fn eq_matches_btreemap(
        entries_a in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        entries_b in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
    ) {
        let sb_a: SbTreeMap<i64, i64> = entries_a.iter().cloned().collect();
        let sb_b: SbTreeMap<i64, i64> = entries_b.iter().cloned().collect();
        let bt_a: BTreeMap<i64, i64> = entries_a.iter().cloned().collect();
        let bt_b: BTreeMap<i64, i64> = entries_b.iter().cloned().collect();

        prop_assert_eq!(sb_a == sb_b, bt_a == bt_b, "equality mismatch");
    }

    /// Tests Ord / PartialOrd.
    #[test]
    fn ord_matches_btreemap(
        entries_a in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        entries_b in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
    ) {
        let sb_a: SbTreeMap<i64, i64> = entries_a.iter().cloned().collect();
        let sb_b: SbTreeMap<i64, i64> = entries_b.iter().cloned().collect();
        let bt_a: BTreeMap<i64, i64> = entries_a.iter().cloned().collect();
        let bt_b: BTreeMap<i64, i64> = entries_b.iter().cloned().collect();

        prop_assert_eq!(sb_a.cmp(&sb_b), bt_a.cmp(&bt_b), "Ord mismatch");
        prop_assert_eq!(sb_a.partial_cmp(&sb_b), bt_a.partial_cmp(&bt_b), "PartialOrd mismatch");
    }

    /// Tests Index<&Q> returns the same values as BTreeMap.
    #[test]
    fn index_by_key_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sb_map: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().cloned().collect();

        for (k, _) in &entries {
            prop_assert_eq!(sb_map[k], bt_map[k], "Index[&{}] mismatch", k);
        }
    }

    /// Tests that equal maps produce equal hashes.
    #[test]
    fn hash_consistent_for_equal_maps(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let sb_map1: SbTreeMap<i64, i64> = entries.iter().cloned().collect();
        let sb_map2: SbTreeMap<i64, i64> = entries.iter().cloned().collect();

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        sb_map1.hash(&mut h1);
        sb_map2.hash(&mut h2);

        prop_assert_eq!(h1.finish(), h2.finish(), "equal maps should have equal hashes");
    }
}

// ─── Deterministic scenarios ─────────────────────────────────────────────────

#[test]
fn textbook_tree_walkthrough() {
    let mut map = SbTreeMap::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        let (_, inserted) = map.insert(key, key * 10);
        assert!(inserted);
    }

    assert_eq!(map.len(), 7);
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);

    for (position, key) in [1, 3, 4, 5, 7, 8, 9].into_iter().enumerate() {
        assert_eq!(map.rank_of(&key), Some(position + 1));
        assert_eq!(map.select(position + 1), Some((&key, &(key * 10))));
    }

    let cursor = map.find(&5);
    assert_eq!(map.erase(cursor), Ok((5, 50)));
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [1, 3, 4, 7, 8, 9]);
    assert_eq!(map.rank_of(&7), Some(4));
    assert_eq!(map.select(4), Some((&7, &70)));
}

#[test]
fn or_default_counts_like_a_subscript() {
    let mut tallies: SbTreeMap<&str, i64> = SbTreeMap::new();
    *tallies.entry("gulls").or_default() += 1;
    *tallies.entry("gulls").or_default() += 1;
    *tallies.entry("terns").or_default() += 1;

    assert_eq!(tallies["gulls"], 2);
    assert_eq!(tallies["terns"], 1);
    assert_eq!(tallies.at("auks"), Err(Error::KeyNotFound));
}

#[test]
fn checked_lookup_reports_missing_key() {
    let mut map = SbTreeMap::new();
    map.insert(1, "one");

    assert_eq!(map.at(&1), Ok(&"one"));
    assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    assert_eq!(map.at_mut(&2), Err(Error::KeyNotFound));
    assert_eq!(map.len(), 1);
}

#[test]
fn clones_are_independent() {
    let mut original: SbTreeMap<i64, i64> = (1..=50).map(|x| (x, x)).collect();
    let copy = original.clone();
    assert_eq!(original, copy);

    original.remove(&25);
    *original.get_mut(&10).unwrap() = -10;

    assert_eq!(copy.len(), 50);
    assert_eq!(copy.get(&25), Some(&25));
    assert_eq!(copy.get(&10), Some(&10));
    assert_eq!(original.len(), 49);
    assert_ne!(original, copy);
}

#[test]
fn sequential_inserts_stay_ordered() {
    let mut map = SbTreeMap::new();
    for key in 1..=100i64 {
        map.insert(key, ());
    }

    for rank in 1..=100usize {
        assert_eq!(map.select(rank).map(|(&k, _)| k), Some(rank as i64));
    }
    assert_eq!(map.select(0), None);
    assert_eq!(map.select(101), None);
}

#[test]
fn with_capacity_preallocates() {
    let mut map: SbTreeMap<i64, i64> = SbTreeMap::with_capacity(64);
    assert!(map.capacity() >= 64);
    assert!(map.is_empty());

    for key in 0..64 {
        map.insert(key, key);
    }
    assert_eq!(map.len(), 64);
    assert!(map.capacity() >= 64);
}

#[test]
fn from_array_uses_last_duplicate() {
    let map = SbTreeMap::from([(1, "a"), (2, "b"), (1, "c")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&1], "c");
    assert_eq!(map[&2], "b");
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map: SbTreeMap<i32, i32> = SbTreeMap::new();
    let _ = map[&7];
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_rank_zero_panics() {
    let map = SbTreeMap::from([(1, "a")]);
    let _ = map[Rank(0)];
}
