use rand::{Rng, SeedableRng, XorShiftRng};
use red_black_map::red_black_tree::{Color, RedBlackMap};
use simplelog::{Config, LevelFilter, TestLogger};
use std::collections::BTreeMap;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn snapshot(map: &RedBlackMap<u32, u32>) -> Vec<(u32, u32, Option<Color>)> {
    map.iter()
        .map(|(key, value)| (*key, *value, map.color_of(key)))
        .collect()
}

// number of levels in a perfectly balanced tree with `len` nodes
fn balanced_height(len: usize) -> usize {
    (0usize.count_zeros() - len.leading_zeros()) as usize
}

#[test]
fn int_test_random_operations_match_btreemap() {
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 2, 3, 4]);
    let mut map = RedBlackMap::new();
    let mut expected = BTreeMap::new();

    for _ in 0..20_000 {
        let key = rng.gen_range(0, 2_000);
        if rng.gen::<bool>() {
            let value = rng.gen::<u32>();
            assert_eq!(map.insert(key, value), expected.insert(key, value));
        } else {
            assert_eq!(map.remove(&key), expected.remove(&key));
        }
        assert_eq!(map.len(), expected.len());
    }

    assert_eq!(map.validate(), Ok(()));
    assert_eq!(
        map.iter().collect::<Vec<_>>(),
        expected.iter().collect::<Vec<_>>(),
    );
    assert!(map.height() <= 2 * balanced_height(map.len()));
}

#[test]
fn int_test_invariants_after_every_operation() {
    init_logger();
    let mut rng = rand::thread_rng();
    let mut map = RedBlackMap::new();

    for _ in 0..2_000 {
        let key = rng.gen_range(0, 200);
        if rng.gen_weighted_bool(3) {
            map.remove(&key);
        } else {
            map.insert(key, key);
        }
        assert_eq!(map.validate(), Ok(()));
        if !map.is_empty() {
            assert_eq!(map.root_color(), Some(Color::Black));
        }
    }
}

#[test]
fn int_test_insert_then_remove_ascending() {
    let mut map = RedBlackMap::new();
    for key in 1..=20 {
        map.insert(key, key * 100);
        assert_eq!(map.validate(), Ok(()));
    }

    for key in 1..=20 {
        let len = map.len();
        assert_eq!(map.remove(&key), Some(key * 100));
        assert_eq!(map.len(), len - 1);
        assert_eq!(map.get(&key), None);
        assert_eq!(map.validate(), Ok(()));
    }
    assert!(map.is_empty());
}

#[test]
fn int_test_remove_descending_and_interleaved() {
    let mut map: RedBlackMap<u32, u32> = (0..256).map(|key| (key, key)).collect();
    for key in (0..256).rev().step_by(2) {
        assert_eq!(map.remove(&key), Some(key));
        assert_eq!(map.validate(), Ok(()));
    }
    for key in (0..256).step_by(2) {
        assert_eq!(map.remove(&key), Some(key));
        assert_eq!(map.validate(), Ok(()));
    }
    assert!(map.is_empty());
}

#[test]
fn int_test_remove_missing_key_leaves_tree_identical() {
    let mut rng: XorShiftRng = SeedableRng::from_seed([4, 3, 2, 1]);
    let mut map = RedBlackMap::new();
    for _ in 0..500 {
        let key = rng.gen_range(0, 1_000) * 2;
        map.insert(key, rng.gen::<u32>());
    }

    let before = snapshot(&map);
    for key in (1..2_000).step_by(2) {
        assert_eq!(map.remove(&key), None);
    }
    assert_eq!(snapshot(&map), before);
}

#[test]
fn int_test_remove_two_children_promotes_successor() {
    let mut map: RedBlackMap<u32, &str> =
        RedBlackMap::from_sorted(vec![(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]);
    assert_eq!(map.remove_entry(&3), Some((3, "c")));
    assert_eq!(
        map.iter().collect::<Vec<_>>(),
        vec![(&1, &"a"), (&2, &"b"), (&4, &"d"), (&5, &"e")],
    );
    assert_eq!(map.validate(), Ok(()));
}

#[test]
fn int_test_insert_then_lookup() {
    let mut rng = rand::thread_rng();
    let mut map = RedBlackMap::new();
    for _ in 0..1_000 {
        let key = rng.gen::<u16>();
        let value = rng.gen::<u64>();
        map.insert(key, value);
        assert_eq!(map.get(&key), Some(&value));
    }
}

#[test]
fn int_test_bulk_load_shape() {
    init_logger();
    for len in 0..300 {
        let pairs: Vec<(usize, usize)> = (0..len).map(|key| (key, key + 1)).collect();
        let map = RedBlackMap::from_pairs(pairs.clone(), true);

        assert_eq!(map.len(), len);
        assert_eq!(map.height(), balanced_height(len));
        assert_eq!(map.validate(), Ok(()));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), pairs);
    }
}

#[test]
fn int_test_bulk_and_incremental_agree() {
    let mut rng = rand::thread_rng();
    let mut keys: Vec<u32> = (0..1_000).map(|_| rng.gen::<u32>()).collect();
    keys.sort();
    keys.dedup();

    let pairs: Vec<(u32, u32)> = keys.iter().map(|&key| (key, key / 2)).collect();
    let mut shuffled = pairs.clone();
    rng.shuffle(&mut shuffled);

    let bulk = RedBlackMap::from_pairs(pairs, true);
    let incremental = RedBlackMap::from_pairs(shuffled, false);
    assert_eq!(incremental.validate(), Ok(()));
    assert_eq!(
        bulk.iter().collect::<Vec<_>>(),
        incremental.iter().collect::<Vec<_>>(),
    );
}
