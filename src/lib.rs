//! An ordered map and set backed by a red black tree.
//!
//! The tree keeps parent links, stores its nodes in an arena, and restores its invariants with
//! the classic insertion and deletion fixups. Maps built from sorted input skip rebalancing and
//! are assembled bottom-up in linear time.
//!
//! # Examples
//!
//! ```
//! use red_black_map::red_black_tree::RedBlackMap;
//!
//! let mut map = RedBlackMap::from_sorted(vec![(1, "a"), (2, "b"), (3, "c")]);
//! map.insert(4, "d");
//! assert_eq!(map.remove(&2), Some("b"));
//! assert_eq!(map.iter().map(|(key, _)| *key).collect::<Vec<_>>(), vec![1, 3, 4]);
//! assert_eq!(map.validate(), Ok(()));
//! ```

mod entry;
pub mod arena;
pub mod red_black_tree;
