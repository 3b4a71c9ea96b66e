//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes are stored in a `TypedArena` and carry a handle to their parent, so rebalancing walks up
//! the tree iteratively after an insertion or removal. Sorted input can be bulk loaded in linear
//! time.

mod bulk;
mod map;
mod node;
mod set;
mod tree;
mod validate;

pub use self::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
pub use self::node::Color;
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::validate::InvariantError;
