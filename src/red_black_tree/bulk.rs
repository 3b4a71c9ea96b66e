use crate::arena::Handle;
use crate::red_black_tree::node::{Color, Node};
use crate::red_black_tree::tree::Tree;
use log::debug;

// floor(log2(n)) for n >= 1
fn max_level(len: usize) -> usize {
    (usize::BITS - 1 - len.leading_zeros()) as usize
}

impl<T, U> Tree<T, U>
where
    T: Ord,
{
    /// Builds a balanced tree in linear time from pairs sorted strictly ascending by key, without
    /// any rotations.
    ///
    /// Every level above the deepest one is complete and black, so all paths share the same
    /// black-height. Nodes on the deepest level are red; they have no children, so no red node
    /// gets a red child.
    pub fn from_sorted(pairs: Vec<(T, U)>) -> Self {
        debug_assert!(
            pairs.windows(2).all(|window| window[0].0 < window[1].0),
            "Expected pairs sorted strictly ascending by key.",
        );

        let len = pairs.len();
        let mut tree = Tree::with_capacity(len);
        if len == 0 {
            return tree;
        }

        let max_level = max_level(len);
        let mut pairs = pairs.into_iter();
        tree.root = tree.build(&mut pairs, 0, len, 0, max_level);

        // a single pair sits on the deepest level but is also the root
        if let Some(root) = tree.root {
            tree.arena[root].color = Color::Black;
        }
        debug!("bulk loaded {} entries, max level {}", tree.len, max_level);
        tree
    }

    // Builds the subtree over the index range `[low, end)`. The left subtree is built before the
    // middle pair is taken, so `pairs` is consumed in ascending order.
    fn build<I>(
        &mut self,
        pairs: &mut I,
        low: usize,
        end: usize,
        depth: usize,
        max_level: usize,
    ) -> Option<Handle>
    where
        I: Iterator<Item = (T, U)>,
    {
        if low >= end {
            return None;
        }
        let mid = low + (end - 1 - low) / 2;

        let left = self.build(pairs, low, mid, depth + 1, max_level);
        let (key, value) = pairs
            .next()
            .expect("Expected a pair for every index in range.");

        let mut node = Node::new(key, value);
        node.color = if depth < max_level {
            Color::Black
        } else {
            Color::Red
        };
        node.left = left;
        let handle = self.arena.allocate(node);
        self.len += 1;
        if let Some(left) = left {
            self.arena[left].parent = Some(handle);
        }

        let right = self.build(pairs, mid + 1, end, depth + 1, max_level);
        if let Some(right) = right {
            self.arena[right].parent = Some(handle);
        }
        self.arena[handle].right = right;

        Some(handle)
    }
}
