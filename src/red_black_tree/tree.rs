use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Node, Side};
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

/// Arena-backed red black tree. Every link, child or parent, is a handle into `arena`.
pub struct Tree<T, U> {
    pub arena: TypedArena<Node<T, U>>,
    pub root: Option<Handle>,
    pub len: usize,
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            arena: TypedArena::new(),
            root: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: TypedArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn node(&self, handle: Handle) -> &Node<T, U> {
        &self.arena[handle]
    }

    // absent children are black
    pub fn is_red(&self, handle: Option<Handle>) -> bool {
        match handle {
            Some(handle) => self.arena[handle].color == Color::Red,
            None => false,
        }
    }

    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points whatever held `old` (the parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.arena[parent].set_child(side, new);
            },
        }
    }

    pub fn tree_minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    pub fn tree_maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    pub fn search<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub fn get<V>(&self, key: &V) -> Option<&Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.search(key).map(|handle| &self.arena[handle].entry)
    }

    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.search(key) {
            Some(handle) => Some(&mut self.arena[handle].entry),
            None => None,
        }
    }

    pub fn floor<V>(&self, key: &V) -> Option<&Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    best = Some(&node.entry);
                    node.right
                },
                Ordering::Equal => return Some(&node.entry),
            };
        }
        best
    }

    pub fn ceil<V>(&self, key: &V) -> Option<&Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Greater => node.right,
                Ordering::Less => {
                    best = Some(&node.entry);
                    node.left
                },
                Ordering::Equal => return Some(&node.entry),
            };
        }
        best
    }

    pub fn min(&self) -> Option<&Entry<T, U>> {
        self.root
            .map(|root| &self.arena[self.tree_minimum(root)].entry)
    }

    pub fn max(&self) -> Option<&Entry<T, U>> {
        self.root
            .map(|root| &self.arena[self.tree_maximum(root)].entry)
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Handle, usize)> = self.root.iter().map(|&root| (root, 1)).collect();
        while let Some((handle, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.arena[handle];
            stack.extend(node.left.iter().chain(node.right.iter()).map(|&child| (child, depth + 1)));
        }
        max_depth
    }

    /// Promotes the right child `y` of `x` into the position of `x`; `x` becomes the left child of
    /// `y` and takes over the former left subtree of `y`. Entries and colors are left untouched.
    pub fn rotate_left(&mut self, x: Handle) {
        let y = self.arena[x]
            .right
            .expect("Expected child node to promote during rotation.");
        trace!("rotating left at {:?}", x);

        let inner = self.arena[y].left;
        self.arena[x].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
    }

    /// Mirror image of `rotate_left`.
    pub fn rotate_right(&mut self, x: Handle) {
        let y = self.arena[x]
            .left
            .expect("Expected child node to promote during rotation.");
        trace!("rotating right at {:?}", x);

        let inner = self.arena[y].right;
        self.arena[x].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        self.arena[y].right = Some(x);
        self.arena[x].parent = Some(y);
    }

    // Moves `x` down towards `side`.
    fn rotate(&mut self, x: Handle, side: Side) {
        match side {
            Side::Left => self.rotate_left(x),
            Side::Right => self.rotate_right(x),
        }
    }

    /// Inserts a key-value pair. An existing key keeps its node and has only its value replaced.
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &mut self.arena[handle];
            match key.cmp(&node.entry.key) {
                Ordering::Less => side = Side::Left,
                Ordering::Greater => side = Side::Right,
                Ordering::Equal => return Some(mem::replace(&mut node.entry.value, value)),
            }
            parent = Some(handle);
            curr = node.child(side);
        }

        let mut new_node = Node::new(key, value);
        new_node.parent = parent;
        let handle = self.arena.allocate(new_node);
        self.len += 1;

        match parent {
            None => {
                self.arena[handle].color = Color::Black;
                self.root = Some(handle);
            },
            Some(parent) => {
                self.arena[parent].set_child(side, Some(handle));
                self.insert_fixup(handle);
            },
        }
        None
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        loop {
            let parent = match self.arena[z].parent {
                Some(parent) if self.arena[parent].color == Color::Red => parent,
                _ => break,
            };
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");
            let side = self.side_of(grandparent, parent);
            let uncle = self.arena[grandparent].child(side.opposite());

            match uncle.filter(|&uncle| self.arena[uncle].color == Color::Red) {
                Some(uncle) => {
                    trace!("insert fixup: red uncle, recoloring");
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    z = grandparent;
                },
                None => {
                    // triangle: straighten it into a line first
                    if self.arena[parent].child(side.opposite()) == Some(z) {
                        z = parent;
                        self.rotate(z, side);
                    }
                    let parent = self.arena[z]
                        .parent
                        .expect("Expected node to have a parent after rotation.");
                    let grandparent = self.arena[parent]
                        .parent
                        .expect("Expected node to have a grandparent after rotation.");
                    trace!("insert fixup: black uncle, rotating at grandparent");
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    self.rotate(grandparent, side.opposite());
                },
            }
        }

        let root = self.root.expect("Expected non-empty tree.");
        self.arena[root].color = Color::Black;
    }

    /// Removes the entry with a particular key and returns it.
    pub fn remove<V>(&mut self, key: &V) -> Option<Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut target = self.search(key)?;

        // A node with two children trades entries with its successor, which is then excised.
        if let (Some(_), Some(right)) = (self.arena[target].left, self.arena[target].right) {
            let successor = self.tree_minimum(right);
            let (node, successor_node) = self.arena.get_pair_mut(target, successor);
            mem::swap(&mut node.entry, &mut successor_node.entry);
            target = successor;
        }
        self.len -= 1;

        let node = &self.arena[target];
        let color = node.color;
        let parent = node.parent;
        match node.left.or(node.right) {
            Some(replacement) => {
                self.arena[replacement].parent = parent;
                self.replace_child(parent, target, Some(replacement));
                if color == Color::Black {
                    self.delete_fixup(replacement);
                }
            },
            None if parent.is_none() => self.root = None,
            None => {
                // the fixup reasons about siblings, so it runs while the leaf is still attached
                if color == Color::Black {
                    self.delete_fixup(target);
                }
                let parent = self.arena[target].parent;
                self.replace_child(parent, target, None);
            },
        }

        Some(self.arena.free(target).entry)
    }

    /// Restores the red black invariants after a black node was removed; `x` carries the missing
    /// black unit.
    fn delete_fixup(&mut self, mut x: Handle) {
        while Some(x) != self.root && self.arena[x].color == Color::Black {
            let parent = self.arena[x]
                .parent
                .expect("Expected non-root node to have a parent.");
            let side = self.side_of(parent, x);
            let far = side.opposite();

            let mut sibling = self.arena[parent].child(far);
            if let Some(w) = sibling.filter(|&w| self.arena[w].color == Color::Red) {
                trace!("delete fixup: red sibling");
                self.arena[w].color = Color::Black;
                self.arena[parent].color = Color::Red;
                self.rotate(parent, side);
                sibling = self.arena[parent].child(far);
            }

            // Unreachable while the invariants held before the removal; climbing keeps a malformed
            // intermediate state from dereferencing a missing sibling.
            let mut w = match sibling {
                Some(w) => w,
                None => {
                    x = parent;
                    continue;
                },
            };

            let near_child = self.arena[w].child(side);
            let far_child = self.arena[w].child(far);
            if !self.is_red(near_child) && !self.is_red(far_child) {
                trace!("delete fixup: black sibling with black children");
                self.arena[w].color = Color::Red;
                x = parent;
                continue;
            }

            if !self.is_red(far_child) {
                trace!("delete fixup: black sibling with red near child");
                if let Some(near_child) = near_child {
                    self.arena[near_child].color = Color::Black;
                }
                self.arena[w].color = Color::Red;
                self.rotate(w, far);
                w = self.arena[parent]
                    .child(far)
                    .expect("Expected sibling after rotation.");
            }

            trace!("delete fixup: black sibling with red far child");
            self.arena[w].color = self.arena[parent].color;
            self.arena[parent].color = Color::Black;
            if let Some(far_child) = self.arena[w].child(far) {
                self.arena[far_child].color = Color::Black;
            }
            self.rotate(parent, side);
            x = self.root.expect("Expected non-empty tree.");
        }
        self.arena[x].color = Color::Black;
    }
}

impl<T, U> Default for Tree<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::red_black_tree::node::Color;

    fn keys_in_order(tree: &Tree<u32, u32>) -> Vec<u32> {
        let mut ret = Vec::new();
        let mut stack = Vec::new();
        let mut curr = tree.root;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = tree.node(handle).left;
            }
            match stack.pop() {
                Some(handle) => {
                    ret.push(tree.node(handle).entry.key);
                    curr = tree.node(handle).right;
                },
                None => return ret,
            }
        }
    }

    fn tree_of(keys: &[u32]) -> Tree<u32, u32> {
        let mut tree = Tree::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    #[test]
    fn test_insert_into_empty_tree_makes_black_root() {
        let tree = tree_of(&[1]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).color, Color::Black);
        assert_eq!(tree.node(root).parent, None);
        assert_eq!(tree.len, 1);
    }

    #[test]
    fn test_insert_replaces_value_in_place() {
        let mut tree = tree_of(&[2, 1, 3]);
        let handle = tree.search(&1).unwrap();
        assert_eq!(tree.insert(1, 7), Some(10));
        assert_eq!(tree.search(&1), Some(handle));
        assert_eq!(tree.node(handle).entry.value, 7);
        assert_eq!(tree.len, 3);
    }

    #[test]
    fn test_insert_triangle_case() {
        let tree = tree_of(&[30, 10, 20]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).entry.key, 20);
        assert_eq!(tree.node(root).color, Color::Black);
        let left = tree.node(root).left.unwrap();
        let right = tree.node(root).right.unwrap();
        assert_eq!(tree.node(left).entry.key, 10);
        assert_eq!(tree.node(right).entry.key, 30);
        assert_eq!(tree.node(left).color, Color::Red);
        assert_eq!(tree.node(right).color, Color::Red);
        assert_eq!(tree.node(left).parent, Some(root));
        assert_eq!(tree.node(right).parent, Some(root));
    }

    #[test]
    fn test_insert_red_uncle_recolors() {
        let tree = tree_of(&[20, 10, 30, 5]);
        let root = tree.root.unwrap();
        let left = tree.node(root).left.unwrap();
        let right = tree.node(root).right.unwrap();
        assert_eq!(tree.node(left).color, Color::Black);
        assert_eq!(tree.node(right).color, Color::Black);
        assert_eq!(tree.node(tree.search(&5).unwrap()).color, Color::Red);
    }

    #[test]
    fn test_rotate_left_and_right_are_inverse() {
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);
        let root = tree.root.unwrap();
        tree.rotate_left(root);

        let new_root = tree.root.unwrap();
        assert_eq!(tree.node(new_root).entry.key, 4);
        assert_eq!(tree.node(new_root).parent, None);
        assert_eq!(tree.node(root).parent, Some(new_root));
        assert_eq!(tree.node(tree.node(root).right.unwrap()).entry.key, 3);
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3, 4, 5]);

        tree.rotate_right(new_root);
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.node(tree.node(new_root).left.unwrap()).entry.key, 3);
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "Expected child node to promote")]
    fn test_rotate_without_child_panics() {
        let mut tree = tree_of(&[1]);
        let root = tree.root.unwrap();
        tree.rotate_left(root);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut tree = tree_of(&[2, 1, 3]);
        assert!(tree.remove(&4).is_none());
        assert_eq!(tree.len, 3);
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_root_leaf() {
        let mut tree = tree_of(&[1]);
        let entry = tree.remove(&1).unwrap();
        assert_eq!((entry.key, entry.value), (1, 10));
        assert!(tree.root.is_none());
        assert!(tree.arena.is_empty());
    }

    #[test]
    fn test_remove_two_children_returns_removed_entry() {
        let mut tree = tree_of(&[2, 1, 3]);
        let root = tree.root.unwrap();
        let entry = tree.remove(&2).unwrap();
        assert_eq!((entry.key, entry.value), (2, 20));
        // the successor's entry now lives in the old root's slot
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.node(root).entry.key, 3);
        assert_eq!(tree.node(root).entry.value, 30);
        assert_eq!(keys_in_order(&tree), vec![1, 3]);
    }

    #[test]
    fn test_remove_black_leaf_runs_fixup() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6]);
        for key in 1..=6 {
            tree.remove(&key);
            let remaining: Vec<u32> = (key + 1..=6).collect();
            assert_eq!(keys_in_order(&tree), remaining);
            if let Some(root) = tree.root {
                assert_eq!(tree.node(root).color, Color::Black);
            }
        }
        assert_eq!(tree.len, 0);
    }

    #[test]
    fn test_height() {
        assert_eq!(Tree::<u32, u32>::new().height(), 0);
        assert_eq!(tree_of(&[1]).height(), 1);
        assert_eq!(tree_of(&[1, 2, 3]).height(), 2);
    }

    #[test]
    fn test_floor_ceil() {
        let tree = tree_of(&[10, 20, 30]);
        assert!(tree.floor(&5).is_none());
        assert_eq!(tree.floor(&25).unwrap().key, 20);
        assert_eq!(tree.ceil(&25).unwrap().key, 30);
        assert!(tree.ceil(&35).is_none());
        assert_eq!(tree.ceil(&20).unwrap().key, 20);
    }
}
