use crate::arena::Handle;
use crate::red_black_tree::node::Color;
use crate::red_black_tree::tree::Tree;
use thiserror::Error;

/// A red black tree invariant that does not hold. Nodes are identified by their arena slot.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvariantError {
    #[error("root is red")]
    RedRoot,
    #[error("root has a parent link")]
    RootHasParent,
    #[error("node at slot {node} does not link back to its parent")]
    BrokenParentLink { node: usize },
    #[error("red node at slot {node} has a red child")]
    RedRedEdge { node: usize },
    #[error("node at slot {node} has black-height {left} on the left and {right} on the right")]
    BlackHeightMismatch {
        node: usize,
        left: usize,
        right: usize,
    },
    #[error("key at in-order position {position} is not greater than its predecessor")]
    OutOfOrder { position: usize },
    #[error("tree records {recorded} entries but {reachable} are reachable")]
    LengthMismatch { recorded: usize, reachable: usize },
    #[error("arena holds {allocated} nodes but {reachable} are reachable")]
    LeakedNodes { allocated: usize, reachable: usize },
}

impl<T, U> Tree<T, U>
where
    T: Ord,
{
    /// Checks every structural and red black invariant, returning the first violation found.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let root = match self.root {
            Some(root) => root,
            None => {
                return self.check_counts(0);
            },
        };
        if self.node(root).parent.is_some() {
            return Err(InvariantError::RootHasParent);
        }
        if self.is_red(Some(root)) {
            return Err(InvariantError::RedRoot);
        }
        self.black_height(Some(root))?;
        let reachable = self.check_order(root)?;
        self.check_counts(reachable)
    }

    // Black-height of the subtree rooted at `handle`, counting the absent leaves below it.
    fn black_height(&self, handle: Option<Handle>) -> Result<usize, InvariantError> {
        let handle = match handle {
            Some(handle) => handle,
            None => return Ok(1),
        };
        let node = self.node(handle);
        for child in node.left.iter().chain(node.right.iter()) {
            if self.node(*child).parent != Some(handle) {
                return Err(InvariantError::BrokenParentLink { node: child.index() });
            }
        }
        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(InvariantError::RedRedEdge {
                node: handle.index(),
            });
        }

        let left = self.black_height(node.left)?;
        let right = self.black_height(node.right)?;
        if left != right {
            return Err(InvariantError::BlackHeightMismatch {
                node: handle.index(),
                left,
                right,
            });
        }
        Ok(left + if node.color == Color::Black { 1 } else { 0 })
    }

    // Walks the tree in order and returns the number of nodes visited.
    fn check_order(&self, root: Handle) -> Result<usize, InvariantError> {
        let mut stack = Vec::new();
        let mut curr = Some(root);
        let mut prev: Option<&T> = None;
        let mut position = 0;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.node(handle).left;
            }
            let handle = match stack.pop() {
                Some(handle) => handle,
                None => return Ok(position),
            };
            let node = self.node(handle);
            if let Some(prev) = prev {
                if *prev >= node.entry.key {
                    return Err(InvariantError::OutOfOrder { position });
                }
            }
            prev = Some(&node.entry.key);
            position += 1;
            curr = node.right;
        }
    }

    fn check_counts(&self, reachable: usize) -> Result<(), InvariantError> {
        if self.len != reachable {
            return Err(InvariantError::LengthMismatch {
                recorded: self.len,
                reachable,
            });
        }
        if self.arena.len() != reachable {
            return Err(InvariantError::LeakedNodes {
                allocated: self.arena.len(),
                reachable,
            });
        }
        Ok(())
    }
}
