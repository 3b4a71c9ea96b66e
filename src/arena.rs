//! Slab allocator for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable reference to an object stored in a `TypedArena<T>`.
///
/// A handle stays valid until the object it refers to is freed. Afterwards the slot may be handed
/// out again by a later allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle(usize);

impl Handle {
    /// Returns the slot index of the handle.
    pub fn index(self) -> usize {
        self.0
    }
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator that only allocates a single type of object and hands out `Handle`s to them.
///
/// Freed slots are threaded into an intrusive free list and reused by later allocations, so a
/// long-running workload of interleaved insertions and removals does not grow the backing storage
/// beyond its peak size. Objects can refer to each other by handle in any direction, which makes
/// the arena suitable for graphs with back-references such as a tree with parent links.
///
/// # Examples
///
/// ```
/// use red_black_map::arena::TypedArena;
///
/// let mut arena = TypedArena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Handle>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new();
    /// ```
    pub fn new() -> Self {
        TypedArena {
            head: None,
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` with room for `capacity` objects before the backing
    /// storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns its handle, reusing the most recently freed
    /// slot if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Handle(self.blocks.len() - 1)
            },
            Some(handle) => {
                let vacant_block = mem::replace(&mut self.blocks[handle.0], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next) => {
                        self.head = next;
                        handle
                    },
                    Block::Occupied(_) => panic!("Error: free list points at an occupied block."),
                }
            },
        }
    }

    /// Deallocates an object in the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the handle corresponds to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if handle.0 >= self.blocks.len() {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(&mut self.blocks[handle.0], Block::Vacant(self.head));
        match old_block {
            Block::Vacant(next) => {
                self.blocks[handle.0] = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the handle does not
    /// correspond to a live object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.blocks.get(handle.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the handle does not
    /// correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// *arena.get_mut(x).unwrap() = 3;
    /// assert_eq!(arena[x], 3);
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.blocks.get_mut(handle.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns mutable references to two distinct live objects at once.
    ///
    /// # Panics
    ///
    /// Panics if the handles are equal or either one does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_map::arena::TypedArena;
    /// use std::mem;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// let y = arena.allocate(1);
    ///
    /// let (a, b) = arena.get_pair_mut(x, y);
    /// mem::swap(a, b);
    /// assert_eq!((arena[x], arena[y]), (1, 0));
    /// ```
    pub fn get_pair_mut(&mut self, first: Handle, second: Handle) -> (&mut T, &mut T) {
        assert_ne!(first, second, "Error: attempting to borrow the same block twice.");
        let (low, high) = if first.0 < second.0 {
            (first.0, second.0)
        } else {
            (second.0, first.0)
        };
        let (head, tail) = self.blocks.split_at_mut(high);
        let low_value = match head.get_mut(low) {
            Some(Block::Occupied(value)) => value,
            _ => panic!("Error: handle out of bounds."),
        };
        let high_value = match tail.first_mut() {
            Some(Block::Occupied(value)) => value,
            _ => panic!("Error: handle out of bounds."),
        };
        if first.0 < second.0 {
            (low_value, high_value)
        } else {
            (high_value, low_value)
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects the arena can hold without growing its backing storage.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }

    /// Drops every object in the arena. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle out of bounds.")
    }
}
