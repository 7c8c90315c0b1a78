//! This crate exposes a self-balancing Binary Search Tree (an AVL tree) that stores ordered values
//! directly and visits them in ascending order through cursors.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert and find stored
//! values. BSTs are typically defined recursively using the notion of a `Node`. A `Node` stores a
//! value and sometimes has child `Node`s. The most important invariant of a BST is that visiting
//! the left subtree, then the subtree root, then the right subtree visits the values in sorted
//! order. Searching for a value then takes `O(height)`, where `height` is the longest path from
//! the root `Node` to a leaf `Node`.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! ## AVL balance
//!
//! Inserting already sorted values into a plain BST produces a linked list. An AVL tree keeps,
//! for every `Node`, the heights of its two subtrees within 1 of each other by rotating `Node`s
//! after each insertion. That limits the height to `O(lg N)` where `N` is the number of values.
//!
//! ## Cursors
//!
//! Every `Node` also points back at its parent, so a [`Cursor`] is a single pointer that can step
//! to the next value without keeping a stack. [`Tree::find_bigger_equal_than`] gives a cursor at
//! the first value not less than a threshold, from which the rest of the tree can be visited.
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree = Tree::new();
//! for x in (0..10).rev() {
//!     tree.insert(x);
//! }
//!
//! assert!(tree.iter().copied().eq(0..10));
//! assert!(tree.find_bigger_equal_than(&7).copied().eq(7..10));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod cursor;
pub mod tree;


pub use cursor::{Cursor, IterMut};
pub use tree::Tree;
