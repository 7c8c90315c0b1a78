//! Forward-only positions in a [`Tree`](crate::tree::Tree).
//!
//! A cursor points at one node, or at nothing when it is the end of the tree. Moving it forward
//! goes to the in-order successor through the nodes' parent pointers, so no stack is kept and a
//! cursor is just a pointer.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::tree::{Link, Node};

/// A position in a tree, visiting values in ascending order.
///
/// Cursors compare equal when they point at the same node (not merely at equal values), and all
/// end cursors are equal. As an [`Iterator`] a cursor yields the value it points at and then
/// moves to the next one.
///
/// # Examples
///
/// ```
/// use avl::tree::Tree;
///
/// let tree: Tree<_> = [3, 1, 2].into_iter().collect();
///
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.get(), Some(&1));
///
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&2));
/// assert_eq!(cursor, tree.find_bigger_equal_than(&2));
///
/// assert_eq!(cursor.next(), Some(&2));
/// assert_eq!(cursor.next(), Some(&3));
/// assert_eq!(cursor, tree.end());
/// ```
pub struct Cursor<'a, T> {
    current: Link<T>,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(current: Link<T>) -> Self {
        Self {
            current,
            marker: PhantomData,
        }
    }

    /// The value under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        // SAFETY: The cursor borrows the tree for `'a`, so the node is alive and can't be
        // mutated for that long.
        self.current
            .0
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Whether this is the end of the tree.
    pub fn is_end(&self) -> bool {
        self.current.0.is_none()
    }

    /// Moves to the next value in ascending order. Does nothing at the end.
    pub fn move_next(&mut self) {
        if let Some(node) = self.current.0 {
            // SAFETY: See `get`.
            self.current = unsafe { successor(node) };
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}
impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.get()?;
        self.move_next();
        Some(value)
    }
}

impl<T> FusedIterator for Cursor<'_, T> {}

/// Visits the values of a tree in ascending order, mutably. See
/// [`Tree::iter_mut`](crate::tree::Tree::iter_mut).
pub struct IterMut<'a, T> {
    current: Link<T>,
    marker: PhantomData<&'a mut T>,
}

impl<T> IterMut<'_, T> {
    pub(crate) fn new(current: Link<T>) -> Self {
        Self {
            current,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.0?;
        // SAFETY: The iterator borrows the tree mutably for `'a`. The successor is found before
        // handing out the value and only reads link fields, so it never aliases a value already
        // yielded. Each node is yielded at most once.
        unsafe {
            self.current = successor(node);
            Some(&mut (*node.as_ptr()).value)
        }
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("is_end", &self.current.0.is_none())
            .finish()
    }
}

/// The node following `node` in ascending order. That's the leftmost node of its right subtree
/// if there is one. Otherwise it's the first ancestor reached by climbing out of a left subtree,
/// or nothing if we climbed out of right subtrees all the way past the root.
///
/// # Safety
///
/// `node` and all of its ancestors and descendants must be live. Only link fields are read, so
/// outstanding references to node values are fine.
unsafe fn successor<T>(node: NonNull<Node<T>>) -> Link<T> {
    let right = (*node.as_ptr()).right;
    if right.0.is_some() {
        return right.leftmost();
    }

    let mut child = node;
    let mut parent = (*node.as_ptr()).parent;
    while let Some(ancestor) = parent.0 {
        if (*ancestor.as_ptr()).right.0 != Some(child) {
            break;
        }
        child = ancestor;
        parent = (*ancestor.as_ptr()).parent;
    }
    parent
}
