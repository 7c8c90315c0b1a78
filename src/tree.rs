//! An unsafe AVL tree storing ordered values directly. Children are owned through raw pointers
//! and every node keeps a non-owning pointer to its parent so cursors can walk to the in-order
//! successor without a stack.
//!
//! Values that compare equal are all kept. A new value is routed to the right of every value
//! equal to it, so duplicates come out of a traversal in insertion order.
//!
//! # Examples
//!
//! ```
//! use avl::tree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//! assert_eq!(tree.begin(), tree.end());
//!
//! tree.insert(3);
//! tree.insert(1);
//! tree.insert(2);
//! tree.insert(1);
//!
//! assert!(tree.contains(&1));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 1, 2, 3]);
//!
//! // Everything from the first value that is at least 2.
//! let from_two = tree.find_bigger_equal_than(&2);
//! assert_eq!(from_two.copied().collect::<Vec<_>>(), [2, 3]);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::trace;

use crate::cursor::{Cursor, IterMut};

/// Height of an empty subtree. A leaf has a height of 0.
pub(crate) const EMPTY_HEIGHT: isize = -1;

/// A self-balancing Binary Search Tree (specifically, an AVL tree) of ordered values. Values can
/// be inserted, tested for membership and visited in ascending order starting either from the
/// smallest value or from the first value at least as large as some threshold.
pub struct Tree<T> {
    // This is a `Link` instead of an `Option<Node>` so that it can be moved around with the `Tree`
    // without the children's parent pointers breaking.
    root: Link<T>,
    len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take().0 {
            // SAFETY: We own the root we're dropping so this won't be called twice. The root was
            // initially allocated using `Box::new` (in `Link::leaf`) so this should be well
            // aligned, etc.
            unsafe { drop(Box::from_raw(root.as_ptr())) };
        }
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.deep_clone(Link::EMPTY),
            len: self.len,
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root.node())
            .finish()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link::EMPTY,
            len: 0,
            marker: PhantomData,
        }
    }

    /// The number of values stored, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts the given value into the tree. Values equal to ones already stored are kept as
    /// well and are visited after them.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [&1, &1]);
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        self.root.insert(value, Link::EMPTY);
        self.len += 1;
    }

    /// Whether some stored value is equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.root.node().map_or(false, |root| root.contains(value))
    }

    /// The smallest value in the tree. If several values are the smallest, this is the one
    /// inserted first.
    pub fn min(&self) -> Option<&T> {
        self.value_of(self.root.leftmost())
    }

    /// The largest value in the tree. If several values are the largest, this is the one inserted
    /// last.
    pub fn max(&self) -> Option<&T> {
        self.value_of(self.root.rightmost())
    }

    /// A cursor at the smallest value. For an empty tree this is equal to [`Tree::end`].
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.root.leftmost())
    }

    /// The cursor one past the largest value. It doesn't point at any value.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(Link::EMPTY)
    }

    /// Visits every value in ascending order. Same as [`Tree::begin`].
    pub fn iter(&self) -> Cursor<'_, T> {
        self.begin()
    }

    /// Visits every value in ascending order, mutably.
    ///
    /// Changing a value so that it orders differently relative to the other values in the tree
    /// is a logic error. The tree stays memory safe but later searches and insertions may give
    /// surprising results.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.root.leftmost())
    }

    /// A cursor at the first value (in ascending order) that is greater than or equal to
    /// `threshold`, or [`Tree::end`] if every value is smaller.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::tree::Tree;
    ///
    /// let tree: Tree<_> = (0..100).collect();
    ///
    /// assert_eq!(tree.find_bigger_equal_than(&50).get(), Some(&50));
    /// assert_eq!(tree.find_bigger_equal_than(&100), tree.end());
    /// ```
    pub fn find_bigger_equal_than(&self, threshold: &T) -> Cursor<'_, T>
    where
        T: Ord,
    {
        let mut candidate = Link::EMPTY;
        let mut current = self.root;
        while let Some(node) = current.0 {
            // SAFETY: Every link reachable from the root points at a live node owned by this
            // tree and we hold `&self` so nothing mutates it in the meantime.
            let node_ref = unsafe { node.as_ref() };
            current = if node_ref.value < *threshold {
                node_ref.right
            } else {
                candidate = Link(Some(node));
                node_ref.left
            };
        }

        Cursor::new(candidate)
    }

    fn value_of(&self, link: Link<T>) -> Option<&T> {
        // SAFETY: `link` was found by walking down from `self.root` so it is a live node owned by
        // this tree. The returned reference borrows `self`, so the node outlives it.
        link.0.map(|node| unsafe { &(*node.as_ptr()).value })
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Tree<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A possibly empty pointer to a node. Owning when it's a `left`/`right`/`root` field,
/// non-owning when it's a `parent` field or held by a cursor.
pub(crate) struct Link<T>(pub(crate) Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T> Eq for Link<T> {}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Link").field(&self.0).finish()
    }
}

impl<T> Link<T> {
    pub(crate) const EMPTY: Self = Link(None);

    /// Allocates a new leaf holding `value`.
    fn leaf(value: T, parent: Link<T>) -> Self {
        let node = Box::new(Node {
            value,
            height: 0,
            left: Link::EMPTY,
            right: Link::EMPTY,
            parent,
        });
        Link(Some(NonNull::from(Box::leak(node))))
    }

    fn node(&self) -> Option<&Node<T>> {
        // SAFETY: If the node is not `None` then it is a valid `Node`. Because we take `&self`
        // here, there can be no aliasing with a `&mut Node` created through this same link. There
        // can only be aliasing with `self.0.unwrap().as_mut()`. That code would be unsafe so it'd
        // be the caller's responsibility to ensure there is no existing borrow of the node.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn height(&self) -> isize {
        self.node().map_or(EMPTY_HEIGHT, |n| n.height)
    }

    fn set_parent(self, parent: Link<T>) {
        if let Some(mut node) = self.0 {
            // SAFETY: Only called on links owned by the tree being restructured, whose nodes are
            // live. No other reference to this node is held while its parent is rewritten.
            unsafe { node.as_mut().parent = parent };
        }
    }

    /// The leftmost node of the subtree rooted here, i.e. its smallest value.
    pub(crate) fn leftmost(self) -> Self {
        let Some(mut node) = self.0 else {
            return self;
        };
        // SAFETY: The node is live. Only the `left` field is read through the raw pointer so this
        // doesn't conflict with `&mut T`s handed out for node values by `IterMut`.
        while let Some(left) = unsafe { (*node.as_ptr()).left.0 } {
            node = left;
        }
        Link(Some(node))
    }

    /// The rightmost node of the subtree rooted here, i.e. its largest value.
    fn rightmost(self) -> Self {
        let Some(mut node) = self.0 else {
            return self;
        };
        // SAFETY: See `leftmost`.
        while let Some(right) = unsafe { (*node.as_ptr()).right.0 } {
            node = right;
        }
        Link(Some(node))
    }

    /// Inserts `value` into the subtree rooted here and rebalances it. `parent` is the node owning
    /// this link and becomes the parent of a newly created leaf.
    fn insert(&mut self, value: T, parent: Link<T>)
    where
        T: Ord,
    {
        let Some(mut node) = self.0 else {
            *self = Link::leaf(value, parent);
            return;
        };

        // SAFETY: `node` is live and owned by this link. The reference only lives until the
        // recursive insertion below returns, during which nothing above this node is touched.
        let current = unsafe { node.as_mut() };
        let child = if value < current.value {
            &mut current.left
        } else {
            &mut current.right
        };
        child.insert(value, *self);
        child.set_parent(*self);

        self.balance();
    }

    /// Recomputes the height of the node at this link and restores the AVL property with one or
    /// two rotations if its children's heights differ by 2. Afterwards this link points at the
    /// (possibly new) subtree root.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    fn balance(&mut self) {
        let Some(mut root) = self.0 else {
            return;
        };
        // SAFETY: `root` is live and owned by this link. `node` is not used again once a rotation
        // starts rewriting the subtree.
        let node = unsafe { root.as_mut() };
        node.fix_height();

        // Rotations are handed the children they pivot on, so they can never run on a node
        // missing them.
        //
        // SAFETY (for every block below): `left`/`right` and the grandchildren are live
        // descendants of `root`, and `root` is not aliased while the subtree is rewritten.
        let new_root = match (node.balance_factor(), node.left.0, node.right.0) {
            (-2, Some(left), _) => {
                let left_ref = unsafe { left.as_ref() };
                match (left_ref.balance_factor(), left_ref.right.0) {
                    (factor, Some(left_right)) if factor > 0 => unsafe {
                        rotate_left_right(root, left, left_right)
                    },
                    _ => unsafe { rotate_right(root, left) },
                }
            }
            (2, _, Some(right)) => {
                let right_ref = unsafe { right.as_ref() };
                match (right_ref.balance_factor(), right_ref.left.0) {
                    (factor, Some(right_left)) if factor < 0 => unsafe {
                        rotate_right_left(root, right, right_left)
                    },
                    _ => unsafe { rotate_left(root, right) },
                }
            }
            _ => return,
        };
        self.0 = Some(new_root);

        if cfg!(debug_assertions) {
            let Some(root) = self.node() else {
                return;
            };
            let left_height = root.left.height();
            let right_height = root.right.height();
            assert_eq!(root.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }

    fn deep_clone(&self, parent: Link<T>) -> Self
    where
        T: Clone,
    {
        let Some(node) = self.node() else {
            return Link::EMPTY;
        };
        let copy = Link::leaf(node.value.clone(), parent);
        if let Some(mut copy_ptr) = copy.0 {
            // SAFETY: `copy` was just allocated and nothing else references it yet. The recursive
            // calls only store `copy` as a parent pointer without dereferencing it.
            let copy_node = unsafe { copy_ptr.as_mut() };
            copy_node.height = node.height;
            copy_node.left = node.left.deep_clone(copy);
            copy_node.right = node.right.deep_clone(copy);
        }
        copy
    }
}

/// Rotate `old_root` to the right. This moves its left child `new_root` up vertically and
/// `old_root` down vertically. Used to rebalance the tree when the left child is too tall.
/// Returns `new_root`, which the caller must store where `old_root` used to be.
///
/// # Safety
///
/// Both nodes must be live, `new_root` must be the left child of `old_root`, and no references
/// to either node may be held across the call.
///
/// # Diagram
///
/// Roughly speaking, we want to perform this transformation:
///
/// ```text
///    Option<parent>            Option<parent>
///      /                         /
///   old_root                  new_root
///    /     \                  /     \
/// new_root  z     rotate ->  x    old_root
///  / \                               /  \
/// x   y                             y    z
/// ```
unsafe fn rotate_right<T>(
    mut old_root: NonNull<Node<T>>,
    mut new_root: NonNull<Node<T>>,
) -> NonNull<Node<T>> {
    let old = old_root.as_mut();
    let new = new_root.as_mut();
    debug_assert!(old.left == Link(Some(new_root)));

    old.left = new.right.take();
    old.left.set_parent(Link(Some(old_root)));
    // `old_root`'s height has to be final before `new_root`'s is computed from it.
    old.fix_height();

    new.parent = old.parent;
    old.parent = Link(Some(new_root));
    new.right = Link(Some(old_root));
    new.fix_height();

    trace!(height = new.height, "rotated right");
    new_root
}

/// Mirror of [`rotate_right`]: `new_root` must be the right child of `old_root`.
///
/// # Safety
///
/// See [`rotate_right`].
unsafe fn rotate_left<T>(
    mut old_root: NonNull<Node<T>>,
    mut new_root: NonNull<Node<T>>,
) -> NonNull<Node<T>> {
    let old = old_root.as_mut();
    let new = new_root.as_mut();
    debug_assert!(old.right == Link(Some(new_root)));

    old.right = new.left.take();
    old.right.set_parent(Link(Some(old_root)));
    old.fix_height();

    new.parent = old.parent;
    old.parent = Link(Some(new_root));
    new.left = Link(Some(old_root));
    new.fix_height();

    trace!(height = new.height, "rotated left");
    new_root
}

/// Rotates `left` to the left, lifting `left_right` above it, then rotates `old_root` to the right.
///
/// # Safety
///
/// `left` must be the left child of `old_root` and `left_right` the right child of `left`. See
/// [`rotate_right`].
unsafe fn rotate_left_right<T>(
    mut old_root: NonNull<Node<T>>,
    left: NonNull<Node<T>>,
    left_right: NonNull<Node<T>>,
) -> NonNull<Node<T>> {
    let new_left = rotate_left(left, left_right);
    old_root.as_mut().left = Link(Some(new_left));
    rotate_right(old_root, new_left)
}

/// Rotates `right` to the right, lifting `right_left` above it, then rotates `old_root` to the
/// left.
///
/// # Safety
///
/// `right` must be the right child of `old_root` and `right_left` the left child of `right`. See
/// [`rotate_right`].
unsafe fn rotate_right_left<T>(
    mut old_root: NonNull<Node<T>>,
    right: NonNull<Node<T>>,
    right_left: NonNull<Node<T>>,
) -> NonNull<Node<T>> {
    let new_right = rotate_right(right, right_left);
    old_root.as_mut().right = Link(Some(new_right));
    rotate_left(old_root, new_right)
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    /// Levels below this node: a leaf has height 0.
    height: isize,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) parent: Link<T>,
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        // SAFETY: Dropping a node doesn't drop its parent and we are the only owners of these
        // children so we won't drop them twice. They were initially allocated using `Box::new` (in
        // `Link::leaf`) so they should be well aligned, etc.
        for child in [self.left.take(), self.right.take()] {
            if let Some(child) = child.0 {
                unsafe { drop(Box::from_raw(child.as_ptr())) };
            }
        }
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("height", &self.height)
            .field("left", &self.left.node())
            .field("right", &self.right.node())
            .finish()
    }
}

impl<T> Node<T> {
    fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        match value.cmp(&self.value) {
            std::cmp::Ordering::Less => self.left.node().map_or(false, |n| n.contains(value)),
            std::cmp::Ordering::Equal => true,
            std::cmp::Ordering::Greater => self.right.node().map_or(false, |n| n.contains(value)),
        }
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = self.left.height().max(self.right.height()) + 1;
    }

    /// The difference in height between the right and left subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> isize {
        self.right.height() - self.left.height()
    }
}

#[cfg(test)]
impl<T> Tree<T>
where
    T: Ord + fmt::Debug,
{
    /// Walks the whole tree asserting heights, balance, parent pointers, ordering and the node
    /// count.
    pub(crate) fn check_consistency(&self) {
        let (_, count, _) = check_subtree(&self.root, Link::EMPTY);
        assert_eq!(count, self.len);
    }
}

/// Returns the height, node count and `(min, max)` values of the subtree at `link`.
#[cfg(test)]
fn check_subtree<T>(link: &Link<T>, parent: Link<T>) -> (isize, usize, Option<(&T, &T)>)
where
    T: Ord + fmt::Debug,
{
    let Some(node) = link.node() else {
        return (EMPTY_HEIGHT, 0, None);
    };
    assert!(node.parent == parent, "stale parent of {:?}", node.value);

    let (left_height, left_count, left_bounds) = check_subtree(&node.left, *link);
    let (right_height, right_count, right_bounds) = check_subtree(&node.right, *link);

    assert_eq!(node.height, left_height.max(right_height) + 1, "height of {:?}", node.value);
    assert!(
        (right_height - left_height).abs() <= 1,
        "{:?} is unbalanced",
        node.value
    );
    if let Some((_, max)) = left_bounds {
        assert!(*max <= node.value, "{:?} left of {:?}", max, node.value);
    }
    if let Some((min, _)) = right_bounds {
        assert!(node.value <= *min, "{:?} right of {:?}", min, node.value);
    }

    let min = left_bounds.map_or(&node.value, |(min, _)| min);
    let max = right_bounds.map_or(&node.value, |(_, max)| max);
    (
        node.height,
        left_count + right_count + 1,
        Some((min, max)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert the heights of the root, left child, and right child of a tree.
    macro_rules! assert_heights {
        ($tree:ident, $height:expr, $left_height:expr, $right_height:expr) => {{
            match $tree.root.node() {
                Some(n) => {
                    assert_eq!(n.height, $height);
                    assert_eq!(n.left.height(), $left_height);
                    assert_eq!(n.right.height(), $right_height);
                }
                None => assert_eq!(EMPTY_HEIGHT, $height),
            }
        }};
    }

    /// The value stored at a link, for poking at the shape of small trees.
    fn value<T: Copy>(link: Link<T>) -> T {
        link.node().expect("link to a node").value
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::<i32>::new();

        assert_heights!(tree, EMPTY_HEIGHT, EMPTY_HEIGHT, EMPTY_HEIGHT);
        assert!(tree.is_empty());
        assert!(!tree.contains(&0));
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.find_bigger_equal_than(&0), tree.end());
        tree.check_consistency();
    }

    #[test]
    fn always_adding_left() {
        let values = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        let mut inserted = Vec::new();

        let mut tree = Tree::new();
        assert!(!tree.contains(&10));

        for value in values {
            tree.insert(value);
            inserted.push(value);
            tree.check_consistency();
            for inserted in &inserted {
                assert!(tree.contains(inserted));
            }
        }
        assert!(!tree.contains(&0));
        assert!(!tree.contains(&11));
    }

    #[test]
    fn always_adding_right() {
        let values = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut inserted = Vec::new();

        let mut tree = Tree::new();
        assert!(!tree.contains(&1));

        for value in values {
            tree.insert(value);
            inserted.push(value);
            tree.check_consistency();
            for inserted in &inserted {
                assert!(tree.contains(inserted));
            }
        }
    }

    #[test]
    fn single_leaf() {
        let mut tree = Tree::new();
        tree.insert(7);

        assert_heights!(tree, 0, EMPTY_HEIGHT, EMPTY_HEIGHT);
        assert_eq!(tree.min(), Some(&7));
        assert_eq!(tree.max(), Some(&7));
    }

    #[test]
    fn test_left_right_rebalance() {
        let mut tree = Tree::new();

        tree.insert(0);
        tree.insert(-2);
        tree.insert(-1);

        assert_heights!(tree, 1, 0, 0);
        assert_eq!(value(tree.root), -1);
        tree.check_consistency();
    }

    #[test]
    fn test_right_left_rebalance() {
        let mut tree = Tree::new();

        tree.insert(0);
        tree.insert(2);
        tree.insert(1);

        assert_heights!(tree, 1, 0, 0);
        assert_eq!(value(tree.root), 1);
        tree.check_consistency();
    }

    #[test]
    fn rotate_right_fixes_parent_pointers() {
        let mut tree = Tree::new();

        tree.insert(5);
        tree.insert(3);
        tree.insert(9);
        tree.insert(4);
        tree.insert(2);
        tree.insert(1);

        let three_node = tree.root.node().unwrap();
        assert_eq!(three_node.value, 3);
        assert!(three_node.parent.0.is_none());

        let five_node = three_node.right;
        let five = five_node.node().unwrap();
        assert_eq!(five.parent, tree.root);

        // 4 moved from the left subtree's right child to 5's left child.
        assert_eq!(value(five.left), 4);
        assert_eq!(five.left.node().unwrap().parent, five_node);
        assert_eq!(five.right.node().unwrap().parent, five_node);
        tree.check_consistency();
    }

    #[test]
    fn rotate_left_fixes_parent_pointers() {
        let mut tree = Tree::new();

        tree.insert(-5);
        tree.insert(-3);
        tree.insert(-9);
        tree.insert(-4);
        tree.insert(-2);
        tree.insert(-1);

        let three_node = tree.root.node().unwrap();
        assert_eq!(three_node.value, -3);
        assert!(three_node.parent.0.is_none());

        let five_node = three_node.left;
        let five = five_node.node().unwrap();
        assert_eq!(five.parent, tree.root);

        assert_eq!(value(five.right), -4);
        assert_eq!(five.right.node().unwrap().parent, five_node);
        assert_eq!(five.left.node().unwrap().parent, five_node);
        tree.check_consistency();
    }

    #[test]
    fn equal_values_rotate_into_left_subtree() {
        let mut tree = Tree::new();

        tree.insert(5);
        tree.insert(5);
        tree.insert(5);

        // The first 5 has been rotated under the second one.
        assert_heights!(tree, 1, 0, 0);
        assert!(tree.contains(&5));
        assert_eq!(tree.find_bigger_equal_than(&5), tree.begin());
        assert_eq!(tree.iter().count(), 3);
        tree.check_consistency();
    }

    #[test]
    fn min_and_max() {
        let tree: Tree<_> = [4, -7, 12, 0, 12, -7].into_iter().collect();

        assert_eq!(tree.min(), Some(&-7));
        assert_eq!(tree.max(), Some(&12));
    }

    #[test]
    fn lower_bound_between_values() {
        let tree: Tree<_> = (0..50).map(|x| x * 2).collect();

        assert_eq!(tree.find_bigger_equal_than(&-5).get(), Some(&0));
        assert_eq!(tree.find_bigger_equal_than(&31).get(), Some(&32));
        assert_eq!(tree.find_bigger_equal_than(&98).get(), Some(&98));
        assert_eq!(tree.find_bigger_equal_than(&99), tree.end());
    }

    #[test]
    fn clone_works() {
        let tree = {
            let mut tree = Tree::new();

            tree.insert(5);

            tree.insert(3);
            tree.insert(7);

            tree.insert(1);
            tree.insert(4);
            tree.insert(6);
            tree.insert(8);

            tree.clone()
        };

        // The original has been dropped, so every parent pointer must point into the clone.
        tree.check_consistency();

        let five_node = tree.root;
        let five = five_node.node().unwrap();
        assert!(five.parent.0.is_none());

        let three = five.left.node().unwrap();
        assert_eq!(three.parent, five_node);
        assert_eq!(three.left.node().unwrap().parent, five.left);
        assert_eq!(three.right.node().unwrap().parent, five.left);

        let seven = five.right.node().unwrap();
        assert_eq!(seven.parent, five_node);
        assert_eq!(seven.left.node().unwrap().parent, five.right);
        assert_eq!(seven.right.node().unwrap().parent, five.right);

        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            [1, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn drops_every_value() {
        use std::rc::Rc;

        let counter = Rc::new(());
        {
            let mut tree = Tree::new();
            for x in 0..100 {
                tree.insert((x % 10, Rc::clone(&counter)));
            }
            let copy = tree.clone();
            assert_eq!(Rc::strong_count(&counter), 201);
            drop(copy);
        }
        assert_eq!(Rc::strong_count(&counter), 1);
    }

    #[test]
    fn quickcheck_regression_duplicates_around_rotation() {
        let mut tree = Tree::new();
        for x in [0, 0, -1, 0, -1, 1, -1, 0] {
            tree.insert(x);
            tree.check_consistency();
        }

        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            [-1, -1, -1, 0, 0, 0, 0, 1]
        );
    }
}
