use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Index, IndexMut};

use alloc::vec::Vec;

use crate::Error;
use crate::raw::{RawPositionTree, Spine};

mod capacity;
#[cfg(feature = "serde")]
mod serialize;
mod text;

/// A sequence stored in a height-balanced binary tree and addressed by
/// position.
///
/// Unlike a `Vec`, inserting or removing an element anywhere in the sequence
/// costs O(log n): no elements are shifted, only the path from the root to
/// the edited position is touched and at most a constant number of nodes are
/// rotated. Lookup by position is O(log n) as well.
///
/// This makes `PositionTree<char>` a reasonable backing store for an editable
/// text buffer, where edits land at arbitrary cursor positions.
///
/// # Examples
///
/// ```
/// use edit_tree::PositionTree;
///
/// let mut text = PositionTree::from("hllo");
/// text.insert(1, 'e');
/// text.push('!');
///
/// assert_eq!(text.len(), 6);
/// assert_eq!(text[1], 'e');
/// assert_eq!(text.substring(0, 5), "hello");
///
/// assert_eq!(text.remove(5), '!');
/// assert_eq!(text.iter().collect::<String>(), "hello");
/// ```
///
/// # Implementation
///
/// The tree is an [AVL tree] whose nodes are ordered by position rather than
/// by key. Every node records how many elements sit in its left subtree (its
/// *rank*) and which of its subtrees is taller (its *balance*). A descent
/// subtracts `rank + 1` each time it turns right, which is all that is needed
/// to find a position; the balance codes drive the rotations that keep the
/// height within about 1.44 · log<sub>2</sub>(n + 2).
///
/// Nodes live in a per-tree arena and refer to each other by index, so a
/// tree never shares nodes with another tree and cloning is a flat copy.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct PositionTree<T> {
    raw: RawPositionTree<T>,
}

/// An iterator over the elements of a `PositionTree`, in order.
///
/// This `struct` is created by the [`iter`] method on [`PositionTree`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use edit_tree::PositionTree;
///
/// let tree = PositionTree::from([1, 2, 3]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: PositionTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawPositionTree<T>,
    front: Spine,
    back: Spine,
    remaining: usize,
}

/// An owning iterator over the elements of a `PositionTree`, in order.
///
/// This `struct` is created by the [`into_iter`] method on [`PositionTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: PositionTree#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> PositionTree<T> {
    /// Makes a new, empty `PositionTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::new();
    /// tree.push('a');
    /// ```
    #[must_use]
    pub const fn new() -> PositionTree<T> {
        PositionTree {
            raw: RawPositionTree::new(),
        }
    }

    /// Removes all elements and resets the rotation counter.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("abc");
    /// assert_eq!(tree.len(), 3);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels in the tree; 0 for an empty tree, 1 for a
    /// single element.
    ///
    /// Follows the balance codes down a single path instead of visiting every
    /// node.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("abcdefg");
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of rotations performed to keep the tree balanced
    /// since it was created or last cleared. A double rotation counts as two.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::new();
    /// tree.push('a');
    /// tree.push('b');
    /// assert_eq!(tree.rotation_count(), 0);
    /// tree.push('c');
    /// assert_eq!(tree.rotation_count(), 1);
    /// ```
    #[must_use]
    pub const fn rotation_count(&self) -> usize {
        self.raw.rotations()
    }

    /// Returns a reference to the element at position `index`, or `None` if
    /// `index` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("abc");
    /// assert_eq!(tree.get(1), Some(&'b'));
    /// assert_eq!(tree.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.raw.get(index)
    }

    /// Returns a mutable reference to the element at position `index`, or
    /// `None` if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::from("abc");
    /// if let Some(ch) = tree.get_mut(1) {
    ///     *ch = 'B';
    /// }
    /// assert_eq!(tree.substring(0, 3), "aBc");
    /// ```
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.raw.get_mut(index)
    }

    /// Returns the first element, or `None` if the tree is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.get(0)
    }

    /// Returns the last element, or `None` if the tree is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.raw.get(index))
    }

    /// Inserts `value` at position `index`, shifting every later element one
    /// position up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::from("ac");
    /// tree.insert(1, 'b');
    /// tree.insert(3, 'd');
    /// assert_eq!(tree.substring(0, 4), "abcd");
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(error) = self.try_insert(index, value) {
            panic!("{error}");
        }
    }

    /// Inserts `value` at position `index`, or returns
    /// [`Error::IndexOutOfBounds`] if `index > len`.
    ///
    /// # Errors
    ///
    /// Returns an error, and drops `value`, when `index` is past the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::{Error, PositionTree};
    ///
    /// let mut tree = PositionTree::from("ab");
    /// assert_eq!(tree.try_insert(2, 'c'), Ok(()));
    /// assert_eq!(tree.try_insert(5, 'x'), Err(Error::IndexOutOfBounds { index: 5, len: 3 }));
    /// ```
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        if index > self.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.len() });
        }
        self.raw.insert(index, value);
        Ok(())
    }

    /// Appends `value` to the end of the sequence.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn push(&mut self, value: T) {
        self.raw.insert(self.len(), value);
    }

    /// Removes and returns the element at position `index`, shifting every
    /// later element one position down.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::from("abc");
    /// assert_eq!(tree.remove(1), 'b');
    /// assert_eq!(tree.substring(0, 2), "ac");
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Removes and returns the element at position `index`, or returns
    /// [`Error::IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Errors
    ///
    /// Returns an error when `index` does not name an element.
    pub fn try_remove(&mut self, index: usize) -> Result<T, Error> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.len() });
        }
        Ok(self.raw.remove(index))
    }

    /// Removes the last element and returns it, or `None` if the tree is empty.
    pub fn pop(&mut self) -> Option<T> {
        let index = self.len().checked_sub(1)?;
        Some(self.raw.remove(index))
    }

    /// Feeds the `len` elements starting at position `start` to `sink`, in
    /// order.
    ///
    /// Only the parts of the tree overlapping the window are visited, so the
    /// cost is O(log n + len) regardless of the size of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOutOfBounds`] if `start + len` exceeds the
    /// length of the tree; `sink` is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("abcdef");
    /// let mut out = String::from(">");
    /// tree.try_range_into(2, 3, &mut out).unwrap();
    /// assert_eq!(out, ">cde");
    /// ```
    pub fn try_range_into<'a, E>(&'a self, start: usize, len: usize, sink: &mut E) -> Result<(), Error>
    where
        E: Extend<&'a T>,
    {
        match start.checked_add(len) {
            Some(end) if end <= self.len() => {
                self.raw.range_into(self.raw.root(), start, len, sink);
                Ok(())
            }
            _ => Err(Error::RangeOutOfBounds {
                start,
                len,
                tree_len: self.len(),
            }),
        }
    }

    /// Returns references to the `len` elements starting at position `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOutOfBounds`] if the window reaches past the end.
    pub fn try_range(&self, start: usize, len: usize) -> Result<Vec<&T>, Error> {
        let mut out = Vec::with_capacity(len.min(self.len()));
        self.try_range_into(start, len, &mut out)?;
        Ok(out)
    }

    /// Returns references to the `len` elements starting at position `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + len > len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from([10, 20, 30, 40]);
    /// assert_eq!(tree.range(1, 2), [&20, &30]);
    /// ```
    #[must_use]
    pub fn range(&self, start: usize, len: usize) -> Vec<&T> {
        match self.try_range(start, len) {
            Ok(out) => out,
            Err(error) => panic!("{error}"),
        }
    }

    /// Gets an iterator over the elements of the tree, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from([3, 1, 2]);
    /// let items: Vec<_> = tree.iter().copied().collect();
    /// assert_eq!(items, [3, 1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let mut front = Spine::new();
        let mut back = Spine::new();
        self.raw.push_left_spine(self.raw.root(), &mut front);
        self.raw.push_right_spine(self.raw.root(), &mut back);
        Iter {
            tree: &self.raw,
            front,
            back,
            remaining: self.len(),
        }
    }
}

impl<T: Clone> Clone for PositionTree<T> {
    fn clone(&self) -> Self {
        PositionTree { raw: self.raw.clone() }
    }
}

impl<T: Hash> Hash for PositionTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for PositionTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PositionTree<T> {}

impl<T: fmt::Debug> fmt::Debug for PositionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for PositionTree<T> {
    fn default() -> Self {
        PositionTree::new()
    }
}

impl<T> FromIterator<T> for PositionTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = PositionTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for PositionTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for PositionTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.push(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a PositionTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for PositionTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the elements, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("xyz");
    /// let mut iter = tree.into_iter();
    /// assert_eq!(iter.next(), Some('x'));
    /// assert_eq!(iter.next_back(), Some('z'));
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

/// Indexes into the tree by position.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
impl<T> Index<usize> for PositionTree<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("{}", Error::IndexOutOfBounds { index, len: self.len() }),
        }
    }
}

/// Mutably indexes into the tree by position.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
impl<T> IndexMut<usize> for PositionTree<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("{}", Error::IndexOutOfBounds { index, len }),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for PositionTree<T> {
    fn from(arr: [T; N]) -> Self {
        let mut tree = PositionTree::with_capacity(N);
        tree.extend(arr);
        tree
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        let handle = self.front.pop()?;
        let node = tree.node(handle);
        tree.push_left_spine(node.right(), &mut self.front);
        self.remaining -= 1;
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        let handle = self.back.pop()?;
        let node = tree.node(handle);
        tree.push_right_spine(node.left(), &mut self.back);
        self.remaining -= 1;
        Some(node.value())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}
