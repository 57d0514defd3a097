use super::PositionTree;
use crate::raw::RawPositionTree;

impl<T> PositionTree<T> {
    /// Creates an empty tree with room for at least `capacity` elements
    /// before the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree: PositionTree<char> = PositionTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        PositionTree {
            raw: RawPositionTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the tree can hold without reallocating
    /// its node arena.
    ///
    /// Slots released by [`remove`](PositionTree::remove) are reused by later
    /// insertions, so the capacity never shrinks.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree: PositionTree<char> = PositionTree::with_capacity(32);
    /// assert_eq!(tree.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
