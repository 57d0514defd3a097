use super::handle::Handle;

/// Which side of a node is taller, if either.
///
/// Stores the sign of `height(right) - height(left)` rather than a height, so
/// the per-node bookkeeping stays constant size. Any differential beyond one
/// level is unrepresentable and is repaired by a rotation before an operation
/// returns.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) enum Balance {
    /// The left subtree is one level taller.
    Left,
    /// Both subtrees have the same height.
    #[default]
    Same,
    /// The right subtree is one level taller.
    Right,
}

/// One element of the sequence and the subtree rooted at it.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    value: T,
    left: Option<Handle>,
    right: Option<Handle>,
    // Number of elements in the left subtree. A node's position within its own
    // subtree is exactly its rank.
    rank: usize,
    balance: Balance,
}

impl<T> Node<T> {
    /// Creates a childless node; the only way nodes enter a tree.
    pub(crate) const fn leaf(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            rank: 0,
            balance: Balance::Same,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replaces the payload, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: T) -> T {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    #[inline]
    pub(crate) const fn rank(&self) -> usize {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    #[inline]
    pub(crate) const fn balance(&self) -> Balance {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_balanced_with_zero_rank() {
        let node = Node::leaf('x');
        assert_eq!(*node.value(), 'x');
        assert_eq!(node.rank(), 0);
        assert_eq!(node.balance(), Balance::Same);
        assert_eq!((node.left(), node.right()), (None, None));
    }

    #[test]
    fn replace_value_returns_previous_payload() {
        let mut node = Node::leaf('a');
        assert_eq!(node.replace_value('b'), 'a');
        assert_eq!(node.into_value(), 'b');
    }

    #[test]
    fn child_links_are_independent() {
        let mut node = Node::leaf(0u8);
        node.set_right(Some(Handle::from_index(3)));
        assert_eq!(node.right(), Some(Handle::from_index(3)));
        assert_eq!(node.left(), None);
    }
}
