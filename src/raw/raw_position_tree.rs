use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Balance, Node};

mod rotate;

/// The core AVL implementation backing `PositionTree`.
///
/// Elements are ordered by position only. Each node stores the size of its
/// left subtree (`rank`), which is enough to find any position by descending
/// from the root. Indices passed to the mutating methods must already be in
/// bounds; the public wrapper checks them.
#[derive(Clone)]
pub(crate) struct RawPositionTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, `None` while the tree is empty.
    root: Option<Handle>,
    /// Total number of elements in the tree.
    len: usize,
    /// Rotations performed since creation or the last `clear`. A double
    /// rotation counts as two.
    rotations: usize,
}

/// Outcome of inserting into, or rebalancing after a change below, a subtree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Step {
    /// The node now rooting the subtree.
    pub(crate) root: Handle,
    /// Whether the subtree's height differs from before the operation.
    pub(crate) height_changed: bool,
    /// Rotations performed inside the subtree.
    pub(crate) rotations: usize,
}

/// Outcome of removing one element from a subtree.
#[derive(Debug)]
pub(crate) struct Removal<T> {
    /// The node now rooting the subtree, `None` if it became empty.
    pub(crate) root: Option<Handle>,
    /// The element that was removed.
    pub(crate) value: T,
    /// Whether the subtree lost a level.
    pub(crate) height_changed: bool,
    /// Rotations performed inside the subtree.
    pub(crate) rotations: usize,
}

/// Stack of handles used for in-order walks. Holds the full height of any
/// tree a `u32` handle can address without spilling to the heap.
pub(crate) type Spine = SmallVec<[Handle; 64]>;

impl<T> RawPositionTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            rotations: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            rotations: 0,
        }
    }

    /// Returns the number of elements in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the number of rotations performed so far.
    pub(crate) const fn rotations(&self) -> usize {
        self.rotations
    }

    /// Returns the root handle, if any.
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Removes every element.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.rotations = 0;
    }

    /// Number of levels in the tree, 0 when empty.
    ///
    /// Walks a single root-to-leaf path chosen by the balance codes: a node
    /// leaning left is at least as deep on the left, any other node is at
    /// least as deep on the right. O(log n).
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            height += 1;
            current = match node.balance() {
                Balance::Left => node.left(),
                Balance::Same | Balance::Right => node.right(),
            };
        }

        height
    }

    /// Number of elements in the subtree rooted at `node`, found by following
    /// the right spine and summing `rank + 1` at each step. O(log n).
    #[cfg(test)]
    pub(crate) fn subtree_size(&self, node: Option<Handle>) -> usize {
        let mut size = 0;
        let mut current = node;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            size += node.rank() + 1;
            current = node.right();
        }

        size
    }

    /// Inserts `value` so that it ends up at position `index`.
    ///
    /// `index` must be at most `len`.
    pub(crate) fn insert(&mut self, index: usize, value: T) {
        debug_assert!(index <= self.len, "insert: index {index} > len {}", self.len);

        let step = self.insert_at(self.root, index, value);
        self.root = Some(step.root);
        self.len += 1;
        self.rotations += step.rotations;
    }

    /// Removes and returns the element at position `index`.
    ///
    /// `index` must be less than `len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        debug_assert!(index < self.len, "remove: index {index} >= len {}", self.len);

        let root = self.root.expect("remove: tree is empty");
        let removal = self.remove_at(root, index);
        self.root = removal.root;
        self.len -= 1;
        self.rotations += removal.rotations;
        removal.value
    }

    /// Recursive insertion into the subtree rooted at `node`.
    pub(crate) fn insert_at(&mut self, node: Option<Handle>, index: usize, value: T) -> Step {
        let Some(handle) = node else {
            return Step {
                root: self.nodes.alloc(Node::leaf(value)),
                height_changed: true,
                rotations: 0,
            };
        };

        let (rank, left, right) = {
            let node = self.nodes.get(handle);
            (node.rank(), node.left(), node.right())
        };

        if index > rank {
            let step = self.insert_at(right, index - (rank + 1), value);
            self.nodes.get_mut(handle).set_right(Some(step.root));
            if step.height_changed {
                self.grew_right(handle, step.rotations)
            } else {
                Step { root: handle, ..step }
            }
        } else {
            self.nodes.get_mut(handle).set_rank(rank + 1);
            let step = self.insert_at(left, index, value);
            self.nodes.get_mut(handle).set_left(Some(step.root));
            if step.height_changed {
                self.grew_left(handle, step.rotations)
            } else {
                Step { root: handle, ..step }
            }
        }
    }

    // The right subtree of `handle` gained a level.
    fn grew_right(&mut self, handle: Handle, rotations: usize) -> Step {
        let node = self.nodes.get_mut(handle);
        match node.balance() {
            Balance::Same => {
                node.set_balance(Balance::Right);
                Step {
                    root: handle,
                    height_changed: true,
                    rotations,
                }
            }
            Balance::Left => {
                node.set_balance(Balance::Same);
                Step {
                    root: handle,
                    height_changed: false,
                    rotations,
                }
            }
            Balance::Right => {
                let child = node.right().expect("grew_right: right-heavy node has no right child");
                let (root, performed) = if self.nodes.get(child).balance() == Balance::Left {
                    (self.rotate_right_left(handle), 2)
                } else {
                    (self.rotate_left(handle), 1)
                };
                Step {
                    root,
                    height_changed: false,
                    rotations: rotations + performed,
                }
            }
        }
    }

    // The left subtree of `handle` gained a level.
    fn grew_left(&mut self, handle: Handle, rotations: usize) -> Step {
        let node = self.nodes.get_mut(handle);
        match node.balance() {
            Balance::Same => {
                node.set_balance(Balance::Left);
                Step {
                    root: handle,
                    height_changed: true,
                    rotations,
                }
            }
            Balance::Right => {
                node.set_balance(Balance::Same);
                Step {
                    root: handle,
                    height_changed: false,
                    rotations,
                }
            }
            Balance::Left => {
                let child = node.left().expect("grew_left: left-heavy node has no left child");
                let (root, performed) = if self.nodes.get(child).balance() == Balance::Right {
                    (self.rotate_left_right(handle), 2)
                } else {
                    (self.rotate_right(handle), 1)
                };
                Step {
                    root,
                    height_changed: false,
                    rotations: rotations + performed,
                }
            }
        }
    }

    /// Recursive removal of position `index` from the subtree rooted at `handle`.
    pub(crate) fn remove_at(&mut self, handle: Handle, index: usize) -> Removal<T> {
        let (rank, left, right) = {
            let node = self.nodes.get(handle);
            (node.rank(), node.left(), node.right())
        };

        if index > rank {
            let right = right.expect("remove_at: index past the end of the subtree");
            let removal = self.remove_at(right, index - (rank + 1));
            self.nodes.get_mut(handle).set_right(removal.root);
            return self.after_right_removal(handle, removal);
        }

        if index < rank {
            let left = left.expect("remove_at: rank counts a missing left subtree");
            self.nodes.get_mut(handle).set_rank(rank - 1);
            let removal = self.remove_at(left, index);
            self.nodes.get_mut(handle).set_left(removal.root);
            return self.after_left_removal(handle, removal);
        }

        match (left, right) {
            (None, None) | (Some(_), None) | (None, Some(_)) => {
                let node = self.nodes.take(handle);
                Removal {
                    root: left.or(right),
                    value: node.into_value(),
                    height_changed: true,
                    rotations: 0,
                }
            }
            (Some(_), Some(right)) => {
                // The in-order successor is position 0 of the right subtree and
                // has no left child, so it leaves through the case above.
                let successor = self.remove_at(right, 0);
                let node = self.nodes.get_mut(handle);
                node.set_right(successor.root);
                let value = node.replace_value(successor.value);
                let removal = Removal {
                    root: successor.root,
                    value,
                    height_changed: successor.height_changed,
                    rotations: successor.rotations,
                };
                self.after_right_removal(handle, removal)
            }
        }
    }

    // Rebalances `handle` after its right subtree lost an element.
    fn after_right_removal(&mut self, handle: Handle, removal: Removal<T>) -> Removal<T> {
        let step = if removal.height_changed {
            self.shrank_right(handle, removal.rotations)
        } else {
            Step {
                root: handle,
                height_changed: false,
                rotations: removal.rotations,
            }
        };
        Removal {
            root: Some(step.root),
            value: removal.value,
            height_changed: step.height_changed,
            rotations: step.rotations,
        }
    }

    // Rebalances `handle` after its left subtree lost an element.
    fn after_left_removal(&mut self, handle: Handle, removal: Removal<T>) -> Removal<T> {
        let step = if removal.height_changed {
            self.shrank_left(handle, removal.rotations)
        } else {
            Step {
                root: handle,
                height_changed: false,
                rotations: removal.rotations,
            }
        };
        Removal {
            root: Some(step.root),
            value: removal.value,
            height_changed: step.height_changed,
            rotations: step.rotations,
        }
    }

    // The right subtree of `handle` lost a level.
    fn shrank_right(&mut self, handle: Handle, rotations: usize) -> Step {
        let node = self.nodes.get_mut(handle);
        match node.balance() {
            Balance::Right => {
                node.set_balance(Balance::Same);
                Step {
                    root: handle,
                    height_changed: true,
                    rotations,
                }
            }
            Balance::Same => {
                node.set_balance(Balance::Left);
                Step {
                    root: handle,
                    height_changed: false,
                    rotations,
                }
            }
            Balance::Left => {
                let sibling = node.left().expect("shrank_right: left-heavy node has no left child");
                match self.nodes.get(sibling).balance() {
                    Balance::Left => Step {
                        root: self.rotate_right(handle),
                        height_changed: true,
                        rotations: rotations + 1,
                    },
                    Balance::Same => {
                        let root = self.rotate_right(handle);
                        self.nodes.get_mut(root).set_balance(Balance::Right);
                        self.nodes.get_mut(handle).set_balance(Balance::Left);
                        Step {
                            root,
                            height_changed: false,
                            rotations: rotations + 1,
                        }
                    }
                    Balance::Right => Step {
                        root: self.rotate_left_right(handle),
                        height_changed: true,
                        rotations: rotations + 2,
                    },
                }
            }
        }
    }

    // The left subtree of `handle` lost a level.
    fn shrank_left(&mut self, handle: Handle, rotations: usize) -> Step {
        let node = self.nodes.get_mut(handle);
        match node.balance() {
            Balance::Left => {
                node.set_balance(Balance::Same);
                Step {
                    root: handle,
                    height_changed: true,
                    rotations,
                }
            }
            Balance::Same => {
                node.set_balance(Balance::Right);
                Step {
                    root: handle,
                    height_changed: false,
                    rotations,
                }
            }
            Balance::Right => {
                let sibling = node.right().expect("shrank_left: right-heavy node has no right child");
                match self.nodes.get(sibling).balance() {
                    Balance::Right => Step {
                        root: self.rotate_left(handle),
                        height_changed: true,
                        rotations: rotations + 1,
                    },
                    Balance::Same => {
                        let root = self.rotate_left(handle);
                        self.nodes.get_mut(root).set_balance(Balance::Left);
                        self.nodes.get_mut(handle).set_balance(Balance::Right);
                        Step {
                            root,
                            height_changed: false,
                            rotations: rotations + 1,
                        }
                    }
                    Balance::Left => Step {
                        root: self.rotate_right_left(handle),
                        height_changed: true,
                        rotations: rotations + 2,
                    },
                }
            }
        }
    }

    /// Finds the node at position `index`.
    fn locate(&self, index: usize) -> Option<Handle> {
        if index >= self.len {
            return None;
        }

        let mut current = self.root;
        let mut remaining = index;

        loop {
            let handle = current.expect("locate: rank bookkeeping points past a leaf");
            let node = self.nodes.get(handle);
            let rank = node.rank();

            if remaining == rank {
                return Some(handle);
            }
            if remaining > rank {
                remaining -= rank + 1;
                current = node.right();
            } else {
                current = node.left();
            }
        }
    }

    /// Returns the element at position `index`.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let handle = self.locate(index)?;
        Some(self.nodes.get(handle).value())
    }

    /// Returns a mutable reference to the element at position `index`.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let handle = self.locate(index)?;
        Some(self.nodes.get_mut(handle).value_mut())
    }

    /// Feeds the `len` elements starting at position `start` of the subtree
    /// rooted at `node` into `sink`, in order.
    ///
    /// Only subtrees overlapping the requested window are entered.
    pub(crate) fn range_into<'a, E>(&'a self, node: Option<Handle>, start: usize, len: usize, sink: &mut E)
    where
        E: Extend<&'a T>,
    {
        if len == 0 {
            return;
        }
        let Some(handle) = node else {
            return;
        };

        let node = self.nodes.get(handle);
        let rank = node.rank();

        if start > rank {
            self.range_into(node.right(), start - (rank + 1), len, sink);
            return;
        }

        // Part of the window before this node lives in the left subtree.
        self.range_into(node.left(), start, len.min(rank - start), sink);

        let end = start + len;
        if end > rank {
            sink.extend(core::iter::once(node.value()));
            self.range_into(node.right(), 0, end - (rank + 1), sink);
        }
    }

    /// Pushes `node` and its chain of left children onto `spine`.
    pub(crate) fn push_left_spine(&self, mut node: Option<Handle>, spine: &mut Spine) {
        while let Some(handle) = node {
            spine.push(handle);
            node = self.nodes.get(handle).left();
        }
    }

    /// Pushes `node` and its chain of right children onto `spine`.
    pub(crate) fn push_right_spine(&self, mut node: Option<Handle>, spine: &mut Spine) {
        while let Some(handle) = node {
            spine.push(handle);
            node = self.nodes.get(handle).right();
        }
    }

    /// Removes every element, returning them in order.
    /// O(n), with no rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len);
        let mut spine = Spine::new();
        self.push_left_spine(self.root, &mut spine);
        while let Some(handle) = spine.pop() {
            order.push(handle);
            self.push_left_spine(self.nodes.get(handle).right(), &mut spine);
        }

        let result = order.into_iter().map(|handle| self.nodes.take(handle).into_value()).collect();
        self.clear();
        result
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<T> RawPositionTree<T> {
        /// Recomputes every node's subtree size and height from scratch and
        /// panics with a description of each violated invariant.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut visited = 0usize;
            let (size, height) = self.validate_node(self.root, &mut visited, &mut errors);

            if size != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, actual count={}", self.len, size));
            }
            if visited != self.nodes.len() {
                errors.push(alloc::format!(
                    "arena holds {} live nodes but {} are reachable",
                    self.nodes.len(),
                    visited
                ));
            }
            if height != self.height() {
                errors.push(alloc::format!("height() = {} but actual height is {}", self.height(), height));
            }
            if size != self.subtree_size(self.root) {
                errors.push(alloc::format!(
                    "subtree_size(root) = {} but actual size is {}",
                    self.subtree_size(self.root),
                    size
                ));
            }
            if size < min_avl_size(height) {
                errors.push(alloc::format!(
                    "height {} needs at least {} elements but the tree holds {}",
                    height,
                    min_avl_size(height),
                    size
                ));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        // Returns (size, levels) of the subtree.
        fn validate_node(&self, node: Option<Handle>, visited: &mut usize, errors: &mut Vec<String>) -> (usize, usize) {
            let Some(handle) = node else {
                return (0, 0);
            };
            *visited += 1;
            if *visited > self.nodes.len() {
                errors.push(alloc::format!("cycle or shared node detected at {:?}", handle));
                return (0, 0);
            }

            let node = self.nodes.get(handle);
            let (left_size, left_height) = self.validate_node(node.left(), visited, errors);
            let (right_size, right_height) = self.validate_node(node.right(), visited, errors);

            if node.rank() != left_size {
                errors.push(alloc::format!(
                    "rank mismatch at {:?}: rank={}, left subtree size={}",
                    handle,
                    node.rank(),
                    left_size
                ));
            }

            let expected = match right_height as isize - left_height as isize {
                -1 => Some(Balance::Left),
                0 => Some(Balance::Same),
                1 => Some(Balance::Right),
                _ => None,
            };
            match expected {
                Some(balance) if balance == node.balance() => {}
                Some(balance) => errors.push(alloc::format!(
                    "balance mismatch at {:?}: stored={:?}, actual={:?}",
                    handle,
                    node.balance(),
                    balance
                )),
                None => errors.push(alloc::format!(
                    "unbalanced at {:?}: left height={}, right height={}",
                    handle,
                    left_height,
                    right_height
                )),
            }

            (left_size + right_size + 1, left_height.max(right_height) + 1)
        }

        fn to_vec(&self) -> Vec<&T> {
            let mut out = Vec::new();
            self.range_into(self.root, 0, self.len, &mut out);
            out
        }
    }

    // Fewest elements an AVL tree with `height` levels can hold (Fibonacci
    // trees). Equivalent to the 1.44 * log2(n + 2) height bound.
    fn min_avl_size(height: usize) -> usize {
        let (mut shorter, mut taller) = (0usize, 1usize);
        match height {
            0 => 0,
            _ => {
                for _ in 1..height {
                    (shorter, taller) = (taller, shorter + taller + 1);
                }
                taller
            }
        }
    }

    fn build(text: &str) -> RawPositionTree<char> {
        let mut tree = RawPositionTree::new();
        for (index, ch) in text.chars().enumerate() {
            tree.insert(index, ch);
        }
        tree
    }

    fn contents(tree: &RawPositionTree<char>) -> String {
        let mut out = String::new();
        tree.range_into(tree.root, 0, tree.len, &mut out);
        out
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(usize, char),
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (any::<usize>(), proptest::char::range('a', 'z')).prop_map(|(index, ch)| Op::Insert(index, ch)),
            2 => any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_edit(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawPositionTree<char> = RawPositionTree::new();
            let mut model: Vec<char> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(index, ch) => {
                        let index = index % (model.len() + 1);
                        tree.insert(index, ch);
                        model.insert(index, ch);
                    }
                    Op::Remove(index) => {
                        if model.is_empty() {
                            continue;
                        }
                        let index = index % model.len();
                        prop_assert_eq!(tree.remove(index), model.remove(index));
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let actual: Vec<char> = tree.to_vec().into_iter().copied().collect();
            prop_assert_eq!(actual, model);
        }

        #[test]
        fn insert_then_remove_restores_sequence(text in "[a-z]{0,64}", index in any::<usize>(), ch in proptest::char::range('A', 'Z')) {
            let mut tree = build(&text);
            let before = contents(&tree);
            let index = index % (tree.len() + 1);

            tree.insert(index, ch);
            tree.validate_invariants();
            prop_assert_eq!(tree.len(), before.chars().count() + 1);
            prop_assert_eq!(tree.get(index), Some(&ch));

            prop_assert_eq!(tree.remove(index), ch);
            tree.validate_invariants();
            prop_assert_eq!(contents(&tree), before);
        }

        #[test]
        fn range_matches_slice(text in "[a-z]{0,80}", start in any::<usize>(), len in any::<usize>()) {
            let tree = build(&text);
            let chars: Vec<char> = text.chars().collect();
            let start = start % (chars.len() + 1);
            let len = len % (chars.len() - start + 1);

            let mut out: Vec<&char> = Vec::new();
            tree.range_into(tree.root, start, len, &mut out);
            let expected: Vec<&char> = chars[start..start + len].iter().collect();
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn get_matches_model(text in "[a-z]{1,80}") {
            let tree = build(&text);
            for (index, ch) in text.chars().enumerate() {
                prop_assert_eq!(tree.get(index), Some(&ch));
            }
            prop_assert!(tree.get(tree.len()).is_none());
        }
    }

    #[test]
    fn empty_tree() {
        let tree: RawPositionTree<char> = RawPositionTree::new();
        tree.validate_invariants();
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.subtree_size(tree.root()), 0);
        assert!(tree.get(0).is_none());
    }

    #[test]
    fn appending_three_rotates_once() {
        let mut tree = RawPositionTree::new();
        tree.insert(0, 'a');
        tree.insert(1, 'b');
        assert_eq!(tree.rotations(), 0);
        tree.insert(2, 'c');
        tree.validate_invariants();

        assert_eq!(tree.rotations(), 1);
        let root = tree.node(tree.root().unwrap());
        assert_eq!(*root.value(), 'b');
        assert_eq!(root.rank(), 1);
        assert_eq!(contents(&tree), "abc");
    }

    #[test]
    fn prepending_three_rotates_once() {
        let mut tree = RawPositionTree::new();
        for ch in ['c', 'b', 'a'] {
            tree.insert(0, ch);
        }
        tree.validate_invariants();

        assert_eq!(tree.rotations(), 1);
        assert_eq!(*tree.node(tree.root().unwrap()).value(), 'b');
        assert_eq!(contents(&tree), "abc");
    }

    #[test]
    fn zig_zag_insert_uses_double_rotation() {
        let mut tree = RawPositionTree::new();
        tree.insert(0, 'a');
        tree.insert(1, 'c');
        tree.insert(1, 'b');
        tree.validate_invariants();

        assert_eq!(tree.rotations(), 2);
        assert_eq!(*tree.node(tree.root().unwrap()).value(), 'b');
        assert_eq!(contents(&tree), "abc");
    }

    #[test]
    fn remove_middle_of_three() {
        let mut tree = build("abc");
        assert_eq!(tree.remove(1), 'b');
        tree.validate_invariants();
        assert_eq!(tree.len(), 2);
        assert_eq!(contents(&tree), "ac");
    }

    #[test]
    fn remove_two_child_node_promotes_successor() {
        let mut tree = build("abcdefg");
        let root = tree.root().unwrap();
        let root_index = tree.node(root).rank();
        let root_value = *tree.node(root).value();

        assert_eq!(tree.remove(root_index), root_value);
        tree.validate_invariants();

        // The successor's payload moved into the old root node.
        assert_eq!(tree.root(), Some(root));
        assert_eq!(*tree.node(root).value(), 'e');
        assert_eq!(contents(&tree), "abcefg");
    }

    #[test]
    fn remove_with_same_balanced_sibling_stops_after_rotation() {
        //     b
        //    / \
        //   a   d
        //      / \
        //     c   e
        // Removing 'a' leaves 'b' right-heavy with a `Same` sibling.
        let mut tree = RawPositionTree::new();
        for (index, ch) in [(0, 'b'), (1, 'd'), (0, 'a'), (2, 'c'), (4, 'e')] {
            tree.insert(index, ch);
        }
        tree.validate_invariants();
        assert_eq!(contents(&tree), "abcde");
        let before = tree.rotations();

        assert_eq!(tree.remove(0), 'a');
        tree.validate_invariants();

        assert_eq!(tree.rotations(), before + 1);
        let root = tree.node(tree.root().unwrap());
        assert_eq!(*root.value(), 'd');
        assert_eq!(root.balance(), Balance::Left);
        assert_eq!(tree.height(), 3);
        assert_eq!(contents(&tree), "bcde");
    }

    #[test]
    fn draining_from_both_ends_keeps_invariants() {
        let mut tree = build("abcdefghijklmnopqrstu");
        for index in (0..tree.len()).rev().step_by(2) {
            tree.remove(index);
            tree.validate_invariants();
        }
        while !tree.is_empty() {
            tree.remove(tree.len() / 2);
            tree.validate_invariants();
        }
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn ascending_appends_stay_logarithmic() {
        let mut tree = RawPositionTree::new();
        for i in 0..1000u32 {
            tree.insert(i as usize, i);
        }
        tree.validate_invariants();
        assert_eq!(tree.height(), 10);
    }

    #[test]
    fn five_appends_are_at_most_three_levels() {
        let tree = build("abcde");
        tree.validate_invariants();
        assert!(tree.height() <= 3);
        assert_eq!(contents(&tree), "abcde");
    }

    #[test]
    fn range_window_in_middle() {
        let tree = build("abcdef");
        let mut out = String::new();
        tree.range_into(tree.root(), 2, 3, &mut out);
        assert_eq!(out, "cde");
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut tree = build("abc");
        *tree.get_mut(1).unwrap() = 'B';
        tree.validate_invariants();
        assert_eq!(contents(&tree), "aBc");
        assert!(tree.get_mut(3).is_none());
    }

    #[test]
    fn drain_returns_sequence_and_empties_tree() {
        let mut tree = build("hello world");
        let drained: String = tree.drain_to_vec().into_iter().collect();
        assert_eq!(drained, "hello world");
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.rotations(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let original = build("abcdef");
        let mut copy = original.clone();
        copy.remove(0);
        copy.insert(0, 'z');
        copy.validate_invariants();
        original.validate_invariants();
        assert_eq!(contents(&original), "abcdef");
        assert_eq!(contents(&copy), "zbcdef");
    }

    #[test]
    fn spine_covers_a_full_walk_of_a_large_tree() {
        let mut tree = RawPositionTree::new();
        for value in (0..20_000u32).rev() {
            tree.insert(0, value);
        }
        let mut spine = Spine::new();
        tree.push_left_spine(tree.root(), &mut spine);
        assert!(spine.len() <= tree.height());
        assert!(!spine.spilled());

        let drained = tree.drain_to_vec();
        assert_eq!(drained, (0..20_000u32).collect::<Vec<_>>());
        assert!(tree.is_empty());
    }

    #[test]
    fn spines_walk_outer_edges() {
        let tree = build("abcdefg");
        let mut left = Spine::new();
        tree.push_left_spine(tree.root(), &mut left);
        let values: Vec<char> = left.iter().map(|&h| *tree.node(h).value()).collect();
        assert_eq!(values, vec!['d', 'b', 'a']);

        let mut right = Spine::new();
        tree.push_right_spine(tree.root(), &mut right);
        let values: Vec<char> = right.iter().map(|&h| *tree.node(h).value()).collect();
        assert_eq!(values, vec!['d', 'f', 'g']);
    }
}
