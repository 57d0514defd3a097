//! The four AVL rotations.
//!
//! Each rotation relinks existing nodes and rewrites `rank` and `balance` on
//! exactly the nodes it moves; nothing else in the tree is read or written.
//! Every primitive returns the handle of the new local root, which the caller
//! must store in the slot the old root came from.

use super::RawPositionTree;
use crate::raw::{Balance, Handle};

impl<T> RawPositionTree<T> {
    /// Rotates `a` down to the left, lifting its right child `b`.
    ///
    /// Both nodes end up `Same`; `b` gains `a` and `a`'s left subtree in front
    /// of it, so `b.rank += a.rank + 1`.
    pub(super) fn rotate_left(&mut self, a: Handle) -> Handle {
        let b = self.nodes.get(a).right().expect("`rotate_left()` - node has no right child!");
        let inner = self.nodes.get(b).left();
        let a_rank = self.nodes.get(a).rank();

        let a_node = self.nodes.get_mut(a);
        a_node.set_right(inner);
        a_node.set_balance(Balance::Same);

        let b_node = self.nodes.get_mut(b);
        b_node.set_left(Some(a));
        b_node.set_balance(Balance::Same);
        b_node.set_rank(b_node.rank() + a_rank + 1);
        b
    }

    /// Rotates `a` down to the right, lifting its left child `b`.
    ///
    /// Both nodes end up `Same`; `a` loses `b` and `b`'s left subtree from
    /// its front, so `a.rank -= b.rank + 1`.
    pub(super) fn rotate_right(&mut self, a: Handle) -> Handle {
        let b = self.nodes.get(a).left().expect("`rotate_right()` - node has no left child!");
        let inner = self.nodes.get(b).right();
        let b_rank = self.nodes.get(b).rank();

        let a_node = self.nodes.get_mut(a);
        a_node.set_left(inner);
        a_node.set_balance(Balance::Same);
        a_node.set_rank(a_node.rank() - (b_rank + 1));

        let b_node = self.nodes.get_mut(b);
        b_node.set_right(Some(a));
        b_node.set_balance(Balance::Same);
        b
    }

    /// Double left rotation: lifts `b = a.right.left` over both `a` and
    /// `c = a.right`.
    pub(super) fn rotate_right_left(&mut self, a: Handle) -> Handle {
        let c = self.nodes.get(a).right().expect("`rotate_right_left()` - node has no right child!");
        let b = self.nodes.get(c).left().expect("`rotate_right_left()` - right child has no left child!");
        let (b_left, b_right, b_rank, b_balance) = {
            let b_node = self.nodes.get(b);
            (b_node.left(), b_node.right(), b_node.rank(), b_node.balance())
        };
        let (a_balance, c_balance) = Self::double_rotation_balances(b_balance);

        let a_node = self.nodes.get_mut(a);
        a_node.set_right(b_left);
        a_node.set_balance(a_balance);
        let a_rank = a_node.rank();

        let c_node = self.nodes.get_mut(c);
        c_node.set_left(b_right);
        c_node.set_balance(c_balance);
        c_node.set_rank(c_node.rank() - (b_rank + 1));

        let b_node = self.nodes.get_mut(b);
        b_node.set_left(Some(a));
        b_node.set_right(Some(c));
        b_node.set_balance(Balance::Same);
        b_node.set_rank(b_rank + a_rank + 1);
        b
    }

    /// Double right rotation: lifts `b = c.left.right` over both `a = c.left`
    /// and `c`.
    pub(super) fn rotate_left_right(&mut self, c: Handle) -> Handle {
        let a = self.nodes.get(c).left().expect("`rotate_left_right()` - node has no left child!");
        let b = self.nodes.get(a).right().expect("`rotate_left_right()` - left child has no right child!");
        let (b_left, b_right, b_balance) = {
            let b_node = self.nodes.get(b);
            (b_node.left(), b_node.right(), b_node.balance())
        };
        let (a_balance, c_balance) = Self::double_rotation_balances(b_balance);

        let a_node = self.nodes.get_mut(a);
        a_node.set_right(b_left);
        a_node.set_balance(a_balance);
        let a_rank = a_node.rank();

        let b_node = self.nodes.get_mut(b);
        b_node.set_left(Some(a));
        b_node.set_right(Some(c));
        b_node.set_balance(Balance::Same);
        b_node.set_rank(b_node.rank() + a_rank + 1);
        let b_rank = b_node.rank();

        let c_node = self.nodes.get_mut(c);
        c_node.set_left(b_right);
        c_node.set_balance(c_balance);
        c_node.set_rank(c_node.rank() - (b_rank + 1));
        b
    }

    /// Final balances of the outer-left and outer-right nodes of a double
    /// rotation, given the lifted node's balance before the rotation.
    const fn double_rotation_balances(lifted: Balance) -> (Balance, Balance) {
        match lifted {
            Balance::Left => (Balance::Same, Balance::Right),
            Balance::Right => (Balance::Left, Balance::Same),
            Balance::Same => (Balance::Same, Balance::Same),
        }
    }
}
