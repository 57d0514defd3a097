use thiserror::Error;

/// Errors returned by the checked (`try_*`) methods of
/// [`PositionTree`](crate::PositionTree).
///
/// The panicking counterparts of those methods panic with the same message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A position was outside the tree.
    ///
    /// For insertion `index == len` is valid (append); for every other
    /// operation `index` must be less than `len`.
    #[error("index out of bounds: the len is {len} but the index is {index}")]
    IndexOutOfBounds {
        /// The position that was requested.
        index: usize,
        /// The number of elements in the tree.
        len: usize,
    },

    /// A window `start..start + len` reached past the end of the tree.
    #[error("range out of bounds: the len is {tree_len} but the range is {start} + {len}")]
    RangeOutOfBounds {
        /// First position of the window.
        start: usize,
        /// Number of elements requested.
        len: usize,
        /// The number of elements in the tree.
        tree_len: usize,
    },
}
