mod arena;
mod handle;
mod node;
mod raw_position_tree;

pub(crate) use handle::Handle;
pub(crate) use node::Balance;
#[cfg(test)]
pub(crate) use node::Node;
pub(crate) use raw_position_tree::{RawPositionTree, Spine};
