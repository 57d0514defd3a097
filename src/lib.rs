//! Position-indexed AVL trees for Rust.
//!
//! This crate provides [`PositionTree`], an ordered sequence stored in a
//! height-balanced binary tree where elements are addressed by their position
//! rather than by a key. It is the structural core of an editable text buffer:
//!
//! - [`insert`](PositionTree::insert) - Insert at any position in O(log n)
//! - [`remove`](PositionTree::remove) - Remove at any position in O(log n)
//! - [`get`](PositionTree::get) - Look up by position in O(log n)
//! - [`range`](PositionTree::range) - Extract a contiguous window in O(log n + k)
//!
//! # Example
//!
//! ```
//! use edit_tree::PositionTree;
//!
//! let mut buffer = PositionTree::from("hello world");
//!
//! // Edits land anywhere without shifting the rest of the buffer.
//! buffer.insert(5, ',');
//! assert_eq!(buffer.remove(6), ' ');
//! buffer.insert_str(6, " big ");
//!
//! assert_eq!(buffer.substring(0, buffer.len()), "hello, big world");
//! assert_eq!(buffer[7], 'b');
//! assert_eq!(buffer.substring(7, 3), "big");
//!
//! // Out-of-range edits can be reported instead of panicking.
//! assert!(buffer.try_remove(100).is_err());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) positional edits** - Rank-augmented AVL tree, no element shifting
//! - **Bounded height** - Never more than about 1.44 · log<sub>2</sub>(n + 2) levels
//! - **`serde`** (optional) - Serializes as a plain sequence
//!
//! # Implementation
//!
//! Each node stores the size of its left subtree (its *rank*) and a three-way
//! balance code. Positions are resolved by descending from the root and
//! subtracting `rank + 1` at every right turn, so no parent pointers or keys
//! are needed. Rotations repair ranks and balance codes locally on the two or
//! three nodes they move.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod raw;

pub mod position_tree;

pub use error::Error;
pub use position_tree::PositionTree;
