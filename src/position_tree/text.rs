//! Conveniences for trees of `char`, the text-buffer use case.

use alloc::string::String;

use super::PositionTree;
use crate::Error;

impl PositionTree<char> {
    /// Returns the `len` characters starting at position `start` as a
    /// `String`.
    ///
    /// # Panics
    ///
    /// Panics if `start + len` exceeds the length of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let tree = PositionTree::from("abcdef");
    /// assert_eq!(tree.substring(2, 3), "cde");
    /// assert_eq!(tree.substring(6, 0), "");
    /// ```
    #[must_use]
    pub fn substring(&self, start: usize, len: usize) -> String {
        match self.try_substring(start, len) {
            Ok(text) => text,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns the `len` characters starting at position `start` as a
    /// `String`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RangeOutOfBounds`] if the window reaches past the end.
    pub fn try_substring(&self, start: usize, len: usize) -> Result<String, Error> {
        let mut text = String::with_capacity(len.min(self.len()));
        self.try_range_into(start, len, &mut text)?;
        Ok(text)
    }

    /// Inserts every character of `text` starting at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edit_tree::PositionTree;
    ///
    /// let mut tree = PositionTree::from("hed");
    /// tree.insert_str(2, "llo worl");
    /// assert_eq!(tree.substring(0, tree.len()), "hello world");
    /// ```
    pub fn insert_str(&mut self, index: usize, text: &str) {
        if index > self.len() {
            panic!("{}", Error::IndexOutOfBounds { index, len: self.len() });
        }
        for (offset, ch) in text.chars().enumerate() {
            self.raw.insert(index + offset, ch);
        }
    }
}

impl From<&str> for PositionTree<char> {
    fn from(text: &str) -> Self {
        text.chars().collect()
    }
}

impl<'a> FromIterator<&'a char> for PositionTree<char> {
    fn from_iter<I: IntoIterator<Item = &'a char>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}
