//! `serde` support: a tree serializes as a plain sequence of its elements, in
//! order, and deserializes by appending each element.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::PositionTree;

// Upper bound on preallocation from an untrusted length hint.
const MAX_PREALLOCATED: usize = 4096;

impl<T: Serialize> Serialize for PositionTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct SequenceVisitor<T> {
    marker: PhantomData<fn() -> PositionTree<T>>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for SequenceVisitor<T> {
    type Value = PositionTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let capacity = seq.size_hint().map_or(0, |hint| hint.min(MAX_PREALLOCATED));
        let mut tree = PositionTree::with_capacity(capacity);
        while let Some(value) = seq.next_element()? {
            tree.push(value);
        }
        Ok(tree)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PositionTree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SequenceVisitor { marker: PhantomData })
    }
}
