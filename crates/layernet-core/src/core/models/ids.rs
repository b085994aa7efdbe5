use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct LayerId;
}

/// Database identifier of a real network entity.
///
/// The source domain issues strictly positive ids that are unique across all
/// entity types, so a single id space is shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a group node. Always strictly negative, so it can never
/// collide with a [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupKey(i64);

impl GroupKey {
    /// Folds a 64-bit hash into the negative half of the `i64` range.
    pub fn from_hash(hash: u64) -> Self {
        Self(-((hash >> 1) as i64) - 1)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one displayable entry inside a layer's membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKey {
    Node(NodeId),
    Group(GroupKey),
}

impl EntryKey {
    pub fn is_group(self) -> bool {
        matches!(self, EntryKey::Group(_))
    }

    /// Numeric id exposed to renderers: positive for nodes, negative for groups.
    pub fn display_id(self) -> i64 {
        match self {
            EntryKey::Node(id) => id.value(),
            EntryKey::Group(key) => key.value(),
        }
    }
}

impl From<NodeId> for EntryKey {
    fn from(id: NodeId) -> Self {
        EntryKey::Node(id)
    }
}

impl From<GroupKey> for EntryKey {
    fn from(key: GroupKey) -> Self {
        EntryKey::Group(key)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Node(id) => write!(f, "node {}", id),
            EntryKey::Group(key) => write!(f, "group {}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_keys_are_always_negative() {
        for hash in [0u64, 1, 2, u64::MAX, u64::MAX - 1, 1 << 63, 0xcbf2_9ce4_8422_2325] {
            assert!(GroupKey::from_hash(hash).value() < 0, "hash {hash:#x}");
        }
    }

    #[test]
    fn display_id_keeps_node_and_group_ranges_apart() {
        let node = EntryKey::from(NodeId(42));
        let group = EntryKey::from(GroupKey::from_hash(42));
        assert_eq!(node.display_id(), 42);
        assert!(group.display_id() < 0);
        assert!(!node.is_group());
        assert!(group.is_group());
    }
}
