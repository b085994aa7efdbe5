use super::ids::NodeId;
use serde::{Deserialize, Serialize};

/// Association from a node to an entity in another (or the same) layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    pub target: NodeId,
    pub layer: String,
}

impl Link {
    pub fn new(target: NodeId, layer: &str) -> Self {
        Self {
            target,
            layer: layer.to_string(),
        }
    }
}

/// How repeated insertions of the same node merge their links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Every insertion appends its link, duplicates included.
    #[default]
    Append,
    /// A `(target, layer)` pair is recorded at most once per node.
    Deduplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Identifier in the source database (e.g. a primary gene identifier).
    pub external_id: String,
    pub label: String,
    pub(crate) links: Vec<Link>,
}

impl Node {
    pub(crate) fn new(id: NodeId, external_id: &str, label: &str) -> Self {
        Self {
            id,
            external_id: external_id.to_string(),
            label: label.to_string(),
            links: Vec::new(),
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Records `link`. Returns `false` if the policy dropped it as a duplicate.
    pub(crate) fn add_link(&mut self, link: Link, policy: LinkPolicy) -> bool {
        if policy == LinkPolicy::Deduplicate && self.links.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }
}

/// One node as delivered by the data-acquisition collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub dbid: i64,
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub linked_to: Option<i64>,
    #[serde(default)]
    pub linked_layer: Option<String>,
}

impl NodeRecord {
    pub fn new(dbid: i64, id: &str, symbol: &str) -> Self {
        Self {
            dbid,
            id: id.to_string(),
            symbol: symbol.to_string(),
            linked_to: None,
            linked_layer: None,
        }
    }

    pub fn linked(mut self, target: i64, layer: &str) -> Self {
        self.linked_to = Some(target);
        self.linked_layer = Some(layer.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_policy_keeps_duplicate_links() {
        let mut node = Node::new(NodeId(7), "CHEBI:1", "aspirin");
        let link = Link::new(NodeId(1), "Gene");
        assert!(node.add_link(link.clone(), LinkPolicy::Append));
        assert!(node.add_link(link, LinkPolicy::Append));
        assert_eq!(node.links().len(), 2);
    }

    #[test]
    fn deduplicate_policy_drops_repeated_pairs_only() {
        let mut node = Node::new(NodeId(7), "CHEBI:1", "aspirin");
        assert!(node.add_link(Link::new(NodeId(1), "Gene"), LinkPolicy::Deduplicate));
        assert!(!node.add_link(Link::new(NodeId(1), "Gene"), LinkPolicy::Deduplicate));
        assert!(node.add_link(Link::new(NodeId(1), "PPI"), LinkPolicy::Deduplicate));
        assert!(node.add_link(Link::new(NodeId(2), "Gene"), LinkPolicy::Deduplicate));
        assert_eq!(node.links().len(), 3);
    }

    #[test]
    fn record_builder_sets_both_link_fields() {
        let record = NodeRecord::new(10, "MIMAT0000062", "hsa-let-7a").linked(1, "Gene");
        assert_eq!(record.linked_to, Some(1));
        assert_eq!(record.linked_layer.as_deref(), Some("Gene"));
    }
}
