use super::ids::{GroupKey, NodeId};
use super::node::{Link, Node};
use itertools::Itertools;

/// Synthetic entry standing in for nodes of one layer that share a link signature.
///
/// Members keep their full `Node` records while grouped, so ungrouping restores
/// them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub key: GroupKey,
    pub(crate) members: Vec<Node>,
    pub(crate) links: Vec<Link>,
}

impl GroupNode {
    pub(crate) fn new(key: GroupKey, members: Vec<Node>) -> Self {
        let links = members
            .iter()
            .flat_map(|member| member.links.iter().cloned())
            .unique()
            .collect();
        Self {
            key,
            members,
            links,
        }
    }

    pub fn members(&self) -> &[Node] {
        &self.members
    }

    pub fn member_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().map(|member| member.id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.member(id).is_some()
    }

    /// Order-preserving union of the members' links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Text shown for the group: its member count.
    pub fn label(&self) -> String {
        self.members.len().to_string()
    }

    pub fn member(&self, id: NodeId) -> Option<&Node> {
        self.members.iter().find(|member| member.id == id)
    }

    pub(crate) fn member_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    pub(crate) fn refresh_links(&mut self) {
        self.links = self
            .members
            .iter()
            .flat_map(|member| member.links.iter().cloned())
            .unique()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, targets: &[i64]) -> Node {
        let mut node = Node::new(NodeId(id), &format!("X{id}"), &format!("sym{id}"));
        node.links = targets
            .iter()
            .map(|t| Link::new(NodeId(*t), "Gene"))
            .collect();
        node
    }

    #[test]
    fn links_are_first_seen_union_of_members() {
        let group = GroupNode::new(
            GroupKey::from_hash(1),
            vec![member(10, &[2, 1]), member(11, &[1, 3, 2])],
        );
        let targets: Vec<i64> = group.links().iter().map(|l| l.target.value()).collect();
        assert_eq!(targets, vec![2, 1, 3]);
        assert_eq!(group.label(), "2");
        assert!(group.contains(NodeId(11)));
        assert!(!group.contains(NodeId(12)));
    }

    #[test]
    fn refresh_links_picks_up_member_changes() {
        let mut group = GroupNode::new(
            GroupKey::from_hash(1),
            vec![member(10, &[1]), member(11, &[1])],
        );
        group
            .member_mut(NodeId(11))
            .unwrap()
            .links
            .push(Link::new(NodeId(5), "PPI"));
        group.refresh_links();
        assert_eq!(group.links().len(), 2);
    }
}
