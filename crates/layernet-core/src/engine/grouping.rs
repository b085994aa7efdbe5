use crate::core::hash::group_key;
use crate::core::models::group::GroupNode;
use crate::core::models::ids::{EntryKey, GroupKey, NodeId};
use crate::core::models::layer::EntryState;
use crate::core::models::network::{MultiLayerNetwork, NetworkError};
use crate::core::models::node::Node;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupingSummary {
    pub groups: usize,
    pub grouped_nodes: usize,
    pub singletons: usize,
}

impl GroupingSummary {
    fn absorb(&mut self, other: GroupingSummary) {
        self.groups += other.groups;
        self.grouped_nodes += other.grouped_nodes;
        self.singletons += other.singletons;
    }
}

enum Slot {
    Single(Node, EntryState),
    Group(GroupKey),
}

/// Condenses the nodes of a layer that share a link signature into group nodes.
///
/// Every node of the layer (including members of groups formed earlier) is
/// keyed by [`group_key`]. Keys shared by two or more nodes become one
/// [`GroupNode`]; the rest stay individual entries. The resulting membership
/// is a partition of the previous one, ordered by each bucket's first node.
/// A grouped-away node leaves the node store unless another layer still
/// lists it as an individual entry; the group keeps its own member copy.
///
/// Regrouping an already grouped layer yields the same groups.
#[instrument(skip(network), fields(layer = layer_name))]
pub fn group_layer(
    network: &mut MultiLayerNetwork,
    layer_name: &str,
) -> Result<GroupingSummary, NetworkError> {
    let layer_id = network
        .find_layer(layer_name)
        .ok_or_else(|| NetworkError::LayerNotFound(layer_name.to_string()))?;

    if let Some(missing) = network.layers[layer_id]
        .membership
        .keys()
        .find_map(|key| match key {
            EntryKey::Node(id) if !network.nodes.contains_key(&id) => Some(id),
            _ => None,
        })
    {
        return Err(NetworkError::NodeNotFound(missing));
    }

    let (entries, mut old_groups) = {
        let layer = &mut network.layers[layer_id];
        layer.grouped_into.clear();
        (layer.membership.take(), std::mem::take(&mut layer.groups))
    };

    // 1. Flatten the current membership back into individual nodes.
    let mut previous_group_states: HashMap<GroupKey, EntryState> = HashMap::new();
    let mut items: Vec<(Node, EntryState)> = Vec::with_capacity(entries.len());
    for (key, state) in entries {
        match key {
            EntryKey::Node(id) => {
                let node = if network.listed_elsewhere(id, layer_id) {
                    network.nodes.get(&id).cloned()
                } else {
                    network.nodes.remove(&id)
                };
                if let Some(node) = node {
                    items.push((node, state));
                }
            }
            EntryKey::Group(g) => {
                let Some(group) = old_groups.remove(&g) else {
                    continue;
                };
                previous_group_states.insert(g, state);
                let member_state = EntryState {
                    position: state.position,
                    pinned: false,
                };
                items.extend(group.members.into_iter().map(|member| (member, member_state)));
            }
        }
    }

    // 2. Bucket by link signature.
    let keys: Vec<GroupKey> = items
        .iter()
        .map(|(node, _)| group_key(node.links(), layer_name))
        .collect();
    let mut bucket_sizes: HashMap<GroupKey, usize> = HashMap::new();
    for key in &keys {
        *bucket_sizes.entry(*key).or_default() += 1;
    }

    let mut buckets: HashMap<GroupKey, Vec<Node>> = HashMap::new();
    let mut slots = Vec::with_capacity(items.len());
    for ((node, state), key) in items.into_iter().zip(keys) {
        if bucket_sizes[&key] > 1 {
            let members = buckets.entry(key).or_default();
            if members.is_empty() {
                slots.push(Slot::Group(key));
            }
            members.push(node);
        } else {
            slots.push(Slot::Single(node, state));
        }
    }

    // 3. Rebuild the membership set.
    let mut summary = GroupingSummary::default();
    let mut groups = HashMap::new();
    let mut grouped_into = HashMap::new();
    let mut new_entries = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Single(node, state) => {
                let id = node.id;
                network.nodes.entry(id).or_insert(node);
                new_entries.push((EntryKey::Node(id), state));
                summary.singletons += 1;
            }
            Slot::Group(key) => {
                let members = buckets.remove(&key).unwrap_or_default();
                for member in &members {
                    grouped_into.insert(member.id, key);
                    if !network.listed_elsewhere(member.id, layer_id) {
                        network.nodes.remove(&member.id);
                    }
                }
                summary.groups += 1;
                summary.grouped_nodes += members.len();
                let state = previous_group_states
                    .get(&key)
                    .copied()
                    .unwrap_or_default();
                groups.insert(key, GroupNode::new(key, members));
                new_entries.push((EntryKey::Group(key), state));
            }
        }
    }

    let layer = &mut network.layers[layer_id];
    layer.membership.replace(new_entries);
    layer.groups = groups;
    layer.grouped_into = grouped_into;
    network.touch();

    debug!(
        groups = summary.groups,
        grouped_nodes = summary.grouped_nodes,
        singletons = summary.singletons,
        "Grouping complete."
    );
    Ok(summary)
}

/// Dissolves one group node back into its members.
///
/// Members return to the node store and to the layer's membership at the
/// group's slot, each positioned where the group was. Their link lists are
/// exactly the ones they had before grouping.
#[instrument(skip(network), fields(layer = layer_name, group = %key))]
pub fn ungroup_node(
    network: &mut MultiLayerNetwork,
    layer_name: &str,
    key: GroupKey,
) -> Result<Vec<NodeId>, NetworkError> {
    let layer_id = network
        .find_layer(layer_name)
        .ok_or_else(|| NetworkError::LayerNotFound(layer_name.to_string()))?;

    let layer = &mut network.layers[layer_id];
    let group = layer
        .groups
        .remove(&key)
        .ok_or_else(|| NetworkError::GroupNotFound {
            layer: layer_name.to_string(),
            key,
        })?;
    let (index, state) = layer
        .membership
        .remove(EntryKey::Group(key))
        .unwrap_or((layer.membership.len(), EntryState::default()));
    let member_state = EntryState {
        position: state.position,
        pinned: false,
    };

    let mut restored = Vec::with_capacity(group.len());
    for (offset, member) in group.members.into_iter().enumerate() {
        let id = member.id;
        layer
            .membership
            .insert_at(index + offset, EntryKey::Node(id), member_state);
        layer.grouped_into.remove(&id);
        network.nodes.entry(id).or_insert(member);
        restored.push(id);
    }
    network.touch();

    debug!(members = restored.len(), "Group dissolved.");
    Ok(restored)
}

/// Dissolves every group node of a layer. Returns the number of groups dissolved.
pub fn ungroup_layer(network: &mut MultiLayerNetwork, layer_name: &str) -> Result<usize, NetworkError> {
    let keys: Vec<GroupKey> = network
        .layer(layer_name)?
        .groups_iter()
        .map(|group| group.key)
        .collect();
    for key in &keys {
        ungroup_node(network, layer_name, *key)?;
    }
    Ok(keys.len())
}

/// Brings every layer in line with its `grouped` flag: flagged layers are
/// (re)grouped, unflagged layers holding group nodes are ungrouped.
pub fn apply_grouping_flags(network: &mut MultiLayerNetwork) -> Result<GroupingSummary, NetworkError> {
    let mut total = GroupingSummary::default();
    let plan: Vec<(String, bool, bool)> = network
        .layers_in_order()
        .iter()
        .map(|layer| (layer.name.clone(), layer.config().grouped, layer.has_groups()))
        .collect();

    for (name, grouped, has_groups) in plan {
        if grouped {
            total.absorb(group_layer(network, &name)?);
        } else if has_groups {
            let dissolved = ungroup_layer(network, &name)?;
            info!(layer = %name, dissolved, "Ungrouped layer that is no longer flagged as grouped.");
        }
    }
    Ok(total)
}
