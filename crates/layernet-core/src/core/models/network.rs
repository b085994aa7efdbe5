use super::ids::{EntryKey, GroupKey, LayerId, NodeId};
use super::layer::{Layer, LayerConfig};
use super::node::{Link, LinkPolicy, Node, NodeRecord};
use nalgebra::Point2;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Layer not found: '{0}'")]
    LayerNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Group {key} not found in layer '{layer}'")]
    GroupNotFound { layer: String, key: GroupKey },

    #[error("Entry ({key}) not found in layer '{layer}'")]
    EntryNotFound { layer: String, key: EntryKey },

    #[error(
        "Layer '{name}' holds group nodes and cannot be re-registered with grouped = {grouped}"
    )]
    DuplicateLayer { name: String, grouped: bool },

    #[error("Invalid record {dbid}: {reason}")]
    InvalidRecord { dbid: i64, reason: String },

    #[error("Invalid position ({x}, {y}): coordinates must be finite")]
    InvalidPosition { x: f64, y: f64 },
}

/// In-memory multi-layer network.
///
/// Holds the layer registry, the global node store (one map shared by every
/// layer) and, per layer, the ordered membership set that layout and rendering
/// walk. Every mutation advances [`generation`](Self::generation) so that
/// consumers of a layout or scene snapshot can tell when it went stale.
///
/// The store holds a record for every id that some layer lists as an
/// individual entry. A record leaves the store only while every layer holding
/// the id has it folded into a group; groups keep their own member copies,
/// and [`add_nodes`](Self::add_nodes) keeps all copies of an id in step.
#[derive(Debug, Clone, Default)]
pub struct MultiLayerNetwork {
    /// Primary storage for layers.
    pub(crate) layers: SlotMap<LayerId, Layer>,
    /// Lookup map from layer name to its id.
    pub(crate) layer_names: HashMap<String, LayerId>,
    /// The global node store, keyed by database id.
    pub(crate) nodes: HashMap<NodeId, Node>,
    /// How re-inserted records extend a node's links.
    link_policy: LinkPolicy,
    /// Mutation counter; see [`generation`](Self::generation).
    generation: u64,
    /// Set by layout-affecting mutations, cleared by a layout pass.
    layout_stale: bool,
}

impl MultiLayerNetwork {
    /// Creates an empty network with the `Append` link policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty network that extends links according to `link_policy`.
    pub fn with_link_policy(link_policy: LinkPolicy) -> Self {
        Self {
            link_policy,
            ..Self::default()
        }
    }

    /// The policy applied when a known id is inserted again.
    pub fn link_policy(&self) -> LinkPolicy {
        self.link_policy
    }

    /// Monotonic mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` once anything affecting layout changed since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.layout_stale
    }

    pub(crate) fn touch(&mut self) {
        self.generation += 1;
        self.layout_stale = true;
    }

    pub(crate) fn mark_laid_out(&mut self) -> u64 {
        self.generation += 1;
        self.layout_stale = false;
        self.generation
    }

    /// Registers a layer, or updates the display attributes of an existing one.
    ///
    /// Re-registration never touches membership. It is refused only when it
    /// would flip the grouping flag of a layer that currently holds group nodes.
    pub fn add_layer(&mut self, name: &str, config: LayerConfig) -> Result<LayerId, NetworkError> {
        if let Some(&id) = self.layer_names.get(name) {
            let layer = &mut self.layers[id];
            if layer.config.grouped != config.grouped && layer.has_groups() {
                return Err(NetworkError::DuplicateLayer {
                    name: name.to_string(),
                    grouped: config.grouped,
                });
            }
            layer.config = config;
            debug!(layer = name, "Updated display attributes of existing layer.");
            self.touch();
            return Ok(id);
        }

        let seq = self.layers.len();
        let id = self.layers.insert(Layer::new(name, config, seq));
        self.layer_names.insert(name.to_string(), id);
        debug!(layer = name, seq, "Registered layer.");
        self.touch();
        Ok(id)
    }

    /// Finds a layer's id by name.
    ///
    /// # Arguments
    ///
    /// * `name` - The layer name.
    ///
    /// # Return
    ///
    /// Returns `Some(LayerId)` if the layer is registered, otherwise `None`.
    pub fn find_layer(&self, name: &str) -> Option<LayerId> {
        self.layer_names.get(name).copied()
    }

    /// Retrieves a layer by name.
    ///
    /// # Arguments
    ///
    /// * `name` - The layer name.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::LayerNotFound`] if no layer has that name.
    pub fn layer(&self, name: &str) -> Result<&Layer, NetworkError> {
        self.find_layer(name)
            .and_then(|id| self.layers.get(id))
            .ok_or_else(|| NetworkError::LayerNotFound(name.to_string()))
    }

    pub(crate) fn layer_mut(&mut self, name: &str) -> Result<&mut Layer, NetworkError> {
        let id = self
            .find_layer(name)
            .ok_or_else(|| NetworkError::LayerNotFound(name.to_string()))?;
        Ok(&mut self.layers[id])
    }

    /// Retrieves a layer by its id.
    ///
    /// # Arguments
    ///
    /// * `id` - The layer id to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Layer)` if the layer exists, otherwise `None`.
    pub fn layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Returns the number of registered layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// All layers sorted by ascending z-index, ties broken by registration order.
    pub fn layers_in_order(&self) -> Vec<&Layer> {
        self.layer_ids_in_order()
            .into_iter()
            .map(|id| &self.layers[id])
            .collect()
    }

    pub(crate) fn layer_ids_in_order(&self) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = self.layers.keys().collect();
        ids.sort_by_key(|id| {
            let layer = &self.layers[*id];
            (layer.z_index(), layer.seq)
        });
        ids
    }

    /// Visible layers in draw order.
    pub fn visible_layers(&self) -> Vec<&Layer> {
        self.layers_in_order()
            .into_iter()
            .filter(|layer| layer.is_visible())
            .collect()
    }

    pub(crate) fn visible_layer_ids(&self) -> Vec<LayerId> {
        self.layer_ids_in_order()
            .into_iter()
            .filter(|id| self.layers[*id].is_visible())
            .collect()
    }

    /// Toggles a layer's inclusion in the visible sequence. Node data and
    /// positions are kept. Returns whether the visibility actually changed.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<bool, NetworkError> {
        let layer = self.layer_mut(name)?;
        if layer.config.visible == visible {
            return Ok(false);
        }
        layer.config.visible = visible;
        self.touch();
        Ok(true)
    }

    /// Inserts or extends nodes of `layer` from data-acquisition records.
    ///
    /// A new `dbid` creates a node; a known one gets the record's link appended
    /// according to the network's [`LinkPolicy`]. With the default `Append`
    /// policy this is not idempotent: repeating a call duplicates links.
    /// All records are validated before anything is mutated.
    ///
    /// Links go to every copy of the node, so an id held by several layers
    /// shows the same links in each. An id already folded into a group of
    /// `layer` stays in that group.
    ///
    /// # Return
    ///
    /// The number of nodes newly created in the node store.
    pub fn add_nodes<I>(&mut self, layer: &str, records: I) -> Result<usize, NetworkError>
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        let layer_id = self
            .find_layer(layer)
            .ok_or_else(|| NetworkError::LayerNotFound(layer.to_string()))?;

        let records: Vec<NodeRecord> = records.into_iter().collect();
        let parsed = records
            .iter()
            .map(validate_record)
            .collect::<Result<Vec<_>, _>>()?;

        let policy = self.link_policy;
        let mut created = 0;
        for (record, (id, link)) in records.iter().zip(parsed) {
            let known = self.extend_copies(id, link.as_ref(), policy);
            if !known {
                let mut node = Node::new(id, &record.id, &record.symbol);
                node.links.extend(link);
                self.nodes.insert(id, node);
                created += 1;
            }

            let target = &mut self.layers[layer_id];
            if target.grouped_into.contains_key(&id) {
                continue;
            }
            target.membership.insert(EntryKey::Node(id));
            if !self.nodes.contains_key(&id) {
                if let Some(copy) = self.find_node(id).cloned() {
                    self.nodes.insert(id, copy);
                }
            }
        }

        debug!(
            layer,
            records = records.len(),
            created,
            "Added node records to layer."
        );
        self.touch();
        Ok(created)
    }

    /// Applies `link` to every copy of node `id`: the store record and the
    /// member records of every group holding it. Returns whether any copy exists.
    fn extend_copies(&mut self, id: NodeId, link: Option<&Link>, policy: LinkPolicy) -> bool {
        let mut known = false;
        if let Some(node) = self.nodes.get_mut(&id) {
            if let Some(link) = link {
                node.add_link(link.clone(), policy);
            }
            known = true;
        }
        for layer in self.layers.values_mut() {
            let Some(key) = layer.grouped_into.get(&id).copied() else {
                continue;
            };
            let Some(group) = layer.groups.get_mut(&key) else {
                continue;
            };
            if let (Some(member), Some(link)) = (group.member_mut(id), link) {
                member.add_link(link.clone(), policy);
            }
            group.refresh_links();
            known = true;
        }
        known
    }

    /// Whether a layer other than `except` lists `id` as an individual entry.
    pub(crate) fn listed_elsewhere(&self, id: NodeId, except: LayerId) -> bool {
        self.layers.iter().any(|(layer_id, layer)| {
            layer_id != except && layer.membership.contains(EntryKey::Node(id))
        })
    }

    /// Retrieves a node from the node store.
    ///
    /// Ids folded into a group in every layer that holds them are not in the
    /// store; see [`find_node`](Self::find_node).
    ///
    /// # Arguments
    ///
    /// * `id` - The database id to look up.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NodeNotFound`] if the store has no such record.
    pub fn node(&self, id: NodeId) -> Result<&Node, NetworkError> {
        self.nodes.get(&id).ok_or(NetworkError::NodeNotFound(id))
    }

    /// Looks up a node in the store or, failing that, among group members.
    ///
    /// # Arguments
    ///
    /// * `id` - The database id to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Node)` if any record of the id exists, otherwise `None`.
    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).or_else(|| {
            self.layers.values().find_map(|layer| {
                let key = layer.grouped_into.get(&id)?;
                layer.groups.get(key)?.member(id)
            })
        })
    }

    /// Returns an iterator over the node store.
    ///
    /// # Return
    ///
    /// An iterator yielding `(&NodeId, &Node)` pairs in no particular order.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Returns the number of records in the node store.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The group of `layer` that node `id` is folded into, if any.
    pub fn group_of(&self, layer: &str, id: NodeId) -> Option<GroupKey> {
        self.layer(layer).ok()?.group_of(id)
    }

    /// Resolves the entry that displays node `id` inside `layer`: the node
    /// itself, or the group node it was folded into.
    ///
    /// # Arguments
    ///
    /// * `layer` - Name of the layer to search.
    /// * `id` - The database id to resolve.
    ///
    /// # Return
    ///
    /// Returns `None` if the layer is unknown or does not hold the id.
    pub fn resolve_entry(&self, layer: &str, id: NodeId) -> Option<EntryKey> {
        let layer = self.layer(layer).ok()?;
        if layer.membership.contains(EntryKey::Node(id)) {
            return Some(EntryKey::Node(id));
        }
        layer.group_of(id).map(EntryKey::Group)
    }

    /// Links carried by an entry of `layer`: a node's own links or a group's union.
    pub fn entry_links<'a>(&'a self, layer: &'a Layer, key: EntryKey) -> &'a [Link] {
        match key {
            EntryKey::Node(id) => self.find_node(id).map(Node::links).unwrap_or_default(),
            EntryKey::Group(g) => layer.group(g).map(|group| group.links()).unwrap_or_default(),
        }
    }

    /// Text shown for an entry: the node symbol, or the member count of a group.
    pub fn entry_label(&self, layer: &Layer, key: EntryKey) -> Option<String> {
        match key {
            EntryKey::Node(id) => self.find_node(id).map(|node| node.label.clone()),
            EntryKey::Group(g) => layer.group(g).map(|group| group.label()),
        }
    }

    /// Manually places an entry (e.g. after a drag) and pins it so that the
    /// next layout pass leaves it where it is.
    pub fn set_node_position(
        &mut self,
        layer: &str,
        key: EntryKey,
        x: f64,
        y: f64,
    ) -> Result<(), NetworkError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(NetworkError::InvalidPosition { x, y });
        }
        let state = self
            .layer_mut(layer)?
            .membership
            .get_mut(key)
            .ok_or_else(|| NetworkError::EntryNotFound {
                layer: layer.to_string(),
                key,
            })?;
        state.position = Some(Point2::new(x, y));
        state.pinned = true;
        self.generation += 1;
        Ok(())
    }

    /// Releases a pin. Returns whether the entry was pinned.
    pub fn unpin_node(&mut self, layer: &str, key: EntryKey) -> Result<bool, NetworkError> {
        let state = self
            .layer_mut(layer)?
            .membership
            .get_mut(key)
            .ok_or_else(|| NetworkError::EntryNotFound {
                layer: layer.to_string(),
                key,
            })?;
        let was_pinned = std::mem::replace(&mut state.pinned, false);
        if was_pinned {
            self.touch();
        }
        Ok(was_pinned)
    }
}

fn validate_record(record: &NodeRecord) -> Result<(NodeId, Option<Link>), NetworkError> {
    let invalid = |reason: &str| NetworkError::InvalidRecord {
        dbid: record.dbid,
        reason: reason.to_string(),
    };

    if record.dbid <= 0 {
        return Err(invalid("dbid must be a positive integer"));
    }
    let link = match (record.linked_to, record.linked_layer.as_deref()) {
        (None, None) => None,
        (Some(target), Some(layer)) => {
            if target <= 0 {
                return Err(invalid("linkedTo must be a positive integer"));
            }
            if layer.is_empty() {
                return Err(invalid("linkedLayer must not be empty"));
            }
            Some(Link::new(NodeId(target), layer))
        }
        (Some(_), None) => return Err(invalid("linkedTo given without linkedLayer")),
        (None, Some(_)) => return Err(invalid("linkedLayer given without linkedTo")),
    };
    Ok((NodeId(record.dbid), link))
}
