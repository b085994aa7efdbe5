use super::group::GroupNode;
use super::ids::{EntryKey, GroupKey, NodeId};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    #[serde(alias = "circle")]
    Ellipse,
    Hexagon,
    Triangle,
    #[serde(alias = "square")]
    Rectangle,
    Diamond,
}

#[derive(Debug, Error)]
#[error("Invalid shape string: '{0}'")]
pub struct ParseShapeError(String);

impl FromStr for Shape {
    type Err = ParseShapeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ellipse" | "circle" => Ok(Shape::Ellipse),
            "hexagon" => Ok(Shape::Hexagon),
            "triangle" => Ok(Shape::Triangle),
            "rectangle" | "square" => Ok(Shape::Rectangle),
            "diamond" => Ok(Shape::Diamond),
            _ => Err(ParseShapeError(s.to_string())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Shape::Ellipse => "ellipse",
                Shape::Hexagon => "hexagon",
                Shape::Triangle => "triangle",
                Shape::Rectangle => "rectangle",
                Shape::Diamond => "diamond",
            }
        )
    }
}

/// Display and grouping policy of a layer, carried as one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub color: String,
    pub shape: Shape,
    /// Whether the layer is condensed into group nodes before layout.
    pub grouped: bool,
    pub visible: bool,
    /// Draw order. `None` falls back to the registration ordinal.
    pub z_index: Option<i32>,
}

impl LayerConfig {
    pub fn new(color: &str, shape: Shape) -> Self {
        Self {
            color: color.to_string(),
            shape,
            grouped: false,
            visible: true,
            z_index: None,
        }
    }

    pub fn grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }
}

/// Vertical band occupied by a layer after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDims {
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
}

/// Per-layer positional state of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntryState {
    pub position: Option<Point2<f64>>,
    /// Set by a manual position override; layout leaves pinned entries in place.
    pub pinned: bool,
}

impl EntryState {
    pub fn at(position: Point2<f64>) -> Self {
        Self {
            position: Some(position),
            pinned: false,
        }
    }
}

/// Insertion-ordered set of the entries displayed by one layer.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    order: Vec<EntryKey>,
    states: HashMap<EntryKey, EntryState>,
}

impl Membership {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: EntryKey) -> bool {
        self.states.contains_key(&key)
    }

    pub fn get(&self, key: EntryKey) -> Option<&EntryState> {
        self.states.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: EntryKey) -> Option<&mut EntryState> {
        self.states.get_mut(&key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryKey, &EntryState)> {
        self.order.iter().map(|key| (*key, &self.states[key]))
    }

    pub fn index_of(&self, key: EntryKey) -> Option<usize> {
        self.order.iter().position(|k| *k == key)
    }

    /// Adds `key` with default state. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, key: EntryKey) -> bool {
        if self.states.contains_key(&key) {
            return false;
        }
        self.order.push(key);
        self.states.insert(key, EntryState::default());
        true
    }

    pub(crate) fn insert_at(&mut self, index: usize, key: EntryKey, state: EntryState) {
        if self.states.insert(key, state).is_none() {
            let index = index.min(self.order.len());
            self.order.insert(index, key);
        }
    }

    pub(crate) fn remove(&mut self, key: EntryKey) -> Option<(usize, EntryState)> {
        let state = self.states.remove(&key)?;
        let index = self.index_of(key)?;
        self.order.remove(index);
        Some((index, state))
    }

    pub(crate) fn replace(&mut self, entries: Vec<(EntryKey, EntryState)>) {
        self.order.clear();
        self.states.clear();
        for (key, state) in entries {
            if self.states.insert(key, state).is_none() {
                self.order.push(key);
            }
        }
    }

    pub(crate) fn take(&mut self) -> Vec<(EntryKey, EntryState)> {
        let mut states = std::mem::take(&mut self.states);
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|key| states.remove(&key).map(|state| (key, state)))
            .collect()
    }
}

/// A named category of network entities with its own style and layout band.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub(crate) config: LayerConfig,
    pub(crate) seq: usize,
    pub(crate) dims: Option<LayerDims>,
    pub(crate) membership: Membership,
    pub(crate) groups: HashMap<GroupKey, GroupNode>,
    /// Member id to the group it is folded into, within this layer.
    pub(crate) grouped_into: HashMap<NodeId, GroupKey>,
}

impl Layer {
    pub(crate) fn new(name: &str, config: LayerConfig, seq: usize) -> Self {
        Self {
            name: name.to_string(),
            config,
            seq,
            dims: None,
            membership: Membership::default(),
            groups: HashMap::new(),
            grouped_into: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.config.visible
    }

    pub fn z_index(&self) -> i32 {
        self.config
            .z_index
            .unwrap_or_else(|| i32::try_from(self.seq).unwrap_or(i32::MAX))
    }

    /// Registration ordinal, used to break z-index ties.
    pub fn seq(&self) -> usize {
        self.seq
    }

    pub fn dims(&self) -> Option<LayerDims> {
        self.dims
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn group(&self, key: GroupKey) -> Option<&GroupNode> {
        self.groups.get(&key)
    }

    /// Group nodes in membership order.
    pub fn groups_iter(&self) -> impl Iterator<Item = &GroupNode> {
        self.membership.keys().filter_map(|key| match key {
            EntryKey::Group(g) => self.groups.get(&g),
            EntryKey::Node(_) => None,
        })
    }

    /// The group of this layer that node `id` is folded into, if any.
    pub fn group_of(&self, id: NodeId) -> Option<GroupKey> {
        self.grouped_into.get(&id).copied()
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Number of displayable entries (individual nodes plus group nodes).
    pub fn displayed_count(&self) -> usize {
        self.membership.len()
    }
}
