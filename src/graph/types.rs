//! Graph input model and runtime simulation state.

use egui::{Pos2, Rect, Vec2};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Alpha target applied while a node is being dragged, so the layout
/// keeps responding to the pointer instead of freezing mid-drag.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;

/// A node in the displayed graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// An undirected link between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Complete graph description supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Errors detected while building a simulation from graph input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("link references unknown node id {0:?}")]
    UnknownNode(String),
    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),
}

/// Runtime simulation state: node kinematics plus cooling energy.
///
/// Owns positions and velocities for the lifetime of one graph; replaced
/// wholesale when the graph input changes. Mutation goes through the
/// narrow API here plus [`ForceLayout::step`](super::layout::ForceLayout),
/// everything else reads.
#[derive(Debug)]
pub struct SimulationState {
    /// Node positions (id -> position)
    pub positions: HashMap<String, Pos2>,
    /// Node velocities (id -> velocity)
    pub velocities: HashMap<String, Vec2>,
    /// Pinned positions; a pinned node is excluded from integration
    pinned: HashMap<String, Pos2>,
    /// Nodes released this tick; they hold their drop point for one
    /// more tick before forces apply again
    released: HashSet<String>,
    /// The underlying data
    pub data: GraphData,
    /// Node index lookup (id -> index in data.nodes)
    pub node_index: HashMap<String, usize>,
    /// Cooling energy in [0, 1]; blends toward `alpha_target` each tick
    pub(super) alpha: f32,
    /// Raised on drag start, reset to zero on drag end
    pub(super) alpha_target: f32,
}

impl SimulationState {
    /// Build a simulation from graph input, rejecting invalid topology.
    ///
    /// Every link endpoint must name an existing node and node ids must
    /// be unique. Initial positions are randomized within `bounds`.
    pub fn new(data: GraphData, bounds: Rect) -> Result<Self, GraphError> {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        let mut node_index = HashMap::with_capacity(data.nodes.len());
        for (i, node) in data.nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        for link in &data.links {
            for end in [&link.source, &link.target] {
                if !node_index.contains_key(end) {
                    return Err(GraphError::UnknownNode(end.clone()));
                }
            }
        }

        let mut positions = HashMap::with_capacity(data.nodes.len());
        let mut velocities = HashMap::with_capacity(data.nodes.len());
        for node in &data.nodes {
            let x = rng.gen_range(bounds.min.x..=bounds.max.x);
            let y = rng.gen_range(bounds.min.y..=bounds.max.y);
            positions.insert(node.id.clone(), Pos2::new(x, y));
            velocities.insert(node.id.clone(), Vec2::ZERO);
        }

        Ok(Self {
            positions,
            velocities,
            pinned: HashMap::new(),
            released: HashSet::new(),
            data,
            node_index,
            alpha: 1.0,
            alpha_target: 0.0,
        })
    }

    /// An inert simulation with no nodes, already at rest. Stands in
    /// when graph input was rejected.
    pub fn empty() -> Self {
        Self {
            positions: HashMap::new(),
            velocities: HashMap::new(),
            pinned: HashMap::new(),
            released: HashSet::new(),
            data: GraphData::default(),
            node_index: HashMap::new(),
            alpha: 0.0,
            alpha_target: 0.0,
        }
    }

    /// Fix a node at `pos`, removing it from force integration until
    /// unpinned. Returns false when no such node exists.
    pub fn pin(&mut self, id: &str, pos: Pos2) -> bool {
        if !self.node_index.contains_key(id) {
            return false;
        }
        self.released.remove(id);
        self.pinned.insert(id.to_owned(), pos);
        self.positions.insert(id.to_owned(), pos);
        self.velocities.insert(id.to_owned(), Vec2::ZERO);
        true
    }

    /// Release a pinned node back to the integrator. The node keeps its
    /// drop point through the next tick, then forces take over.
    pub fn unpin(&mut self, id: &str) {
        if self.pinned.remove(id).is_some() {
            self.released.insert(id.to_owned());
        }
    }

    pub(super) fn is_released(&self, id: &str) -> bool {
        self.released.contains(id)
    }

    pub(super) fn clear_released(&mut self) {
        self.released.clear();
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains_key(id)
    }

    pub fn pinned_pos(&self, id: &str) -> Option<Pos2> {
        self.pinned.get(id).copied()
    }

    /// Raise the cooling target so alpha climbs back up and the layout
    /// stays responsive during interaction.
    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    /// Get the position of a node
    pub fn get_pos(&self, id: &str) -> Option<Pos2> {
        self.positions.get(id).copied()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.data.nodes[i])
    }
}
