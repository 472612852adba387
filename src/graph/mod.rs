//! Graph data structures and the force-directed layout engine.

pub mod drag;
pub mod forces;
pub mod layout;
pub mod quadtree;
pub mod types;

pub use drag::DragController;
pub use layout::ForceLayout;
pub use types::{GraphData, GraphError, GraphLink, GraphNode, SimulationState};
