//! Pointer-drag state machine for repositioning nodes.
//!
//! Translates raw pointer phases into pin/unpin operations on the
//! simulation: pointer-down reheats and pins, pointer-move re-pins
//! continuously, pointer-up releases and lets the layout cool. While a
//! drag is in progress this controller is the only writer of that
//! node's pin.

use super::types::{SimulationState, DRAG_ALPHA_TARGET};
use egui::Pos2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(String),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node id currently being dragged, if any.
    pub fn dragging(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    /// Pointer pressed on a node: pin it under the pointer and reheat
    /// so the rest of the layout keeps adjusting around it. Pressing on
    /// an unknown node does nothing.
    pub fn pointer_down(&mut self, sim: &mut SimulationState, id: &str, pos: Pos2) {
        if self.dragging().is_some() {
            return;
        }
        if !sim.pin(id, pos) {
            return;
        }
        sim.reheat(DRAG_ALPHA_TARGET);
        self.state = DragState::Dragging(id.to_owned());
    }

    /// Pointer moved while dragging: re-pin at the new position. If the
    /// node vanished under us (graph swapped mid-drag), the drag aborts
    /// silently with no pin effect.
    pub fn pointer_move(&mut self, sim: &mut SimulationState, pos: Pos2) {
        let DragState::Dragging(id) = &self.state else {
            return;
        };
        if !sim.pin(id, pos) {
            self.state = DragState::Idle;
            sim.set_alpha_target(0.0);
        }
    }

    /// Pointer released: unpin and let the layout cool back down.
    pub fn pointer_up(&mut self, sim: &mut SimulationState) {
        if let DragState::Dragging(id) = std::mem::take(&mut self.state) {
            sim.unpin(&id);
            sim.set_alpha_target(0.0);
        }
    }

    /// Forget an in-progress drag without touching the simulation.
    /// Used when the graph is replaced wholesale; the old pins die with
    /// the old state.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
