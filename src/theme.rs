//! Unified color constants for the visualizer.
//!
//! All colors used by the graph canvas and the panels are sourced from
//! here so the two stay visually consistent.

use egui::Color32;

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Main graph area background - darkest layer
    pub const GRAPH: Color32 = Color32::from_rgb(13, 18, 48);

    /// Panel backgrounds - slightly lighter than graph
    pub const PANEL: Color32 = Color32::from_rgb(20, 22, 38);

    /// Scrubber track background
    pub const TRACK: Color32 = Color32::from_rgb(30, 33, 50);
}

/// Node card colors
pub mod node {
    use super::*;

    /// Fill at the center of an active event window
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x85, 0x05, 0x4d);

    /// Fill for idle nodes and the far end of the gradient
    pub const NEUTRAL: Color32 = Color32::from_rgb(0x18, 0x29, 0x5e);

    /// Card label text
    pub const LABEL: Color32 = Color32::WHITE;

    /// Card outline while the node is being dragged
    pub const DRAG_OUTLINE: Color32 = Color32::from_rgb(255, 220, 80);
}

/// Scrubber and timeline colors
pub mod timeline {
    use super::*;

    /// Track line
    pub const TRACK_LINE: Color32 = Color32::from_rgb(60, 65, 85);

    /// Per-event notch marks on the track
    pub const NOTCH: Color32 = Color32::from_rgb(120, 90, 140);

    /// Draggable handle
    pub const HANDLE: Color32 = Color32::from_rgb(235, 235, 240);

    /// Handle outline
    pub const HANDLE_RIM: Color32 = Color32::from_rgb(120, 125, 150);
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    /// Primary text - high contrast
    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);

    /// Muted text - tick labels, secondary info
    pub const MUTED: Color32 = Color32::from_rgb(140, 145, 165);

    /// Error messages
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
}

/// Link line color (applied with per-link opacity at draw time)
pub const LINK: Color32 = Color32::WHITE;
