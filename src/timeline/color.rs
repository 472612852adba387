//! Eased color gradient between the highlight and neutral node fills.

use crate::theme;
use egui::Color32;

/// Cubic ease-in-out on [0, 1]: steep around the middle, flat at the
/// ends, so color shifts fastest near an event's midpoint.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
    }
}

/// Maps distance from an event midpoint onto the highlight-to-neutral
/// gradient, clamped to neutral beyond `event_duration` away.
#[derive(Debug, Clone)]
pub struct EventColorScale {
    event_duration: f64,
    highlight: Color32,
    neutral: Color32,
}

impl EventColorScale {
    pub fn new(event_duration: f64) -> Self {
        Self {
            event_duration,
            highlight: theme::node::HIGHLIGHT,
            neutral: theme::node::NEUTRAL,
        }
    }

    /// Fill color for a node whose governing event has `midpoint`, with
    /// the cursor at `time`.
    pub fn color_at(&self, midpoint: f64, time: f64) -> Color32 {
        if self.event_duration <= 0.0 {
            return self.neutral;
        }
        let distance = (midpoint - time).abs();
        let t = ease_in_out((distance / self.event_duration) as f32);
        lerp_color(self.highlight, self.neutral, t)
    }

    /// The fill for nodes with no active event.
    pub fn neutral(&self) -> Color32 {
        self.neutral
    }
}

/// Channelwise linear blend between two opaque colors.
fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let blend = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(
        blend(from.r(), to.r()),
        blend(from.g(), to.g()),
        blend(from.b(), to.b()),
    )
}
