//! Main application state and UI.

use crate::graph::types::GraphData;
use crate::graph::{DragController, ForceLayout, SimulationState};
use crate::sample;
use crate::settings::Settings;
use crate::theme;
use crate::timeline::color::EventColorScale;
use crate::timeline::playback::EndPolicy;
use crate::timeline::{Playback, TimelineState};
use eframe::egui::{self, Align2, FontId, Pos2, Rect, Stroke, Vec2};
use std::time::{Duration, Instant};

/// Track margin kept clear on each side of the scrubber
const SCRUBBER_MARGIN: f32 = 50.0;

/// Bounds used to scatter initial node positions
const SEED_BOUNDS: Rect = Rect {
    min: Pos2::new(200.0, 150.0),
    max: Pos2::new(1000.0, 650.0),
};

/// How long settings may stay dirty before being flushed to disk
const SETTINGS_SAVE_INTERVAL: Duration = Duration::from_secs(2);

/// Main application
pub struct PulseApp {
    // Simulation
    sim: SimulationState,
    layout: ForceLayout,
    drag: DragController,
    physics_enabled: bool,
    sim_error: Option<String>,

    // Timeline
    timeline: TimelineState,
    playback: Playback,
    last_frame: Instant,

    // Viewport state
    pan_offset: Vec2,
    zoom: f32,

    // UI state
    node_size: f32,
    show_links: bool,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl PulseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load();

        let layout = ForceLayout {
            repulsion: settings.repulsion,
            link_distance: settings.link_distance,
            link_strength: settings.link_strength,
            centering: settings.centering,
            collide_radius: settings.collide_radius,
            ..ForceLayout::default()
        };

        let (sim, sim_error) = build_simulation(sample::demo_graph());

        let mut timeline = TimelineState::new(settings.max_time, settings.event_duration);
        timeline.set_events(sample::random_events(
            &sim.data,
            settings.event_count,
            settings.max_time,
        ));
        tracing::info!(
            nodes = sim.data.nodes.len(),
            links = sim.data.links.len(),
            events = timeline.events().len(),
            "loaded demo graph"
        );

        let mut playback = Playback::new(settings.end_policy);
        playback.set_speed(settings.playback_speed);

        Self {
            sim,
            layout,
            drag: DragController::new(),
            physics_enabled: settings.physics_enabled,
            sim_error,

            timeline,
            playback,
            last_frame: Instant::now(),

            pan_offset: Vec2::ZERO,
            zoom: 1.0,

            node_size: settings.node_size,
            show_links: settings.show_links,

            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        }
    }

    /// Replace the schedule with a fresh random batch.
    fn refresh_events(&mut self) {
        let events = sample::random_events(
            &self.sim.data,
            self.settings.event_count,
            self.timeline.max_time(),
        );
        tracing::info!(count = events.len(), "generated new event batch");
        self.timeline.set_events(events);
    }

    /// Rebuild the simulation from scratch with new random positions.
    /// Any in-progress drag is cancelled along with the old state.
    fn reshuffle_layout(&mut self) {
        self.drag.reset();
        let (sim, sim_error) = build_simulation(sample::demo_graph());
        self.sim = sim;
        self.sim_error = sim_error;
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Copy current UI state to the settings struct
    fn sync_settings_from_ui(&mut self) {
        self.settings.node_size = self.node_size;
        self.settings.show_links = self.show_links;
        self.settings.playback_speed = self.playback.speed();
        self.settings.end_policy = self.playback.policy();
        self.settings.event_duration = self.timeline.event_duration();
        self.settings.max_time = self.timeline.max_time();
        self.settings.physics_enabled = self.physics_enabled;
        self.settings.repulsion = self.layout.repulsion;
        self.settings.link_distance = self.layout.link_distance;
        self.settings.link_strength = self.layout.link_strength;
        self.settings.centering = self.layout.centering;
        self.settings.collide_radius = self.layout.collide_radius;
    }

    /// Save dirty settings at most every couple of seconds
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed() >= SETTINGS_SAVE_INTERVAL {
            self.sync_settings_from_ui();
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    /// Topmost node whose card contains `graph_pos`, preferring the
    /// closest center when cards overlap.
    fn hit_test_node(&self, graph_pos: Pos2) -> Option<String> {
        let half = self.node_size * 0.5;
        self.sim
            .data
            .nodes
            .iter()
            .filter_map(|n| {
                let pos = self.sim.get_pos(&n.id)?;
                node_hit(pos, half, graph_pos).then(|| (n.id.clone(), pos.distance(graph_pos)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pulse Graph");
        ui.add_space(8.0);

        egui::CollapsingHeader::new("Display")
            .default_open(true)
            .show(ui, |ui| {
                if ui
                    .add(egui::Slider::new(&mut self.node_size, 20.0..=120.0).text("Node size"))
                    .changed()
                {
                    self.mark_settings_dirty();
                }
                if ui.checkbox(&mut self.show_links, "Show links").changed() {
                    self.mark_settings_dirty();
                }
            });

        egui::CollapsingHeader::new("Timeline")
            .default_open(true)
            .show(ui, |ui| {
                let mut duration = self.timeline.event_duration();
                if ui
                    .add(egui::Slider::new(&mut duration, 1.0..=60.0).text("Event duration"))
                    .changed()
                {
                    self.timeline.set_event_duration(duration);
                    self.mark_settings_dirty();
                }

                let mut max_time = self.timeline.max_time();
                if ui
                    .add(egui::Slider::new(&mut max_time, 30.0..=600.0).text("Max time"))
                    .changed()
                {
                    self.timeline.set_max_time(max_time);
                    self.mark_settings_dirty();
                }

                if ui
                    .add(egui::Slider::new(&mut self.settings.event_count, 1..=60).text("Events per batch"))
                    .changed()
                {
                    self.mark_settings_dirty();
                }
            });

        egui::CollapsingHeader::new("Physics")
            .default_open(false)
            .show(ui, |ui| {
                if ui.checkbox(&mut self.physics_enabled, "Physics enabled").changed() {
                    self.mark_settings_dirty();
                }
                ui.add_space(5.0);
                if ui
                    .add(
                        egui::Slider::new(&mut self.layout.repulsion, 100.0..=100000.0)
                            .logarithmic(true)
                            .text("Repulsion"),
                    )
                    .changed()
                {
                    self.mark_settings_dirty();
                }
                if ui
                    .add(egui::Slider::new(&mut self.layout.link_distance, 50.0..=500.0).text("Link distance"))
                    .changed()
                {
                    self.mark_settings_dirty();
                }
                if ui
                    .add(
                        egui::Slider::new(&mut self.layout.link_strength, 0.001..=1.0)
                            .logarithmic(true)
                            .text("Link strength"),
                    )
                    .changed()
                {
                    self.mark_settings_dirty();
                }
                if ui
                    .add(egui::Slider::new(&mut self.layout.centering, 0.0..=1.0).text("Centering"))
                    .changed()
                {
                    self.mark_settings_dirty();
                }
                if ui
                    .add(egui::Slider::new(&mut self.layout.collide_radius, 10.0..=300.0).text("Collide radius"))
                    .changed()
                {
                    self.mark_settings_dirty();
                }

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    if ui.button("⟳ Reshuffle").clicked() {
                        self.reshuffle_layout();
                    }
                    if ui.button("↺ Reset All").clicked() {
                        self.layout = ForceLayout::default();
                        self.node_size = 60.0;
                        self.show_links = true;
                        self.physics_enabled = true;
                        self.pan_offset = Vec2::ZERO;
                        self.zoom = 1.0;
                        self.playback.pause();
                        self.playback.set_speed(1.0);
                        self.playback.set_policy(EndPolicy::Wrap);
                        self.timeline.set_event_duration(sample::EVENT_DURATION);
                        self.timeline.set_max_time(sample::MAX_TIME);
                        self.settings.event_count = sample::EVENT_COUNT;
                        self.reshuffle_layout();
                        self.mark_settings_dirty();
                    }
                });
            });

        if let Some(ref err) = self.sim_error {
            ui.add_space(8.0);
            ui.colored_label(theme::text::ERROR, format!("Graph rejected: {err}"));
        }

        ui.add_space(8.0);
        let status = if self.layout.is_settled(&self.sim) {
            "layout settled".to_owned()
        } else {
            format!("alpha {:.3}", self.sim.alpha())
        };
        ui.colored_label(theme::text::MUTED, status);
    }

    fn render_graph(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let center = rect.center();

        // Gather input deltas first (allows simultaneous pan+zoom)
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());
        let hover_pos = response.hover_pos();

        // Pointer events arrived against the previous frame's transform
        let pan_offset = self.pan_offset;
        let zoom = self.zoom;
        let to_graph = move |pos: Pos2| -> Pos2 { center + (pos - center - pan_offset) / zoom };

        // Node drag through the controller; background drag pans
        let pointer_graph = response.interact_pointer_pos().map(to_graph);
        if response.drag_started() {
            if let Some(gp) = pointer_graph {
                if let Some(id) = self.hit_test_node(gp) {
                    self.drag.pointer_down(&mut self.sim, &id, gp);
                }
            }
        }
        if response.dragged() {
            if self.drag.dragging().is_some() {
                if let Some(gp) = pointer_graph {
                    self.drag.pointer_move(&mut self.sim, gp);
                }
            } else {
                self.pan_offset += response.drag_delta();
            }
        }
        if response.drag_stopped() {
            self.drag.pointer_up(&mut self.sim);
        }

        // Two-finger scroll pans; pinch or ctrl+scroll zooms toward the cursor
        if scroll_delta != Vec2::ZERO && response.hovered() {
            self.pan_offset += scroll_delta;
        }
        if let Some(cursor_pos) = hover_pos {
            if zoom_delta != 1.0 {
                let new_zoom = (self.zoom * zoom_delta).clamp(0.1, 5.0);
                let cursor_offset = cursor_pos - center - self.pan_offset;
                self.pan_offset += cursor_offset * (1.0 - new_zoom / self.zoom);
                self.zoom = new_zoom;
            }
        }

        // Advance the simulation (graph-space center, unaffected by pan)
        if self.physics_enabled {
            self.layout.step(&mut self.sim, center);
        }

        // Graph space -> screen space for drawing, post input handling
        let pan_offset = self.pan_offset;
        let zoom = self.zoom;
        let to_screen = move |pos: Pos2| -> Pos2 { center + (pos - center) * zoom + pan_offset };

        // Links behind nodes
        if self.show_links {
            let stroke = Stroke::new(1.5 * self.zoom, theme::LINK.gamma_multiply(0.6));
            for link in &self.sim.data.links {
                let (Some(a), Some(b)) = (
                    self.sim.get_pos(&link.source),
                    self.sim.get_pos(&link.target),
                ) else {
                    continue;
                };
                painter.line_segment([to_screen(a), to_screen(b)], stroke);
            }
        }

        // Node cards, colored by proximity to their active event
        let scale = EventColorScale::new(self.timeline.event_duration());
        let time = self.timeline.time();
        for node in &self.sim.data.nodes {
            let Some(pos) = self.sim.get_pos(&node.id) else {
                continue;
            };
            let fill = match self.timeline.nearest_active_event(&node.id) {
                Some(e) => scale.color_at(e.midpoint(self.timeline.event_duration()), time),
                None => scale.neutral(),
            };

            let screen = to_screen(pos);
            let size = self.node_size * self.zoom;
            let card = Rect::from_center_size(screen, Vec2::splat(size));
            painter.rect_filled(card, size / 3.0, fill);
            if self.drag.dragging() == Some(node.id.as_str()) {
                painter.rect_stroke(card, size / 3.0, Stroke::new(2.0, theme::node::DRAG_OUTLINE));
            }
            painter.text(
                screen,
                Align2::CENTER_CENTER,
                &node.label,
                FontId::proportional(size * 0.45),
                theme::node::LABEL,
            );
        }
    }

    fn render_timeline(&mut self, ui: &mut egui::Ui) {
        let is_playing = self.playback.playing();
        let current_speed = self.playback.speed();
        let current_policy = self.playback.policy();

        ui.horizontal(|ui| {
            if is_playing {
                if ui.button("⏸ Pause").clicked() {
                    self.playback.pause();
                }
            } else if ui.button("▶ Play").clicked() {
                // Restarting from the stop point would end immediately
                if self.timeline.time() >= self.timeline.max_time() {
                    self.timeline.set_time(0.0);
                }
                self.playback.play();
            }

            if ui.button("⏮").clicked() {
                self.playback.pause();
                self.timeline.set_time(0.0);
            }

            ui.separator();

            ui.label("Speed:");
            for speed in [0.5_f32, 1.0, 2.0, 4.0, 8.0] {
                let label = format!("{speed}x");
                if ui
                    .selectable_label((current_speed - speed).abs() < 0.01, &label)
                    .clicked()
                {
                    self.playback.set_speed(speed);
                    self.mark_settings_dirty();
                }
            }

            ui.separator();

            for policy in [EndPolicy::Wrap, EndPolicy::Stop] {
                if ui
                    .selectable_label(current_policy == policy, policy.label())
                    .clicked()
                {
                    self.playback.set_policy(policy);
                    self.mark_settings_dirty();
                }
            }

            ui.separator();

            if ui.button("⟳ New events").clicked() {
                self.refresh_events();
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label(format!(
                "t = {:>3.0} / {:.0}",
                self.timeline.time().floor(),
                self.timeline.max_time()
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(
                    theme::text::MUTED,
                    format!(
                        "{} active / {} events",
                        self.timeline.active_count(),
                        self.timeline.events().len()
                    ),
                );
            });
        });

        ui.add_space(4.0);
        self.render_scrubber(ui);
    }

    fn render_scrubber(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(
            Vec2::new(ui.available_width(), 48.0),
            egui::Sense::click_and_drag(),
        );
        let rect = response.rect;
        let track_left = rect.left() + SCRUBBER_MARGIN;
        let track_width = (rect.width() - 2.0 * SCRUBBER_MARGIN).max(1.0);
        let track_y = rect.center().y + 6.0;
        let max_time = self.timeline.max_time();

        painter.rect_filled(rect, 4.0, theme::bg::TRACK);
        painter.line_segment(
            [
                Pos2::new(track_left, track_y),
                Pos2::new(track_left + track_width, track_y),
            ],
            Stroke::new(4.0, theme::timeline::TRACK_LINE),
        );

        // Tick labels along the track
        let tick_step = max_time / 10.0;
        if tick_step > 0.0 {
            for i in 0..=10 {
                let t = tick_step * i as f64;
                let x = scrubber_x(t, max_time, track_left, track_width);
                painter.text(
                    Pos2::new(x, rect.bottom() - 4.0),
                    Align2::CENTER_BOTTOM,
                    format!("{t:.0}"),
                    FontId::proportional(10.0),
                    theme::text::MUTED,
                );
            }
        }

        // One notch per scheduled event; active ones light up
        for (i, event) in self.timeline.events().iter().enumerate() {
            let x = scrubber_x(event.start_time, max_time, track_left, track_width);
            let active = self.timeline.active_indices().contains(&i);
            let color = if active {
                theme::node::HIGHLIGHT
            } else {
                theme::timeline::NOTCH
            };
            painter.line_segment(
                [Pos2::new(x, track_y - 7.0), Pos2::new(x, track_y + 7.0)],
                Stroke::new(2.0, color),
            );
        }

        // Handle plus numeric readout above it
        let handle_x = scrubber_x(self.timeline.time(), max_time, track_left, track_width);
        painter.circle_filled(Pos2::new(handle_x, track_y), 9.0, theme::timeline::HANDLE);
        painter.circle_stroke(
            Pos2::new(handle_x, track_y),
            9.0,
            Stroke::new(1.5, theme::timeline::HANDLE_RIM),
        );
        painter.text(
            Pos2::new(handle_x, track_y - 14.0),
            Align2::CENTER_BOTTOM,
            format!("{:.0}", self.timeline.time().floor()),
            FontId::proportional(12.0),
            theme::text::PRIMARY,
        );

        // Dragging the handle takes over from playback
        if response.dragged() || response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.playback.pause();
                let t = scrubber_time(pos.x, max_time, track_left, track_width);
                self.timeline.set_time(t);
            }
        }
    }
}

impl eframe::App for PulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        if self.playback.advance(dt, &mut self.timeline) {
            tracing::debug!(policy = ?self.playback.policy(), "playback reached end of timeline");
        }
        self.maybe_save_settings();

        // Keep repainting while anything is in motion
        if self.playback.playing()
            || (self.physics_enabled && !self.layout.is_settled(&self.sim))
        {
            ctx.request_repaint();
        }

        ctx.set_visuals(egui::Visuals::dark());

        egui::SidePanel::left("sidebar")
            .min_width(220.0)
            .frame(egui::Frame::none().fill(theme::bg::PANEL).inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_sidebar(ui);
                });
            });

        egui::TopBottomPanel::bottom("timeline")
            .min_height(110.0)
            .frame(
                egui::Frame::none()
                    .fill(theme::bg::PANEL)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0)),
            )
            .show(ctx, |ui| {
                self.render_timeline(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::bg::GRAPH))
            .show(ctx, |ui| {
                self.render_graph(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.sync_settings_from_ui();
            self.settings.save();
        }
    }
}

/// Build a simulation for `data`, falling back to an empty one (with
/// the error preserved for display) when the topology is invalid.
fn build_simulation(data: GraphData) -> (SimulationState, Option<String>) {
    match SimulationState::new(data, SEED_BOUNDS) {
        Ok(sim) => (sim, None),
        Err(e) => {
            tracing::error!("graph rejected: {e}");
            (SimulationState::empty(), Some(e.to_string()))
        }
    }
}

/// Map a time onto the scrubber track span.
fn scrubber_x(time: f64, max_time: f64, left: f32, width: f32) -> f32 {
    if max_time <= 0.0 {
        return left;
    }
    let frac = (time / max_time).clamp(0.0, 1.0) as f32;
    left + frac * width
}

/// Invert the scrubber mapping, clamped to the track span.
fn scrubber_time(x: f32, max_time: f64, left: f32, width: f32) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    let frac = (((x - left) / width).clamp(0.0, 1.0)) as f64;
    frac * max_time
}

/// Hit test for a square node card centered at `center`.
fn node_hit(center: Pos2, half_extent: f32, pointer: Pos2) -> bool {
    (pointer.x - center.x).abs() <= half_extent && (pointer.y - center.y).abs() <= half_extent
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
