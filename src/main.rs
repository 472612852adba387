//! Native event pulse graph.
//!
//! A force-directed node-link graph coupled to a scrubbable event
//! timeline: nodes light up as the time cursor crosses their scheduled
//! events.

mod app;
mod graph;
mod sample;
mod settings;
mod theme;
mod timeline;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Pulse Graph"),
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Pulse Graph",
        options,
        Box::new(|cc| Ok(Box::new(app::PulseApp::new(cc)))),
    )
}
