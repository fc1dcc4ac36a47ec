//! drumstaff-gui: drum pattern viewer with grid and staff views

mod app;
mod panels;

use app::DrumstaffApp;
use eframe::NativeOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["drumstaff=debug", "wgpu=warn", "eframe=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!("Starting Drumstaff");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 520.0])
            .with_min_inner_size([800.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Drumstaff",
        options,
        Box::new(|cc| Ok(Box::new(DrumstaffApp::new(cc)))),
    )
}
