mod app;
mod convert;
mod dialog;
mod loader;
mod messages;
mod panels;
mod states;

use tomoview_core::settings::AppSettings;

const DEFAULT_WIDTH: f32 = 1280.0;
const DEFAULT_HEIGHT: f32 = 800.0;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = AppSettings::load();
    let size = [
        settings.window_width.unwrap_or(DEFAULT_WIDTH),
        settings.window_height.unwrap_or(DEFAULT_HEIGHT),
    ];

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_min_inner_size([800.0, 600.0])
            .with_title("Tomoview"),
        ..Default::default()
    };

    eframe::run_native(
        "Tomoview",
        options,
        Box::new(|cc| Ok(Box::new(app::TomoviewApp::new(&cc.egui_ctx, settings)))),
    )
}
