//! Ansab Desktop - Entry Point

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use ansab_desktop::models::config::AppSettings;
use ansab_desktop::AnsabApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar Ansab Desktop v{}", env!("CARGO_PKG_VERSION"));

    let settings = AppSettings::load();

    // Fönsterinställningar
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Ansab - Släktträd v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([480.0, 360.0])
            .with_app_id("ansab"),
        ..Default::default()
    };

    eframe::run_native(
        "Ansab",
        options,
        Box::new(move |cc| Ok(Box::new(AnsabApp::new(cc, settings)?))),
    )
}
