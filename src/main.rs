#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the egui-based retention risk form.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use porur::config;
use porur::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use porur::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let startup = config::load_or_default().map_err(|err| {
        tracing::error!("Failed to load config: {err}");
        format!("Failed to load config: {err}")
    });

    let viewport = egui::ViewportBuilder::default()
        .with_title("Predictive Model App")
        .with_inner_size([1280.0, 860.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Predictive Model App",
        native_options,
        Box::new(move |_cc| match startup {
            Ok(settings) => {
                tracing::info!("Using model artifact {}", settings.model_path.display());
                Ok(Box::new(EguiApp::new(settings)))
            }
            Err(message) => Ok(Box::new(LaunchError { message })),
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start");
                ui.label(&self.message);
            });
        });
    }
}
