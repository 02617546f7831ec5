//! Library exports for the desktop form, the CLI, benchmarks, and tests.
/// Per-user application directories.
pub mod app_dirs;
/// Argument parsing for `porur-predict`.
pub mod cli;
/// Persistent settings.
pub mod config;
/// egui form, controller, and rendering.
pub mod egui_app;
/// Raw form answers and their encoding into model features.
pub mod features;
/// Tracing setup.
pub mod logging;
/// Tree-ensemble model artifact and TreeSHAP.
pub mod ml;
/// Encode, predict, and explain for one submission.
pub mod prediction;
