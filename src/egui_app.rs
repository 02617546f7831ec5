//! Single-page egui front end: the covariate form and the prediction result.

pub mod controller;
pub mod state;
pub mod ui;
