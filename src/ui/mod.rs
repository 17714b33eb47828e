//! UI module - egui panels and the chart plot region

pub mod panels;
pub mod plot;
