//! PowerPedal test telemetry dashboard.
//!
//! The data pipeline (`data`, `view`) has no UI dependency; `state`, `ui`
//! and `app` wire it into an eframe window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod view;
