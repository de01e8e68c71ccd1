mod app;
pub mod commands;
pub mod config;
pub mod console;
mod effects;

pub use app::run_app;
