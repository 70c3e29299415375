pub mod app;
pub mod cli;
mod config_file;
mod logging;
mod navigator;
mod render;

pub use app::run_app;
