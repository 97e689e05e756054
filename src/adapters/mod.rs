pub mod api;
pub mod config;
pub mod effects;
pub mod tui;
