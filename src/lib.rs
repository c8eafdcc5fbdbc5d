pub mod ads;
pub mod config;
pub mod tui;
