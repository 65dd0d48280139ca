//! Ansab Desktop - interaktivt släktträd
//!
//! Layout, vyportnavigering och rendering av stora genealogier med egui.

pub mod app;
pub mod db;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-exports
pub use app::AnsabApp;
pub use db::Database;
pub use models::*;
pub use ui::AppState;
