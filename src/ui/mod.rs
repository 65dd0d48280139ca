//! Användargränssnitt

pub mod input;
pub mod modals;
pub mod navigation;
pub mod shortcuts;
pub mod state;
pub mod theme;
pub mod viewport;
pub mod views;
pub mod widgets;

pub use state::{AppState, ConfirmAction, StatusMessage, StatusType};
