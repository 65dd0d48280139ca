pub mod member;
pub mod config;

pub use member::*;
pub use config::*;
