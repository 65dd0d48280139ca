//! Tjänster för Ansab
//!
//! Trädmotorn (graf, layout, linjer, expansion) och import.

pub mod family_tree;
pub mod import;

pub use import::{ImportMode, ImportResult, MemberImporter};
