//! Släktträdets kärna: grafindex, layout, linjer och expansionsmängd

pub mod connectors;
pub mod expansion;
pub mod graph;
pub mod layout;

pub use connectors::{resolve_connectors, ElbowConnector, RenderedGeometry};
pub use expansion::ExpansionSet;
pub use graph::{FamilyGraph, MemberIndex, MAX_SEARCH_RESULTS};
pub use layout::{
    compute_layout, LayoutMetrics, PositionedNode, TreeLayout, TreeLine, MAX_LAYOUT_DEPTH,
};
