pub mod bio_panel;
pub mod member_node;
pub mod search_box;

pub use bio_panel::{BioAction, BioPanel};
pub use member_node::{MemberNode, MemberNodeResponse};
pub use search_box::SearchBox;
