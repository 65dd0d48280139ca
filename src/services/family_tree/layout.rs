//! Layout av synliga delträd: generation (djup) och syskonplats (slot)
//!
//! Layouten räknas om från grunden vid varje ändring av medlemslistan eller
//! expansionsmängden. Rekursionen styrs av expansionsmängden och skyddas mot
//! cykler i föräldragrafen med en mängd av noder på aktuell väg samt ett
//! djuptak.

use std::collections::HashSet;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::expansion::ExpansionSet;
use super::graph::{FamilyGraph, MemberIndex};

/// Rekursionstak för layouten
pub const MAX_LAYOUT_DEPTH: usize = 2048;

/// En synlig nod med abstrakt position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub index: MemberIndex,
    pub id: String,
    /// Horisontell plats i slot-enheter (kan vara bråktal)
    pub slot: f32,
    /// Generation räknat från roten
    pub depth: usize,
}

/// Förälder–barn-kant mellan två synliga noder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeLine {
    pub from_id: String,
    pub to_id: String,
}

impl TreeLine {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}

/// Resultat av en layoutberäkning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    /// Synliga noder i pre-order (förälder före barn)
    pub nodes: Vec<PositionedNode>,
    pub lines: Vec<TreeLine>,
    /// Kanter som kapades för att de slöt en cykel
    pub cycle_edges: Vec<TreeLine>,
    /// True om djuptaket nåddes
    pub depth_limited: bool,
    /// Rotens delträdsbredd i slot-enheter
    pub width: f32,
}

impl TreeLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycle_edges.is_empty()
    }
}

/// Storlekar för en layoutomgång, upplösta per brytpunkt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 100.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 120.0,
        }
    }
}

impl LayoutMetrics {
    pub fn column_width(&self) -> f32 {
        self.node_width + self.horizontal_spacing
    }

    pub fn row_height(&self) -> f32 {
        self.node_height + self.vertical_spacing
    }

    /// Övre vänstra hörnet i layoutkoordinater
    pub fn node_origin(&self, node: &PositionedNode) -> Pos2 {
        Pos2::new(
            node.slot * self.column_width(),
            node.depth as f32 * self.row_height(),
        )
    }

    pub fn node_rect(&self, node: &PositionedNode) -> Rect {
        Rect::from_min_size(
            self.node_origin(node),
            Vec2::new(self.node_width, self.node_height),
        )
    }
}

/// Beräkna layout för delträdet under `root_id`.
///
/// Ren funktion av (rot, expansionsmängd, graf): samma indata ger alltid
/// samma resultat.
pub fn compute_layout(graph: &FamilyGraph, root_id: &str, expanded: &ExpansionSet) -> TreeLayout {
    let mut layout = TreeLayout::default();
    let Some(root) = graph.find(root_id) else {
        return layout;
    };

    let mut builder = LayoutBuilder {
        graph,
        expanded,
        on_path: HashSet::new(),
        layout: &mut layout,
    };
    let (_, width) = builder.place(root, 0, 0.0);
    layout.width = width;

    if layout.has_cycles() {
        tracing::warn!(
            "Layout: {} kant(er) kapade på grund av cykler i föräldragrafen",
            layout.cycle_edges.len()
        );
    }
    if layout.depth_limited {
        tracing::warn!("Layout: djuptaket {} nåddes", MAX_LAYOUT_DEPTH);
    }

    layout
}

struct LayoutBuilder<'a> {
    graph: &'a FamilyGraph,
    expanded: &'a ExpansionSet,
    on_path: HashSet<MemberIndex>,
    layout: &'a mut TreeLayout,
}

impl LayoutBuilder<'_> {
    /// Placera noden och dess synliga delträd med vänsterkant `offset`.
    /// Returnerar (nodens slot, delträdets bredd).
    fn place(&mut self, index: MemberIndex, depth: usize, offset: f32) -> (f32, f32) {
        let graph = self.graph;
        let id = &graph.get(index).id;

        // Platsen reserveras direkt så att listan blir pre-order
        let position = self.layout.nodes.len();
        self.layout.nodes.push(PositionedNode {
            index,
            id: id.clone(),
            slot: offset,
            depth,
        });

        let mut children: &[MemberIndex] = if self.expanded.contains(id) {
            graph.children(index)
        } else {
            &[]
        };
        if !children.is_empty() && depth + 1 >= MAX_LAYOUT_DEPTH {
            self.layout.depth_limited = true;
            children = &[];
        }

        self.on_path.insert(index);

        let mut width = 0.0;
        let mut first_slot: Option<f32> = None;
        let mut last_slot = offset;

        for &child in children {
            let child_id = &graph.get(child).id;
            if self.on_path.contains(&child) {
                self.layout
                    .cycle_edges
                    .push(TreeLine::new(id.clone(), child_id.clone()));
                continue;
            }

            self.layout
                .lines
                .push(TreeLine::new(id.clone(), child_id.clone()));
            let (child_slot, child_width) = self.place(child, depth + 1, offset + width);

            first_slot.get_or_insert(child_slot);
            last_slot = child_slot;
            width += child_width;
        }

        self.on_path.remove(&index);

        let (slot, width) = match first_slot {
            Some(first) => ((first + last_slot) / 2.0, width),
            None => (offset, 1.0),
        };
        self.layout.nodes[position].slot = slot;

        (slot, width)
    }
}
