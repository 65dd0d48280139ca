//! Vinkellinjer mellan förälder och barn, beräknade från renderade nodrutor

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};

use super::layout::{LayoutMetrics, TreeLayout, TreeLine};

/// Nodrutor från senaste renderingen, i vyportens pixelkoordinater.
///
/// `container_origin` är trädbehållarens övre vänstra hörn i samma
/// koordinatsystem, dvs. där layoutpunkten (0, 0) hamnade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedGeometry {
    container_origin: Pos2,
    boxes: HashMap<String, Rect>,
}

impl RenderedGeometry {
    pub fn new(container_origin: Pos2) -> Self {
        Self {
            container_origin,
            boxes: HashMap::new(),
        }
    }

    /// Nominella rutor för alla synliga noder under given skala och förskjutning
    pub fn from_layout(
        layout: &TreeLayout,
        metrics: &LayoutMetrics,
        scale: f32,
        translate: Vec2,
    ) -> Self {
        let mut geometry = Self::new(translate.to_pos2());
        for node in &layout.nodes {
            let rect = metrics.node_rect(node);
            geometry.insert(
                node.id.clone(),
                Rect::from_min_size(
                    geometry.container_origin + rect.min.to_vec2() * scale,
                    rect.size() * scale,
                ),
            );
        }
        geometry
    }

    pub fn container_origin(&self) -> Pos2 {
        self.container_origin
    }

    pub fn insert(&mut self, id: String, rect: Rect) {
        self.boxes.insert(id, rect);
    }

    pub fn node_box(&self, id: &str) -> Option<Rect> {
        self.boxes.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.boxes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Nodens mittpunkt i layoutkoordinater, om noden är renderad
    pub fn layout_center(&self, id: &str, scale: f32) -> Option<Pos2> {
        if !is_valid_scale(scale) {
            return None;
        }
        let rect = self.node_box(id)?;
        Some(((rect.center() - self.container_origin) / scale).to_pos2())
    }
}

/// Tresegmentslinje: ned från förälderns underkant, horisontellt vid
/// mitthöjden, upp i barnets överkant. Koordinater i layoutenheter.
#[derive(Debug, Clone, PartialEq)]
pub struct ElbowConnector {
    pub from_id: String,
    pub to_id: String,
    pub start: Pos2,
    pub end: Pos2,
    pub mid_y: f32,
}

impl ElbowConnector {
    pub fn segments(&self) -> [[Pos2; 2]; 3] {
        let drop_end = Pos2::new(self.start.x, self.mid_y);
        let rise_start = Pos2::new(self.end.x, self.mid_y);
        [
            [self.start, drop_end],
            [drop_end, rise_start],
            [rise_start, self.end],
        ]
    }

    /// Punkten där linjen från föräldern möter den horisontella bussen
    pub fn junction(&self) -> Pos2 {
        Pos2::new(self.start.x, self.mid_y)
    }
}

/// Räkna fram linjegeometri för alla kanter vars båda noder är renderade.
/// Kanter med en ej renderad nod hoppas över.
pub fn resolve_connectors(
    lines: &[TreeLine],
    scale: f32,
    geometry: &RenderedGeometry,
) -> Vec<ElbowConnector> {
    if !is_valid_scale(scale) {
        return Vec::new();
    }

    let origin = geometry.container_origin();
    lines
        .iter()
        .filter_map(|line| {
            let from = geometry.node_box(&line.from_id)?;
            let to = geometry.node_box(&line.to_id)?;

            let start = ((from.center_bottom() - origin) / scale).to_pos2();
            let end = ((to.center_top() - origin) / scale).to_pos2();

            Some(ElbowConnector {
                from_id: line.from_id.clone(),
                to_id: line.to_id.clone(),
                start,
                end,
                mid_y: (start.y + end.y) / 2.0,
            })
        })
        .collect()
}

fn is_valid_scale(scale: f32) -> bool {
    scale.is_finite() && scale > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;
    use crate::services::family_tree::{compute_layout, ExpansionSet, FamilyGraph};

    fn geometry() -> RenderedGeometry {
        let mut geometry = RenderedGeometry::new(Pos2::new(50.0, 20.0));
        geometry.insert(
            "p".into(),
            Rect::from_min_size(Pos2::new(150.0, 20.0), Vec2::new(200.0, 100.0)),
        );
        geometry.insert(
            "c".into(),
            Rect::from_min_size(Pos2::new(50.0, 240.0), Vec2::new(200.0, 100.0)),
        );
        geometry
    }

    #[test]
    fn test_elbow_geometry() {
        let connectors = resolve_connectors(&[TreeLine::new("p", "c")], 1.0, &geometry());
        assert_eq!(connectors.len(), 1);

        let c = &connectors[0];
        assert_eq!(c.start, Pos2::new(200.0, 100.0));
        assert_eq!(c.end, Pos2::new(100.0, 220.0));
        assert_eq!(c.mid_y, 160.0);
        assert_eq!(c.junction(), Pos2::new(200.0, 160.0));

        let [drop, bus, rise] = c.segments();
        assert_eq!(drop, [Pos2::new(200.0, 100.0), Pos2::new(200.0, 160.0)]);
        assert_eq!(bus, [Pos2::new(200.0, 160.0), Pos2::new(100.0, 160.0)]);
        assert_eq!(rise, [Pos2::new(100.0, 160.0), Pos2::new(100.0, 220.0)]);
    }

    #[test]
    fn test_coordinates_divided_by_scale() {
        let connectors = resolve_connectors(&[TreeLine::new("p", "c")], 2.0, &geometry());
        let c = &connectors[0];
        assert_eq!(c.start, Pos2::new(100.0, 50.0));
        assert_eq!(c.end, Pos2::new(50.0, 110.0));
        assert_eq!(c.mid_y, 80.0);
    }

    #[test]
    fn test_unrendered_nodes_are_skipped() {
        let lines = [TreeLine::new("p", "c"), TreeLine::new("c", "missing")];
        assert_eq!(resolve_connectors(&lines, 1.0, &geometry()).len(), 1);
        assert!(resolve_connectors(&lines, 1.0, &RenderedGeometry::default()).is_empty());
        assert!(resolve_connectors(&lines, 0.0, &geometry()).is_empty());
        assert!(resolve_connectors(&lines, f32::NAN, &geometry()).is_empty());
    }

    #[test]
    fn test_connectors_independent_of_zoom() {
        let graph = FamilyGraph::build(vec![
            Member::new("A", "A", None),
            Member::new("B", "B", Some("A")),
            Member::new("C", "C", Some("A")),
        ]);
        let layout = compute_layout(&graph, "A", &ExpansionSet::from_ids(["A"]));
        let metrics = LayoutMetrics::default();

        let at_one = RenderedGeometry::from_layout(&layout, &metrics, 1.0, Vec2::ZERO);
        let zoomed = RenderedGeometry::from_layout(&layout, &metrics, 2.5, Vec2::new(-30.0, 75.0));

        let a = resolve_connectors(&layout.lines, 1.0, &at_one);
        let b = resolve_connectors(&layout.lines, 2.5, &zoomed);
        assert_eq!(a.len(), 2);
        for (x, y) in a.iter().zip(&b) {
            assert!((x.start - y.start).length() < 1e-3);
            assert!((x.end - y.end).length() < 1e-3);
        }

        // A ligger på slot 0.5: underkantens mitt på 0.5 * 240 + 100
        assert_eq!(a[0].start, Pos2::new(220.0, 100.0));
        assert_eq!(a[0].end, Pos2::new(100.0, 220.0));
    }

    #[test]
    fn test_layout_center() {
        let geometry = geometry();
        assert_eq!(
            geometry.layout_center("p", 1.0),
            Some(Pos2::new(200.0, 50.0))
        );
        assert_eq!(
            geometry.layout_center("p", 2.0),
            Some(Pos2::new(100.0, 25.0))
        );
        assert_eq!(geometry.layout_center("missing", 1.0), None);
        assert_eq!(geometry.layout_center("p", 0.0), None);
    }
}
