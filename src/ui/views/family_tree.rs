//! Släktträdsvyn: verktygsrad, rityta med noder och linjer, gester
//!
//! Varje ruta: layout (vid behov) → noder ritas och mäts → linjer löses mot
//! de uppmätta rutorna → navigeringen får den färdiga geometrin och kan
//! centrera. Ändras transformen efter commit begärs en ny ruta.

use egui::{self, Color32, Pos2, Rect, RichText, Sense, Shape, Stroke};

use crate::models::{Member, TreeSettings};
use crate::services::family_tree::{
    compute_layout, resolve_connectors, ElbowConnector, ExpansionSet, FamilyGraph, LayoutMetrics,
    RenderedGeometry, TreeLayout,
};
use crate::ui::input::CanvasInput;
use crate::ui::navigation::NavigationOrchestrator;
use crate::ui::state::AppState;
use crate::ui::theme::{Colors, Icons, TreePalette};
use crate::ui::viewport::ViewportController;
use crate::ui::widgets::{MemberNode, SearchBox};

/// Marginal runt ritytan inom vilken noder fortfarande ritas
const CULL_MARGIN: f32 = 64.0;

/// Vy för att visa släktträdet
pub struct FamilyTreeView {
    graph: FamilyGraph,
    root_id: String,
    settings: TreeSettings,
    expansion: ExpansionSet,
    layout: TreeLayout,
    layout_dirty: bool,
    metrics: LayoutMetrics,
    viewport: ViewportController,
    navigation: NavigationOrchestrator,
    input: CanvasInput,
    search: SearchBox,
    /// Geometri från senaste ritade ruta, i ritytans koordinater
    geometry: RenderedGeometry,
    initial_scale_applied: bool,
}

impl FamilyTreeView {
    pub fn new(settings: &TreeSettings) -> Self {
        Self {
            graph: FamilyGraph::new(),
            root_id: settings.root_id.clone(),
            settings: settings.clone(),
            expansion: ExpansionSet::from_ids(settings.initially_expanded.iter().cloned()),
            layout: TreeLayout::default(),
            layout_dirty: true,
            metrics: LayoutMetrics::default(),
            viewport: ViewportController::default()
                .with_wheel_zoom_intensity(settings.wheel_zoom_intensity),
            navigation: NavigationOrchestrator::new(settings.default_focus_id.clone()),
            input: CanvasInput::new(),
            search: SearchBox::new(),
            geometry: RenderedGeometry::default(),
            initial_scale_applied: false,
        }
    }

    /// Ersätt medlemslistan. Expansion och navigering behålls.
    pub fn set_members(&mut self, members: Vec<Member>) {
        self.graph = FamilyGraph::build(members);
        if !self.graph.orphans().is_empty() {
            tracing::debug!(
                "{} medlemmar har okänd förälder och visas inte",
                self.graph.orphans().len()
            );
        }
        self.layout_dirty = true;
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn navigation(&self) -> &NavigationOrchestrator {
        &self.navigation
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    pub fn geometry(&self) -> &RenderedGeometry {
        &self.geometry
    }

    /// Konfigurerad rot, annars första roten i grafen
    pub fn effective_root(&self) -> Option<&str> {
        if self.graph.contains(&self.root_id) {
            return Some(&self.root_id);
        }
        self.graph
            .roots()
            .first()
            .map(|&index| self.graph.get(index).id.as_str())
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.navigation.reset_zoom(&mut self.viewport);
    }

    /// Expandera förfäderna och centrera på medlemmen efter nästa ruta
    pub fn select_member(&mut self, id: &str) {
        if !self.graph.contains(id) {
            tracing::debug!("Okänt medlems-ID '{}', ingen navigering", id);
            return;
        }
        self.navigation.select_member(id, &self.graph, &mut self.expansion);
        self.layout_dirty = true;
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        self.expansion.toggle(id);
        self.layout_dirty = true;
    }

    fn ensure_layout(&mut self) {
        if !self.layout_dirty {
            return;
        }
        self.layout = match self.effective_root() {
            Some(root) => compute_layout(&self.graph, root, &self.expansion),
            None => TreeLayout::default(),
        };
        self.layout_dirty = false;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        self.show_toolbar(ui, state);

        if let Some(id) = state.navigate_to.take() {
            self.select_member(&id);
        }

        ui.separator();

        if self.graph.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.label(RichText::new(Icons::TREE).size(48.0));
                ui.add_space(12.0);
                ui.label(RichText::new("Inget släktträd inläst").color(Colors::TEXT_MUTED));
                ui.label(
                    RichText::new(format!("Importera en JSON-fil via {} Importera", Icons::IMPORT))
                        .color(Colors::TEXT_MUTED),
                );
            });
            return;
        }

        self.show_canvas(ui, state);
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            let focus = std::mem::take(&mut state.focus_search);
            if let Some(id) = self.search.show(ui, &self.graph, focus) {
                self.select_member(&id);
                state.selected_member_id = Some(id);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(Icons::RESET).on_hover_text("Återställ vy").clicked() {
                    self.reset_view();
                }
                if ui.button(Icons::ZOOM_IN).on_hover_text("Zooma in").clicked() {
                    self.zoom_in();
                }
                ui.label(format!("{:.0}%", self.viewport.scale() * 100.0));
                if ui.button(Icons::ZOOM_OUT).on_hover_text("Zooma ut").clicked() {
                    self.zoom_out();
                }

                ui.separator();
                let generations = if self.layout.is_empty() {
                    0
                } else {
                    self.layout.max_depth() + 1
                };
                ui.label(
                    RichText::new(format!(
                        "{} av {} visas, {} generationer",
                        self.layout.nodes.len(),
                        self.graph.len(),
                        generations
                    ))
                    .color(Colors::TEXT_MUTED),
                );
            });
        });
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        let canvas = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(canvas, Sense::hover());

        // Storlek och brytpunkt
        if !self.initial_scale_applied && canvas.width() > 0.0 {
            if let Some(cap) = self.settings.initial_scale_cap(canvas.width()) {
                self.viewport.cap_scale(cap);
            }
            self.initial_scale_applied = true;
        }
        self.navigation.viewport_resized(canvas.size(), &mut self.viewport);
        self.metrics = self.settings.metrics_for(canvas.width());

        // Gester
        let events = ui.input(|i| i.events.clone());
        let hover_pos = ui
            .input(|i| i.pointer.hover_pos())
            .filter(|_| response.contains_pointer());
        self.input
            .handle_events(&events, canvas, hover_pos, &mut self.viewport);

        self.ensure_layout();

        let mut canvas_ui = ui.new_child(egui::UiBuilder::new().max_rect(canvas));
        canvas_ui.set_clip_rect(canvas);
        let painter = canvas_ui.painter().clone();
        let palette = TreePalette::for_mode(ui.visuals().dark_mode);

        painter.rect_filled(canvas, 0.0, ui.visuals().extreme_bg_color);
        // Linjerna ritas under noderna men räknas fram efter dem
        let connector_slot = painter.add(Shape::Noop);

        let scale = self.viewport.scale();
        let translate = self.viewport.translate();
        let origin = canvas.min + translate;
        let visible = canvas.expand(CULL_MARGIN);

        let mut geometry = RenderedGeometry::new(translate.to_pos2());
        let mut toggled: Vec<String> = Vec::new();
        let mut clicked: Option<String> = None;

        for node in &self.layout.nodes {
            let nominal = self.metrics.node_rect(node);
            let screen = Rect::from_min_size(
                origin + nominal.min.to_vec2() * scale,
                nominal.size() * scale,
            );

            // Noder utanför ritytan ritas inte men får nominell geometri
            let measured = if visible.intersects(screen) {
                let member = self.graph.get(node.index);
                let node_response = MemberNode::new(member, screen, scale, palette)
                    .children(
                        self.graph.has_children(&node.id),
                        self.expansion.contains(&node.id),
                    )
                    .selected(state.selected_member_id.as_deref() == Some(node.id.as_str()))
                    .show(&mut canvas_ui);

                if node_response.toggle_clicked {
                    toggled.push(node.id.clone());
                } else if node_response.clicked {
                    clicked = Some(node.id.clone());
                }
                node_response.rect
            } else {
                screen
            };

            geometry.insert(node.id.clone(), measured.translate(-canvas.min.to_vec2()));
        }

        let connectors = resolve_connectors(&self.layout.lines, scale, &geometry);
        painter.set(
            connector_slot,
            Shape::Vec(connector_shapes(&connectors, origin, scale, palette.connector)),
        );

        self.draw_hint(&painter, canvas);

        // Commit: geometrin är klar, låt navigeringen centrera
        if self.navigation.after_layout_commit(&geometry, &mut self.viewport) {
            ui.ctx().request_repaint();
        }
        self.geometry = geometry;

        for id in toggled {
            self.toggle_expanded(&id);
        }
        if let Some(id) = clicked {
            state.selected_member_id = Some(id);
        }
    }

    fn draw_hint(&self, painter: &egui::Painter, canvas: Rect) {
        let instructions =
            "Dra för att panorera • Ctrl+scroll eller nyp för att zooma • +/− visar barn • Klicka för biografi";
        painter.text(
            Pos2::new(canvas.center().x, canvas.bottom() - 16.0),
            egui::Align2::CENTER_CENTER,
            instructions,
            egui::FontId::proportional(11.0),
            Colors::TEXT_MUTED,
        );
    }
}

/// Linjeformer i skärmkoordinater från linjer i layoutenheter
fn connector_shapes(
    connectors: &[ElbowConnector],
    origin: Pos2,
    scale: f32,
    color: Color32,
) -> Vec<Shape> {
    let to_screen = |p: Pos2| origin + p.to_vec2() * scale;
    let stroke = Stroke::new((2.0 * scale).max(1.0), color);

    let mut shapes = Vec::with_capacity(connectors.len() * 4);
    for connector in connectors {
        let [drop, bus, rise] = connector.segments();
        for [a, b] in [drop, bus, rise] {
            shapes.push(Shape::line_segment([to_screen(a), to_screen(b)], stroke));
        }
        shapes.push(Shape::circle_filled(
            to_screen(connector.junction()),
            (3.0 * scale).max(1.5),
            color,
        ));
    }
    shapes
}
