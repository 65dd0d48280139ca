//! En nod i släktträdet: namn, levnadsår, tagline och expansionsknapp

use egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::models::Member;
use crate::ui::theme::TreePalette;

const PADDING: f32 = 10.0;
const TOGGLE_RADIUS: f32 = 11.0;

/// Utfall av en ritad nod
pub struct MemberNodeResponse {
    /// Uppmätt ruta; kan vara högre än den nominella
    pub rect: Rect,
    pub clicked: bool,
    pub toggle_clicked: bool,
}

pub struct MemberNode<'a> {
    member: &'a Member,
    rect: Rect,
    scale: f32,
    has_children: bool,
    expanded: bool,
    selected: bool,
    palette: TreePalette,
}

impl<'a> MemberNode<'a> {
    /// `rect` är nodens nominella ruta på skärmen
    pub fn new(member: &'a Member, rect: Rect, scale: f32, palette: TreePalette) -> Self {
        Self {
            member,
            rect,
            scale,
            has_children: false,
            expanded: false,
            selected: false,
            palette,
        }
    }

    pub fn children(mut self, has_children: bool, expanded: bool) -> Self {
        self.has_children = has_children;
        self.expanded = expanded;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> MemberNodeResponse {
        let s = self.scale;
        let painter = ui.painter().clone();
        let wrap_width = (self.rect.width() - 2.0 * PADDING * s).max(1.0);

        let name = painter.layout(
            self.member.name.clone(),
            FontId::proportional(16.0 * s),
            self.palette.text,
            wrap_width,
        );
        let years = self.member.years_display();
        let years = (!years.is_empty()).then(|| {
            painter.layout(years, FontId::proportional(12.0 * s), self.palette.text_muted, wrap_width)
        });
        let tagline = self.member.tagline.as_ref().filter(|t| !t.is_empty()).map(|t| {
            painter.layout(t.clone(), FontId::proportional(11.0 * s), self.palette.tagline, wrap_width)
        });

        let gap = 4.0 * s;
        let toggle_room = if self.has_children { TOGGLE_RADIUS * s } else { 0.0 };
        let content_height = 2.0 * PADDING * s
            + name.size().y
            + years.as_ref().map_or(0.0, |g| gap + g.size().y)
            + tagline.as_ref().map_or(0.0, |g| gap + g.size().y)
            + toggle_room;
        let rect = Rect::from_min_size(
            self.rect.min,
            Vec2::new(self.rect.width(), self.rect.height().max(content_height)),
        );

        let id = ui.id().with(("member_node", &self.member.id));
        let body = ui.interact(rect, id, Sense::click());

        // Bakgrund och ram
        let rounding = 10.0 * s;
        painter.rect_filled(rect.translate(Vec2::new(0.0, 3.0 * s)), rounding, self.palette.shadow);
        painter.rect_filled(rect, rounding, self.palette.node_bg);
        let border = if body.hovered() || self.selected {
            self.palette.node_border_hover
        } else {
            self.palette.node_border
        };
        let border_width = (if self.selected { 3.0 } else { 1.5 }) * s;
        painter.rect_stroke(rect, rounding, Stroke::new(border_width, border));

        // Text, centrerad vertikalt i utrymmet ovanför knappen
        let text_height = content_height - 2.0 * PADDING * s - toggle_room;
        let mut y = rect.top() + (rect.height() - toggle_room - text_height) / 2.0;
        for galley in std::iter::once(&name).chain(years.as_ref()).chain(tagline.as_ref()) {
            let x = rect.center().x - galley.size().x / 2.0;
            painter.galley(Pos2::new(x, y), galley.clone(), self.palette.text);
            y += galley.size().y + gap;
        }

        let mut toggle_clicked = false;
        if self.has_children {
            let center = rect.center_bottom();
            let radius = TOGGLE_RADIUS * s;
            let toggle_rect = Rect::from_center_size(center, Vec2::splat(2.0 * radius));
            let toggle = ui
                .interact(toggle_rect, id.with("toggle"), Sense::click())
                .on_hover_text(if self.expanded { "Dölj barn" } else { "Visa barn" });

            let fill = if toggle.hovered() {
                self.palette.button_bg_hover
            } else {
                self.palette.button_bg
            };
            painter.circle(center, radius, fill, Stroke::new(1.5 * s, self.palette.node_border));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                if self.expanded { "−" } else { "+" },
                FontId::proportional(14.0 * s),
                self.palette.text,
            );

            toggle_clicked = toggle.clicked();
        }

        MemberNodeResponse {
            rect,
            clicked: body.clicked() && !toggle_clicked,
            toggle_clicked,
        }
    }
}
