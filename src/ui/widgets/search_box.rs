//! Sökfält med resultatlista under fältet

use egui::{self, Key, RichText};

use crate::services::family_tree::{FamilyGraph, MAX_SEARCH_RESULTS};
use crate::ui::theme::{Colors, Icons};

#[derive(Debug, Default)]
pub struct SearchBox {
    query: String,
    open: bool,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Visar sökfältet. Returnerar ID för vald medlem: klick på en träff
    /// eller Enter (första träffen).
    pub fn show(&mut self, ui: &mut egui::Ui, graph: &FamilyGraph, request_focus: bool) -> Option<String> {
        ui.label(Icons::SEARCH);
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("Sök namn eller ID")
                .desired_width(220.0),
        );
        if request_focus {
            response.request_focus();
        }
        if response.changed() || response.gained_focus() {
            self.open = true;
        }
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            self.open = false;
        }

        let results = graph.search(&self.query, MAX_SEARCH_RESULTS);
        let mut selected = None;

        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            selected = results.first().map(|m| m.id.clone());
        }

        if self.open && selected.is_none() && !self.query.trim().is_empty() {
            let area = egui::Area::new(response.id.with("results"))
                .order(egui::Order::Foreground)
                .fixed_pos(response.rect.left_bottom())
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_min_width(response.rect.width());
                        if results.is_empty() {
                            ui.label(RichText::new("Inga träffar").color(Colors::TEXT_MUTED));
                        }
                        for member in &results {
                            let label = format!("{}  ·  {}", member.name, member.id);
                            if ui.selectable_label(false, label).clicked() {
                                selected = Some(member.id.clone());
                            }
                        }
                    });
                });

            // Klick utanför fält och lista stänger
            let pressed = ui.input(|i| i.pointer.any_pressed());
            if pressed && !response.has_focus() && !area.response.contains_pointer() {
                self.open = false;
            }
        }

        if selected.is_some() {
            self.query.clear();
            self.open = false;
            response.surrender_focus();
        }

        selected
    }
}
