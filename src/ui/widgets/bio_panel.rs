//! Biografipanel för vald medlem

use egui::{self, RichText};

use crate::models::Member;
use crate::services::family_tree::FamilyGraph;
use crate::ui::theme::{Colors, Icons};

/// Vad användaren gjorde i panelen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioAction {
    None,
    Close,
    Navigate(String),
}

pub struct BioPanel;

impl BioPanel {
    /// Biografin som fönster ovanpå trädet. Ritytans storlek påverkas inte,
    /// så vyporten står kvar när fönstret öppnas och stängs.
    pub fn show_window(ctx: &egui::Context, member: &Member, graph: &FamilyGraph) -> BioAction {
        let mut action = BioAction::None;
        egui::Window::new("Biografi")
            .id(egui::Id::new("bio_window"))
            .title_bar(false)
            .collapsible(false)
            .resizable(true)
            .default_width(340.0)
            .max_height((ctx.screen_rect().height() - 120.0).max(200.0))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 64.0])
            .show(ctx, |ui| {
                action = Self::show(ui, member, graph);
            });
        action
    }

    pub fn show(ui: &mut egui::Ui, member: &Member, graph: &FamilyGraph) -> BioAction {
        let mut action = BioAction::None;

        ui.horizontal(|ui| {
            ui.heading(RichText::new(&member.name).color(Colors::GOLD));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(Icons::CLOSE).on_hover_text("Stäng").clicked() {
                    action = BioAction::Close;
                }
            });
        });

        let years = member.years_display();
        if !years.is_empty() {
            ui.label(RichText::new(years).color(Colors::TEXT_MUTED));
        }
        if let Some(tagline) = member.tagline.as_ref().filter(|t| !t.is_empty()) {
            ui.label(RichText::new(tagline).italics());
        }

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            match member.biography.as_ref().filter(|b| !b.trim().is_empty()) {
                Some(bio) => {
                    ui.label(bio);
                }
                None => {
                    ui.label(RichText::new("Ingen biografi tillgänglig").color(Colors::TEXT_MUTED));
                }
            }

            ui.add_space(12.0);

            // Förälder
            if let Some(parent_id) = &member.parent_id {
                ui.label(RichText::new("Fader").strong());
                match graph.member(parent_id) {
                    Some(parent) => {
                        if ui.link(&parent.name).clicked() {
                            action = BioAction::Navigate(parent.id.clone());
                        }
                    }
                    None => {
                        ui.label(RichText::new(format!("{} (saknas)", parent_id)).color(Colors::TEXT_MUTED));
                    }
                }
                ui.add_space(8.0);
            }

            // Barn
            let children = graph.children_of(&member.id);
            if !children.is_empty() {
                ui.label(RichText::new(format!("Barn ({})", children.len())).strong());
                ui.horizontal_wrapped(|ui| {
                    for &child in children {
                        let child = graph.get(child);
                        if ui.link(&child.name).clicked() {
                            action = BioAction::Navigate(child.id.clone());
                        }
                    }
                });
                ui.add_space(8.0);
            }

            // Källor
            if !member.sources.is_empty() {
                ui.label(RichText::new("Källor").strong());
                for source in &member.sources {
                    match &source.url {
                        Some(url) => {
                            ui.hyperlink_to(format!("{} {}", Icons::LINK, source.label), url);
                        }
                        None => {
                            ui.label(format!("• {}", source.label));
                        }
                    }
                }
            }
        });

        action
    }
}
