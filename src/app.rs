//! Huvudapplikation för Ansab

use eframe::egui;
use std::sync::Arc;

use crate::db::Database;
use crate::models::config::{AppSettings, ShortcutAction};
use crate::services::{ImportMode, MemberImporter};
use crate::ui::{
    modals::ConfirmDialog,
    shortcuts::ShortcutManager,
    state::{AppState, ConfirmAction, StatusType},
    theme::{configure_style, Colors, Icons},
    views::FamilyTreeView,
    widgets::{BioAction, BioPanel},
};
use crate::utils::path::get_database_path;

/// Huvudapplikation
pub struct AnsabApp {
    db: Arc<Database>,
    state: AppState,
    app_settings: AppSettings,
    shortcut_manager: ShortcutManager,
    family_tree: FamilyTreeView,

    // Intern
    style_initialized: bool,
    window_size: Option<egui::Vec2>,
}

impl AnsabApp {
    /// Skapa ny applikation
    pub fn new(cc: &eframe::CreationContext<'_>, app_settings: AppSettings) -> anyhow::Result<Self> {
        ShortcutManager::install(&cc.egui_ctx);
        let shortcut_manager = ShortcutManager::new(app_settings.shortcuts.clone());

        let mut state = AppState::new();
        state.dark_mode = app_settings.dark_mode;

        // Öppna databas
        let db_path = get_database_path();
        tracing::info!("Öppnar databas: {:?}", db_path);

        let db = match Database::open(&db_path) {
            Ok(db) => db,
            Err(e) => {
                tracing::error!("Kunde inte öppna databas: {}", e);
                state.show_error("Databasen kunde inte öppnas, ändringar sparas inte");
                // Fallback så att trädet ändå kan visas
                Database::open_in_memory()?
            }
        };

        let mut app = Self {
            db: Arc::new(db),
            state,
            family_tree: FamilyTreeView::new(&app_settings.tree),
            app_settings,
            shortcut_manager,
            style_initialized: false,
            window_size: None,
        };
        app.reload_members();
        Ok(app)
    }

    /// Läs om alla medlemmar från databasen
    fn reload_members(&mut self) {
        match self.db.members().find_all() {
            Ok(members) => {
                tracing::info!("Laddade {} medlemmar", members.len());
                self.family_tree.set_members(members);
            }
            Err(e) => {
                tracing::error!("Kunde inte läsa medlemmar: {}", e);
                self.state.show_error(&format!("Kunde inte läsa medlemmar: {}", e));
            }
        }
    }

    fn import_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };

        match MemberImporter::new(&self.db).import_file(&path, ImportMode::Append) {
            Ok(result) => {
                for warning in &result.warnings {
                    tracing::warn!("{}", warning);
                }
                if result.warnings.len() > result.skipped {
                    self.state.show_warning(&format!(
                        "{}, {} varningar",
                        result.summary(),
                        result.warnings.len()
                    ));
                } else {
                    self.state.show_success(&result.summary());
                }
                self.state.members_changed = true;
            }
            Err(e) => {
                tracing::error!("Import misslyckades: {}", e);
                self.state.show_error(&format!("Kunde inte importera: {}", e));
            }
        }
    }

    fn replace_tree(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.state.show_confirm(
                &format!(
                    "Hela trädet ersätts med innehållet i {}. Fortsätta?",
                    crate::utils::path::display_path(&path)
                ),
                ConfirmAction::ReplaceTree(path),
            );
        }
    }

    fn toggle_dark_mode(&mut self, ctx: &egui::Context) {
        self.state.dark_mode = !self.state.dark_mode;
        configure_style(ctx, self.state.dark_mode);
        self.app_settings.dark_mode = self.state.dark_mode;
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = self.app_settings.save() {
            tracing::warn!("Kunde inte spara inställningar: {}", e);
        }
    }

    /// Hantera en genvägsåtgärd
    fn handle_shortcut_action(&mut self, action: ShortcutAction, ctx: &egui::Context) {
        // Med dialogen öppen stänger Escape den, inget annat
        if self.state.show_confirm_dialog {
            if action == ShortcutAction::CloseBio {
                self.state.close_confirm();
            }
            return;
        }

        match action {
            ShortcutAction::ZoomIn => self.family_tree.zoom_in(),
            ShortcutAction::ZoomOut => self.family_tree.zoom_out(),
            ShortcutAction::ResetView => self.family_tree.reset_view(),
            ShortcutAction::FocusSearch => self.state.focus_search = true,
            ShortcutAction::ToggleDarkMode => self.toggle_dark_mode(ctx),
            ShortcutAction::CloseBio => self.state.close_bio(),
        }
    }

    fn hint(&self, action: ShortcutAction) -> String {
        match self.shortcut_manager.shortcut_hint(action) {
            Some(hint) => format!("{} ({})", action.label(), hint),
            None => action.label().to_string(),
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new(format!("{} Ansab", Icons::TREE)).color(Colors::GOLD));
                ui.separator();

                if ui
                    .button(format!("{} Importera", Icons::IMPORT))
                    .on_hover_text("Lägg till medlemmar från en JSON-fil")
                    .clicked()
                {
                    self.import_file();
                }
                if ui
                    .button("Ersätt träd…")
                    .on_hover_text("Töm trädet och importera en JSON-fil")
                    .clicked()
                {
                    self.replace_tree();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_icon = if self.state.dark_mode { Icons::MOON } else { Icons::SUN };
                    if ui
                        .button(mode_icon)
                        .on_hover_text(self.hint(ShortcutAction::ToggleDarkMode))
                        .clicked()
                    {
                        self.toggle_dark_mode(ctx);
                    }

                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .weak(),
                    );
                });
            });
        });
    }

    fn show_bio(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.selected_member_id.clone() else {
            return;
        };
        let Some(member) = self.family_tree.graph().member(&id) else {
            // Medlemmen försvann vid omladdning
            self.state.close_bio();
            return;
        };

        match BioPanel::show_window(ctx, member, self.family_tree.graph()) {
            BioAction::None => {}
            BioAction::Close => self.state.close_bio(),
            BioAction::Navigate(target) => self.state.navigate_to_member(&target),
        }
    }

    /// Spara fönsterstorleken när fönstret stängs
    fn track_window(&mut self, ctx: &egui::Context) {
        let (inner, close_requested) =
            ctx.input(|i| (i.viewport().inner_rect, i.viewport().close_requested()));
        if let Some(rect) = inner {
            self.window_size = Some(rect.size());
        }

        if close_requested {
            if let Some(size) = self.window_size {
                self.app_settings.window_width = size.x;
                self.app_settings.window_height = size.y;
                self.save_settings();
            }
        }
    }
}

impl eframe::App for AnsabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_initialized {
            configure_style(ctx, self.state.dark_mode);
            self.style_initialized = true;
        }

        self.state.clear_old_status();
        self.track_window(ctx);

        if self.state.members_changed {
            self.state.members_changed = false;
            self.reload_members();
        }

        // Kortkommandon
        if let Some(action) = self.shortcut_manager.check(ctx) {
            self.handle_shortcut_action(action, ctx);
        }

        self.show_top_bar(ctx);

        // Statusbar; visas alltid så att ritytans höjd inte ändras med meddelandena
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                if let Some(ref status) = self.state.status_message {
                    let color = match status.status_type {
                        StatusType::Success => Colors::SUCCESS,
                        StatusType::Error => Colors::ERROR,
                        StatusType::Warning => Colors::WARNING,
                        StatusType::Info => Colors::INFO,
                    };
                    ui.colored_label(color, &status.text);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.family_tree.show(ui, &mut self.state);
        });

        // Biografin ligger ovanpå trädet
        self.show_bio(ctx);

        if self.state.show_confirm_dialog {
            if let Some(true) = ConfirmDialog::show(ctx, &mut self.state, &self.db) {
                tracing::debug!("Bekräftad åtgärd utförd");
            }
        }
    }
}
