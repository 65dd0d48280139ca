use std::path::PathBuf;

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Medlem vars biografi visas
    pub selected_member_id: Option<String>,

    /// Navigering begärd utanför trädvyn (t.ex. från biografipanelen)
    pub navigate_to: Option<String>,

    /// Sökfältet ska få fokus nästa ruta
    pub focus_search: bool,

    /// Databasen ändrad, medlemslistan behöver laddas om
    pub members_changed: bool,

    /// Visar bekräftelsedialog
    pub show_confirm_dialog: bool,
    pub confirm_dialog_message: String,
    pub confirm_dialog_action: Option<ConfirmAction>,

    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,

    /// Dark mode
    pub dark_mode: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Öppna biografin och be trädet centrera på medlemmen
    pub fn navigate_to_member(&mut self, id: &str) {
        self.selected_member_id = Some(id.to_string());
        self.navigate_to = Some(id.to_string());
    }

    pub fn close_bio(&mut self) {
        self.selected_member_id = None;
    }

    /// Visa bekräftelsedialog
    pub fn show_confirm(&mut self, message: &str, action: ConfirmAction) {
        self.confirm_dialog_message = message.to_string();
        self.confirm_dialog_action = Some(action);
        self.show_confirm_dialog = true;
    }

    /// Stäng bekräftelsedialog
    pub fn close_confirm(&mut self) {
        self.show_confirm_dialog = false;
        self.confirm_dialog_action = None;
    }

    /// Visa statusmeddelande
    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
            created_at: std::time::Instant::now(),
        });
    }

    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.show_status(message, StatusType::Warning);
    }

    /// Rensa statusmeddelande om det är för gammalt
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created_at.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}

/// Typ av bekräftelseåtgärd
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Töm trädet och importera filen
    ReplaceTree(PathBuf),
}

/// Statusmeddelande
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
    Info,
    Warning,
}
