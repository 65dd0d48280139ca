use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::services::family_tree::LayoutMetrics;
use crate::ui::viewport::DEFAULT_WHEEL_ZOOM_INTENSITY;

// ============================================================
// Träd
// ============================================================

/// Nodmått för vyportar upp till en viss bredd
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBreakpoint {
    /// None = gäller alla bredder (sista intervallet)
    pub max_viewport_width: Option<f32>,
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl LayoutBreakpoint {
    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            node_width: self.node_width,
            node_height: self.node_height,
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
        }
    }

    fn covers(&self, viewport_width: f32) -> bool {
        self.max_viewport_width
            .map_or(true, |max| viewport_width <= max)
    }
}

fn default_breakpoints() -> Vec<LayoutBreakpoint> {
    vec![
        LayoutBreakpoint {
            max_viewport_width: Some(768.0),
            node_width: 150.0,
            node_height: 90.0,
            horizontal_spacing: 24.0,
            vertical_spacing: 80.0,
        },
        LayoutBreakpoint {
            max_viewport_width: None,
            node_width: 200.0,
            node_height: 100.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 120.0,
        },
    ]
}

/// Inställningar för släktträdsvyn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Trädets rot
    pub root_id: String,
    /// Nod som centreras vid första laddningen. Tom sträng i filen = ingen.
    #[serde(
        serialize_with = "serialize_optional_id",
        deserialize_with = "deserialize_optional_id"
    )]
    pub default_focus_id: Option<String>,
    /// Expanderade vid start
    pub initially_expanded: Vec<String>,
    pub wheel_zoom_intensity: f32,
    /// Vyportar smalare än detta räknas som kompakta
    pub compact_viewport_width: f32,
    /// Högsta startskala på kompakta vyportar. 0 i filen = inget tak.
    #[serde(
        serialize_with = "serialize_optional_scale",
        deserialize_with = "deserialize_optional_scale"
    )]
    pub compact_initial_scale: Option<f32>,
    pub breakpoints: Vec<LayoutBreakpoint>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            root_id: "adnan".into(),
            default_focus_id: Some("prophet".into()),
            initially_expanded: vec!["adnan".into()],
            wheel_zoom_intensity: DEFAULT_WHEEL_ZOOM_INTENSITY,
            compact_viewport_width: 768.0,
            compact_initial_scale: Some(0.8),
            breakpoints: default_breakpoints(),
        }
    }
}

// TOML saknar null; None skrivs som tom sträng respektive 0 så att ett
// avstängt värde inte ersätts av standardvärdet vid nästa laddning.

fn serialize_optional_id<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn serialize_optional_scale<S>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f32(value.unwrap_or(0.0))
}

fn deserialize_optional_scale<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    Ok((value.is_finite() && value > 0.0).then_some(value))
}

impl TreeSettings {
    /// Mått för aktuell vyportbredd. Första intervall som täcker bredden vinner.
    pub fn metrics_for(&self, viewport_width: f32) -> LayoutMetrics {
        self.breakpoints
            .iter()
            .find(|bp| bp.covers(viewport_width))
            .or_else(|| self.breakpoints.last())
            .map(LayoutBreakpoint::metrics)
            .unwrap_or_default()
    }

    /// Startskalans tak för en vyport av given bredd, om något
    pub fn initial_scale_cap(&self, viewport_width: f32) -> Option<f32> {
        if viewport_width < self.compact_viewport_width {
            self.compact_initial_scale
        } else {
            None
        }
    }
}

// ============================================================
// Kortkommandon
// ============================================================

/// Bindbar åtgärd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    ZoomIn,
    ZoomOut,
    ResetView,
    FocusSearch,
    ToggleDarkMode,
    CloseBio,
}

impl ShortcutAction {
    pub const ALL: &'static [Self] = &[
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ResetView,
        Self::FocusSearch,
        Self::ToggleDarkMode,
        Self::CloseBio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ZoomIn => "Zooma in",
            Self::ZoomOut => "Zooma ut",
            Self::ResetView => "Återställ vy",
            Self::FocusSearch => "Sök",
            Self::ToggleDarkMode => "Mörkt/ljust läge",
            Self::CloseBio => "Stäng biografi",
        }
    }

    fn to_key(&self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::ResetView => "reset_view",
            Self::FocusSearch => "focus_search",
            Self::ToggleDarkMode => "toggle_dark_mode",
            Self::CloseBio => "close_bio",
        }
    }

    fn from_key(s: &str) -> Option<Self> {
        match s {
            "zoom_in" => Some(Self::ZoomIn),
            "zoom_out" => Some(Self::ZoomOut),
            "reset_view" => Some(Self::ResetView),
            "focus_search" => Some(Self::FocusSearch),
            "toggle_dark_mode" => Some(Self::ToggleDarkMode),
            "close_bio" => Some(Self::CloseBio),
            _ => None,
        }
    }
}

/// Modifierare för kortkommando
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutModifiers {
    /// Ctrl (Linux/Windows) eller Cmd (macOS)
    pub ctrl_or_cmd: bool,
    pub shift: bool,
    pub alt: bool,
}

/// En tangentkombination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardShortcut {
    pub key: egui::Key,
    pub modifiers: ShortcutModifiers,
}

impl KeyboardShortcut {
    pub fn new(key: egui::Key, ctrl_or_cmd: bool, shift: bool, alt: bool) -> Self {
        Self {
            key,
            modifiers: ShortcutModifiers { ctrl_or_cmd, shift, alt },
        }
    }

    /// Visningstext, t.ex. "Ctrl+Plus" eller "Cmd+Plus"
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.ctrl_or_cmd {
            if cfg!(target_os = "macos") {
                parts.push("Cmd");
            } else {
                parts.push("Ctrl");
            }
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    /// Sparformat, alltid "Ctrl" oavsett plattform
    fn to_string_canonical(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.ctrl_or_cmd {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    fn from_str(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(|p| p.trim()).collect();
        let (key_name, modifier_parts) = parts.split_last()?;

        let mut ctrl_or_cmd = false;
        let mut shift = false;
        let mut alt = false;
        for &part in modifier_parts {
            match part {
                "Ctrl" | "Cmd" => ctrl_or_cmd = true,
                "Shift" => shift = true,
                "Alt" => alt = true,
                _ => return None,
            }
        }

        let key = egui::Key::from_name(key_name)?;
        Some(Self::new(key, ctrl_or_cmd, shift, alt))
    }

    /// Matchar genvägen egui-modifierare och tangent?
    pub fn matches(&self, key: egui::Key, modifiers: &egui::Modifiers) -> bool {
        self.key == key
            && self.modifiers.ctrl_or_cmd == modifiers.command
            && self.modifiers.shift == modifiers.shift
            && self.modifiers.alt == modifiers.alt
    }
}

pub type ShortcutMap = HashMap<ShortcutAction, KeyboardShortcut>;

/// Standard-genvägar
pub fn default_shortcuts() -> ShortcutMap {
    let mut m = ShortcutMap::new();
    m.insert(ShortcutAction::ZoomIn, KeyboardShortcut::new(egui::Key::Plus, true, false, false));
    m.insert(ShortcutAction::ZoomOut, KeyboardShortcut::new(egui::Key::Minus, true, false, false));
    m.insert(ShortcutAction::ResetView, KeyboardShortcut::new(egui::Key::Num0, true, false, false));
    m.insert(ShortcutAction::FocusSearch, KeyboardShortcut::new(egui::Key::F, true, false, false));
    m.insert(ShortcutAction::ToggleDarkMode, KeyboardShortcut::new(egui::Key::D, true, false, false));
    m.insert(ShortcutAction::CloseBio, KeyboardShortcut::new(egui::Key::Escape, false, false, false));
    m
}

// ============================================================
// Applikation
// ============================================================

fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("se", "ansab", "Ansab").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Användarinställningar (settings.toml)
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub window_width: f32,
    pub window_height: f32,
    pub shortcuts: ShortcutMap,
    pub tree: TreeSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            window_width: 1280.0,
            window_height: 800.0,
            shortcuts: default_shortcuts(),
            tree: TreeSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn config_path() -> PathBuf {
        config_dir()
            .map(|dir| dir.join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Läs från fil; saknad eller trasig fil ger standardvärden
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Kunde inte läsa {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Serialize for AppSettings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AppSettings", 5)?;
        state.serialize_field("dark_mode", &self.dark_mode)?;
        state.serialize_field("window_width", &self.window_width)?;
        state.serialize_field("window_height", &self.window_height)?;

        // Genvägar som HashMap<String, String>
        let shortcuts_map: HashMap<String, String> = self
            .shortcuts
            .iter()
            .map(|(action, shortcut)| {
                (action.to_key().to_string(), shortcut.to_string_canonical())
            })
            .collect();
        state.serialize_field("shortcuts", &shortcuts_map)?;
        state.serialize_field("tree", &self.tree)?;

        state.end()
    }
}

impl<'de> Deserialize<'de> for AppSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct AppSettingsHelper {
            dark_mode: Option<bool>,
            window_width: Option<f32>,
            window_height: Option<f32>,
            shortcuts: Option<HashMap<String, String>>,
            tree: Option<TreeSettings>,
        }

        let helper = AppSettingsHelper::deserialize(deserializer)?;

        // Börja med defaults, skriv över med sparade
        let mut shortcuts = default_shortcuts();
        if let Some(saved) = helper.shortcuts {
            for (key, value) in saved {
                if let Some(action) = ShortcutAction::from_key(&key) {
                    if let Some(shortcut) = KeyboardShortcut::from_str(&value) {
                        shortcuts.insert(action, shortcut);
                    }
                }
            }
        }

        Ok(AppSettings {
            dark_mode: helper.dark_mode.unwrap_or(false),
            window_width: helper.window_width.unwrap_or(1280.0),
            window_height: helper.window_height.unwrap_or(800.0),
            shortcuts,
            tree: helper.tree.unwrap_or_default(),
        })
    }
}
