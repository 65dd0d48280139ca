use egui::{Color32, FontFamily, FontId, TextStyle, Visuals};

/// Konfigurera applikationens utseende
pub fn configure_style(ctx: &egui::Context, dark_mode: bool) {
    let mut style = (*ctx.style()).clone();

    // Typsnitt
    style.text_styles = [
        (TextStyle::Heading, FontId::new(24.0, FontFamily::Proportional)),
        (TextStyle::Name("heading2".into()), FontId::new(20.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    style.visuals = if dark_mode { dark_visuals() } else { light_visuals() };

    ctx.set_style(style);
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    // Nattblå bakgrund
    visuals.panel_fill = Color32::from_rgb(13, 27, 42);
    visuals.window_fill = Color32::from_rgb(27, 38, 59);
    visuals.extreme_bg_color = Color32::from_rgb(9, 19, 30);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(27, 38, 59);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(27, 38, 59);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(65, 90, 119);
    visuals.widgets.active.bg_fill = Color32::from_rgb(65, 90, 119);

    visuals.selection.bg_fill = Color32::from_rgb(120, 96, 24);
    visuals.hyperlink_color = Colors::GOLD_BRIGHT;

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    // Pergament
    visuals.panel_fill = Color32::from_rgb(250, 248, 240);
    visuals.window_fill = Color32::from_rgb(255, 253, 247);
    visuals.extreme_bg_color = Color32::from_rgb(243, 238, 222);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(245, 241, 227);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(245, 241, 227);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(232, 224, 200);
    visuals.widgets.active.bg_fill = Color32::from_rgb(220, 208, 170);

    visuals.selection.bg_fill = Color32::from_rgb(232, 214, 150);
    visuals.hyperlink_color = Colors::GOLD_DARK;

    visuals
}

/// Färgpalett för applikationen
pub struct Colors;

impl Colors {
    // Guld
    pub const GOLD: Color32 = Color32::from_rgb(201, 162, 39);
    pub const GOLD_BRIGHT: Color32 = Color32::from_rgb(219, 180, 44);
    pub const GOLD_DARK: Color32 = Color32::from_rgb(166, 133, 29);

    // Status
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
    pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);

    pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);
}

/// Färger för trädets noder och linjer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePalette {
    pub node_bg: Color32,
    pub node_border: Color32,
    pub node_border_hover: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub tagline: Color32,
    pub button_bg: Color32,
    pub button_bg_hover: Color32,
    pub connector: Color32,
    pub shadow: Color32,
}

impl TreePalette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                node_bg: Color32::from_rgb(27, 38, 59),
                node_border: Colors::GOLD,
                node_border_hover: Colors::GOLD_BRIGHT,
                text: Color32::from_rgb(232, 224, 200),
                text_muted: Color32::from_rgb(166, 154, 128),
                tagline: Color32::from_rgb(184, 168, 122),
                button_bg: Color32::from_rgb(13, 27, 42),
                button_bg_hover: Color32::from_rgb(65, 90, 119),
                connector: Colors::GOLD,
                shadow: Color32::from_black_alpha(90),
            }
        } else {
            Self {
                node_bg: Color32::from_rgb(250, 248, 240),
                node_border: Colors::GOLD,
                node_border_hover: Colors::GOLD_BRIGHT,
                text: Color32::from_rgb(44, 36, 22),
                text_muted: Color32::from_rgb(92, 80, 58),
                tagline: Color32::from_rgb(107, 91, 61),
                button_bg: Color32::from_rgb(245, 241, 227),
                button_bg_hover: Color32::from_rgb(232, 224, 200),
                connector: Colors::GOLD_DARK,
                shadow: Color32::from_black_alpha(26),
            }
        }
    }
}

/// Ikoner (Unicode)
pub struct Icons;

impl Icons {
    pub const TREE: &'static str = "🌳";
    pub const SEARCH: &'static str = "🔍";
    pub const IMPORT: &'static str = "📥";
    pub const LINK: &'static str = "🔗";
    pub const CLOSE: &'static str = "✖";
    pub const ZOOM_IN: &'static str = "➕";
    pub const ZOOM_OUT: &'static str = "➖";
    pub const RESET: &'static str = "⟲";
    pub const MOON: &'static str = "🌙";
    pub const SUN: &'static str = "☀";
}
