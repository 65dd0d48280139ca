use crate::models::config::{ShortcutAction, ShortcutMap};

/// Matchar tangentinmatning mot konfigurerade genvägar
pub struct ShortcutManager {
    shortcuts: ShortcutMap,
}

impl ShortcutManager {
    pub fn new(shortcuts: ShortcutMap) -> Self {
        Self { shortcuts }
    }

    /// Stäng av egui:s inbyggda Ctrl+/-/0-zoom; samma tangenter zoomar trädet
    pub fn install(ctx: &egui::Context) {
        ctx.options_mut(|o| o.zoom_with_keyboard = false);
    }

    /// Kolla alla genvägar mot aktuell input. En matchande tangent konsumeras.
    /// Returnerar None om ingen matchar.
    pub fn check(&self, ctx: &egui::Context) -> Option<ShortcutAction> {
        let text_focused = ctx.wants_keyboard_input();
        ctx.input_mut(|input| {
            let (action, key) = self.match_input(input, text_focused)?;
            let modifiers = input.modifiers;
            input.consume_key(modifiers, key);
            Some(action)
        })
    }

    fn match_input(
        &self,
        input: &egui::InputState,
        text_focused: bool,
    ) -> Option<(ShortcutAction, egui::Key)> {
        for (action, shortcut) in &self.shortcuts {
            if !input.key_pressed(shortcut.key) {
                continue;
            }
            if !shortcut.matches(shortcut.key, &input.modifiers) {
                continue;
            }

            // Textfält med fokus: bara genvägar med Ctrl/Cmd, och Escape
            if text_focused && !shortcut.modifiers.ctrl_or_cmd && shortcut.key != egui::Key::Escape {
                continue;
            }

            return Some((*action, shortcut.key));
        }
        None
    }

    /// Visningssträng för en åtgärds genväg (för tooltips)
    pub fn shortcut_hint(&self, action: ShortcutAction) -> Option<String> {
        self.shortcuts.get(&action).map(|s| s.display())
    }
}
