//! Översätter egui-händelser till vyportens gester
//!
//! Händelser tas råa ur `InputState::events` så att pekskärm, mushjul och
//! nypning hanteras likadant oavsett plattform.

use std::collections::BTreeMap;

use egui::{Event, MouseWheelUnit, PointerButton, Pos2, Rect, TouchPhase};

use crate::ui::viewport::ViewportController;

/// Pixlar per scrollrad när plattformen rapporterar rader
pub const LINE_HEIGHT_PX: f32 = 40.0;

/// Gesttillstånd för trädets rityta
#[derive(Debug, Default, Clone)]
pub struct CanvasInput {
    touches: BTreeMap<u64, Pos2>,
    mouse_down: bool,
}

impl CanvasInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Mata in en rutas händelser. `canvas` är ritytan i skärmkoordinater och
    /// `hover_pos` pekarens senaste position, None när pekaren inte är över
    /// ritytan (utanför eller skymd av ett fönster). Returnerar true om något
    /// påverkade vyporten.
    pub fn handle_events(
        &mut self,
        events: &[Event],
        canvas: Rect,
        hover_pos: Option<Pos2>,
        viewport: &mut ViewportController,
    ) -> bool {
        let mut handled = false;
        for event in events {
            handled |= self.handle_event(event, canvas, hover_pos, viewport);
        }
        handled
    }

    fn handle_event(
        &mut self,
        event: &Event,
        canvas: Rect,
        hover_pos: Option<Pos2>,
        viewport: &mut ViewportController,
    ) -> bool {
        let local = |pos: Pos2| (pos - canvas.min).to_pos2();

        match event {
            Event::Touch { id, phase, pos, .. } => {
                match phase {
                    TouchPhase::Start => {
                        if !canvas.contains(*pos) {
                            return false;
                        }
                        self.touches.insert(id.0, local(*pos));
                        viewport.touch_start(&self.touch_points());
                    }
                    TouchPhase::Move => {
                        let Some(slot) = self.touches.get_mut(&id.0) else {
                            return false;
                        };
                        *slot = local(*pos);
                        viewport.touch_move(&self.touch_points());
                    }
                    TouchPhase::End | TouchPhase::Cancel => {
                        if self.touches.remove(&id.0).is_none() {
                            return false;
                        }
                        viewport.touch_end(&self.touch_points());
                    }
                }
                true
            }

            // Pekskärmar emulerar även mus; ignorera den medan fingrar ligger an
            _ if !self.touches.is_empty() => false,

            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => {
                if *pressed {
                    if !canvas.contains(*pos) || hover_pos.is_none() {
                        return false;
                    }
                    self.mouse_down = true;
                    viewport.pointer_down(local(*pos));
                    true
                } else if self.mouse_down {
                    self.mouse_down = false;
                    viewport.pointer_up();
                    true
                } else {
                    false
                }
            }

            // Panoreringen följer pekaren bara inom ritytan
            Event::PointerMoved(pos) if self.mouse_down => {
                if canvas.contains(*pos) {
                    viewport.pointer_move(local(*pos));
                } else {
                    self.mouse_down = false;
                    viewport.pointer_leave();
                }
                true
            }

            Event::PointerGone if self.mouse_down => {
                self.mouse_down = false;
                viewport.pointer_leave();
                true
            }

            Event::MouseWheel {
                unit,
                delta,
                modifiers,
            } => {
                let Some(pointer) = hover_pos.filter(|p| canvas.contains(*p)) else {
                    return false;
                };
                let pixels = match unit {
                    MouseWheelUnit::Point => *delta,
                    MouseWheelUnit::Line => *delta * LINE_HEIGHT_PX,
                    MouseWheelUnit::Page => *delta * canvas.height(),
                };
                // egui: positiv y = innehållet flyttas nedåt; vyporten räknar tvärtom
                viewport.wheel(
                    local(pointer),
                    -pixels,
                    modifiers.command || modifiers.ctrl,
                );
                true
            }

            Event::Zoom(factor) => {
                let Some(pointer) = hover_pos.filter(|p| canvas.contains(*p)) else {
                    return false;
                };
                viewport.zoom_about(local(pointer), *factor);
                true
            }

            _ => false,
        }
    }

    fn touch_points(&self) -> Vec<Pos2> {
        self.touches.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, TouchDeviceId, TouchId, Vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(1000.0, 800.0))
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: Pos2::new(x, y),
            force: None,
        }
    }

    fn button(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: Pos2::new(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn wheel(delta_y: f32, modifiers: Modifiers) -> Event {
        Event::MouseWheel {
            unit: MouseWheelUnit::Point,
            delta: Vec2::new(0.0, delta_y),
            modifiers,
        }
    }

    #[test]
    fn test_mouse_drag_pans() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let events = [
            button(200.0, 150.0, true),
            Event::PointerMoved(Pos2::new(260.0, 170.0)),
            button(260.0, 170.0, false),
            Event::PointerMoved(Pos2::new(400.0, 400.0)),
        ];
        let hover = Some(Pos2::new(200.0, 150.0));
        assert!(input.handle_events(&events, canvas(), hover, &mut viewport));
        assert_eq!(viewport.translate(), Vec2::new(60.0, 20.0));
        assert!(!input.is_mouse_down());
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let events = [button(10.0, 10.0, true), Event::PointerMoved(Pos2::new(300.0, 300.0))];
        assert!(!input.handle_events(&events, canvas(), None, &mut viewport));
        assert_eq!(viewport.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_gone_ends_pan() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        input.handle_events(
            &[button(200.0, 150.0, true), Event::PointerGone],
            canvas(),
            Some(Pos2::new(200.0, 150.0)),
            &mut viewport,
        );
        assert!(!viewport.is_panning());
        assert!(!input.is_mouse_down());
    }

    #[test]
    fn test_drag_leaving_canvas_ends_pan() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let events = [
            button(200.0, 150.0, true),
            Event::PointerMoved(Pos2::new(240.0, 160.0)),
            // Upp på verktygsraden ovanför ritytan
            Event::PointerMoved(Pos2::new(240.0, 20.0)),
            Event::PointerMoved(Pos2::new(600.0, 400.0)),
        ];
        input.handle_events(&events, canvas(), Some(Pos2::new(200.0, 150.0)), &mut viewport);
        assert!(!input.is_mouse_down());
        assert!(!viewport.is_panning());
        assert_eq!(viewport.translate(), Vec2::new(40.0, 10.0));
    }

    #[test]
    fn test_press_on_covering_window_is_ignored() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        // Inom ritytan men pekaren är över ett annat lager
        let events = [button(900.0, 300.0, true), Event::PointerMoved(Pos2::new(700.0, 300.0))];
        assert!(!input.handle_events(&events, canvas(), None, &mut viewport));
        assert!(!input.is_mouse_down());
        assert_eq!(viewport.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_wheel_without_modifier_pans() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());
        let hover = Some(Pos2::new(500.0, 400.0));

        // egui: negativ y = scroll nedåt, vyn följer med uppåt
        input.handle_events(&[wheel(-30.0, Modifiers::NONE)], canvas(), hover, &mut viewport);
        assert_eq!(viewport.translate(), Vec2::new(0.0, -30.0));
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn test_wheel_lines_are_scaled() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());
        let hover = Some(Pos2::new(500.0, 400.0));

        let event = Event::MouseWheel {
            unit: MouseWheelUnit::Line,
            delta: Vec2::new(0.0, 1.0),
            modifiers: Modifiers::NONE,
        };
        input.handle_events(&[event], canvas(), hover, &mut viewport);
        assert_eq!(viewport.translate(), Vec2::new(0.0, LINE_HEIGHT_PX));
    }

    #[test]
    fn test_ctrl_wheel_zooms_at_cursor() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());
        let hover = Pos2::new(400.0, 350.0);
        let local = Pos2::new(300.0, 300.0);
        let before = viewport.transform().screen_to_layout(local);

        input.handle_events(&[wheel(100.0, Modifiers::CTRL)], canvas(), Some(hover), &mut viewport);

        // Scroll uppåt i egui = zooma in
        assert!((viewport.scale() - 1.3).abs() < 1e-4);
        let after = viewport.transform().layout_to_screen(before);
        assert!((after - local).length() < 1e-3);
    }

    #[test]
    fn test_wheel_outside_canvas_is_ignored() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let handled = input.handle_events(
            &[wheel(100.0, Modifiers::CTRL)],
            canvas(),
            Some(Pos2::new(5.0, 5.0)),
            &mut viewport,
        );
        assert!(!handled);
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn test_zoom_event_scales_about_pointer() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        input.handle_events(
            &[Event::Zoom(2.0)],
            canvas(),
            Some(Pos2::new(100.0, 50.0)),
            &mut viewport,
        );
        assert_eq!(viewport.scale(), 2.0);
        // Ritytans hörn är fixpunkt
        assert_eq!(viewport.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_two_finger_pinch() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let events = [
            touch(1, TouchPhase::Start, 500.0, 450.0),
            touch(2, TouchPhase::Start, 600.0, 450.0),
            touch(2, TouchPhase::Move, 700.0, 450.0),
        ];
        input.handle_events(&events, canvas(), None, &mut viewport);
        assert_eq!(input.active_touches(), 2);
        assert!(viewport.is_pinching());
        assert!((viewport.scale() - 2.0).abs() < 1e-4);

        // Ett finger lyfts: resten fortsätter som panorering
        input.handle_events(
            &[touch(2, TouchPhase::End, 700.0, 450.0)],
            canvas(),
            None,
            &mut viewport,
        );
        assert!(viewport.is_panning());

        let before = viewport.translate();
        input.handle_events(
            &[touch(1, TouchPhase::Move, 520.0, 470.0)],
            canvas(),
            None,
            &mut viewport,
        );
        assert_eq!(viewport.translate(), before + Vec2::new(20.0, 20.0));

        input.handle_events(
            &[touch(1, TouchPhase::Cancel, 520.0, 470.0)],
            canvas(),
            None,
            &mut viewport,
        );
        assert_eq!(input.active_touches(), 0);
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_emulated_mouse_ignored_during_touch() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        let events = [
            touch(7, TouchPhase::Start, 300.0, 300.0),
            button(300.0, 300.0, true),
            Event::PointerMoved(Pos2::new(900.0, 900.0)),
        ];
        input.handle_events(&events, canvas(), None, &mut viewport);
        assert!(!input.is_mouse_down());
        assert_eq!(viewport.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_unknown_touch_move_is_ignored() {
        let mut input = CanvasInput::new();
        let mut viewport = ViewportController::new(canvas().size());

        assert!(!input.handle_events(
            &[touch(3, TouchPhase::Move, 300.0, 300.0)],
            canvas(),
            None,
            &mut viewport,
        ));
    }
}
