//! Vyportens transform och gesttillstånd (vila / panorering / nypning)
//!
//! Alla positioner är i vyportens lokala pixelkoordinater. Skärmpunkt =
//! layoutpunkt × skala + förskjutning.

use egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 4.0;
/// Faktor per zoomsteg (knappar och kortkommandon)
pub const ZOOM_STEP: f32 = 1.2;
pub const DEFAULT_WHEEL_ZOOM_INTENSITY: f32 = 0.003;
/// Fingeravstånd (px) under vilket en nypning inte skalar
pub const MIN_PINCH_DISTANCE: f32 = 4.0;

/// Begränsa skalan till [MIN_SCALE, MAX_SCALE]; icke-ändliga värden ger `fallback`
pub fn clamp_scale(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        fallback
    }
}

/// Skala och förskjutning för trädbehållaren
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn layout_to_screen(&self, point: Pos2) -> Pos2 {
        (point.to_vec2() * self.scale + self.translate).to_pos2()
    }

    pub fn screen_to_layout(&self, point: Pos2) -> Pos2 {
        ((point.to_vec2() - self.translate) / self.scale).to_pos2()
    }
}

/// Pågående gest
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// `anchor` = pekarens position minus förskjutningen vid start
    Panning { anchor: Vec2 },
    Pinching { start_distance: f32, start_scale: f32 },
}

/// Äger transformen och tolkar pekare, scroll och pekskärm
#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: ViewTransform,
    viewport_size: Vec2,
    gesture: Gesture,
    wheel_zoom_intensity: f32,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl ViewportController {
    pub fn new(viewport_size: Vec2) -> Self {
        Self {
            transform: ViewTransform::default(),
            viewport_size,
            gesture: Gesture::Idle,
            wheel_zoom_intensity: DEFAULT_WHEEL_ZOOM_INTENSITY,
        }
    }

    pub fn with_wheel_zoom_intensity(mut self, intensity: f32) -> Self {
        if intensity.is_finite() && intensity > 0.0 {
            self.wheel_zoom_intensity = intensity;
        }
        self
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.transform.translate
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.gesture, Gesture::Pinching { .. })
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    pub fn viewport_center(&self) -> Pos2 {
        (self.viewport_size / 2.0).to_pos2()
    }

    /// Uppdatera vyportens storlek. Returnerar true om den ändrades.
    pub fn set_viewport_size(&mut self, size: Vec2) -> bool {
        if !size.x.is_finite() || !size.y.is_finite() || size.x < 0.0 || size.y < 0.0 {
            return false;
        }
        if size == self.viewport_size {
            return false;
        }
        self.viewport_size = size;
        true
    }

    // ------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        let focus = self.viewport_center();
        self.zoom_about(focus, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        let focus = self.viewport_center();
        self.zoom_about(focus, 1.0 / ZOOM_STEP);
    }

    /// Multiplicera skalan med `factor` med `focus` stillastående på skärmen
    pub fn zoom_about(&mut self, focus: Pos2, factor: f32) {
        if !is_finite_pos(focus) || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_scale = clamp_scale(self.transform.scale * factor, self.transform.scale);
        self.set_scale_about(focus, new_scale);
    }

    /// Skala 1. Förskjutningen lämnas orörd; centreringen görs efter nästa
    /// rendering av navigeringen.
    pub fn reset_zoom(&mut self) {
        self.transform.scale = 1.0;
    }

    /// Sänk startskalan till högst `max_scale` (kompakta skärmar)
    pub fn cap_scale(&mut self, max_scale: f32) {
        let scale = self.transform.scale;
        self.transform.scale = clamp_scale(scale.min(max_scale), scale);
    }

    /// Placera layoutpunkten `point` i vyportens mitt
    pub fn center_on(&mut self, point: Pos2) {
        if !is_finite_pos(point) {
            return;
        }
        self.transform.translate =
            self.viewport_center().to_vec2() - point.to_vec2() * self.transform.scale;
    }

    fn set_scale_about(&mut self, focus: Pos2, new_scale: f32) {
        let layout_point = self.transform.screen_to_layout(focus);
        self.transform.scale = new_scale;
        self.transform.translate = focus.to_vec2() - layout_point.to_vec2() * new_scale;
    }

    // ------------------------------------------------------------
    // Mus
    // ------------------------------------------------------------

    pub fn pointer_down(&mut self, pos: Pos2) {
        if !is_finite_pos(pos) {
            return;
        }
        self.begin_pan(pos);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        if !is_finite_pos(pos) {
            return;
        }
        if let Gesture::Panning { anchor } = self.gesture {
            self.transform.translate = pos.to_vec2() - anchor;
        }
    }

    pub fn pointer_up(&mut self) {
        if self.is_panning() {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Scroll med webbläsarens teckenkonvention (positiv `delta.y` = nedåt).
    /// Med zoommodifierare blir `delta.y` en kontinuerlig zoom kring `pos`,
    /// annars panoreras vyn.
    pub fn wheel(&mut self, pos: Pos2, delta: Vec2, zoom_modifier: bool) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        if zoom_modifier {
            if !is_finite_pos(pos) {
                return;
            }
            let candidate = self.transform.scale * (1.0 - delta.y * self.wheel_zoom_intensity);
            let new_scale = clamp_scale(candidate, self.transform.scale);
            self.set_scale_about(pos, new_scale);
        } else {
            self.transform.translate -= delta;
        }
    }

    // ------------------------------------------------------------
    // Pekskärm. `touches` är alla aktiva beröringar efter händelsen.
    // ------------------------------------------------------------

    pub fn touch_start(&mut self, touches: &[Pos2]) {
        if !touches.iter().copied().all(is_finite_pos) {
            return;
        }
        match touches {
            [] => {}
            [single] => self.begin_pan(*single),
            [a, b, ..] => self.begin_pinch(*a, *b),
        }
    }

    pub fn touch_move(&mut self, touches: &[Pos2]) {
        if !touches.iter().copied().all(is_finite_pos) {
            return;
        }
        match (touches, self.gesture) {
            ([single], Gesture::Panning { anchor }) => {
                self.transform.translate = single.to_vec2() - anchor;
            }
            ([a, b, ..], Gesture::Pinching { .. }) => self.pinch_to(*a, *b),
            ([a, b, ..], _) => self.begin_pinch(*a, *b),
            _ => {}
        }
    }

    /// Beröring avslutad eller avbruten
    pub fn touch_end(&mut self, remaining: &[Pos2]) {
        if !remaining.iter().copied().all(is_finite_pos) {
            self.gesture = Gesture::Idle;
            return;
        }
        match remaining {
            [] => self.gesture = Gesture::Idle,
            [single] => self.begin_pan(*single),
            [a, b, ..] => self.begin_pinch(*a, *b),
        }
    }

    fn begin_pan(&mut self, pos: Pos2) {
        self.gesture = Gesture::Panning {
            anchor: pos.to_vec2() - self.transform.translate,
        };
    }

    fn begin_pinch(&mut self, a: Pos2, b: Pos2) {
        self.gesture = Gesture::Pinching {
            start_distance: a.distance(b),
            start_scale: self.transform.scale,
        };
    }

    fn pinch_to(&mut self, a: Pos2, b: Pos2) {
        let Gesture::Pinching {
            start_distance,
            start_scale,
        } = self.gesture
        else {
            return;
        };

        let distance = a.distance(b);
        if start_distance < MIN_PINCH_DISTANCE {
            // Fingrarna startade nästan på samma punkt: förankra om när de skiljts åt
            if distance >= MIN_PINCH_DISTANCE {
                self.begin_pinch(a, b);
            }
            return;
        }

        let midpoint = a.lerp(b, 0.5);
        let new_scale = clamp_scale(start_scale * (distance / start_distance), self.transform.scale);
        self.set_scale_about(midpoint, new_scale);
    }
}

fn is_finite_pos(pos: Pos2) -> bool {
    pos.x.is_finite() && pos.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn controller() -> ViewportController {
        ViewportController::new(Vec2::new(1000.0, 800.0))
    }

    fn assert_close(a: Pos2, b: Pos2) {
        assert!((a - b).length() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_initial_state() {
        let vp = controller();
        assert_eq!(vp.transform(), ViewTransform::default());
        assert_eq!(vp.gesture(), Gesture::Idle);
        assert_eq!(vp.viewport_center(), Pos2::new(500.0, 400.0));
    }

    #[test]
    fn test_zoom_in_keeps_viewport_center() {
        let mut vp = controller();
        let before = vp.transform().screen_to_layout(vp.viewport_center());
        assert_close(before, Pos2::new(500.0, 400.0));

        vp.zoom_in();

        assert!((vp.scale() - 1.2).abs() < 1e-6);
        assert_close(vp.transform().layout_to_screen(before), Pos2::new(500.0, 400.0));
    }

    #[test]
    fn test_zoom_out_keeps_center_after_pan() {
        let mut vp = controller();
        vp.wheel(Pos2::ZERO, Vec2::new(-130.0, 45.0), false);
        let before = vp.transform().screen_to_layout(vp.viewport_center());

        vp.zoom_out();

        assert!((vp.scale() - 1.0 / 1.2).abs() < 1e-6);
        assert_close(vp.transform().layout_to_screen(before), vp.viewport_center());
    }

    #[test]
    fn test_scale_clamped_under_repeated_zoom() {
        let mut vp = controller();
        for _ in 0..1000 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale(), MIN_SCALE);

        for _ in 0..1000 {
            vp.zoom_in();
        }
        assert_eq!(vp.scale(), MAX_SCALE);
        assert!(vp.translate().x.is_finite() && vp.translate().y.is_finite());
    }

    #[test]
    fn test_wheel_pans_without_modifier() {
        let mut vp = controller();
        vp.wheel(Pos2::new(10.0, 10.0), Vec2::new(15.0, -40.0), false);
        assert_eq!(vp.translate(), Vec2::new(-15.0, 40.0));
        assert_eq!(vp.scale(), 1.0);
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_point() {
        let mut vp = controller();
        let cursor = Pos2::new(230.0, 610.0);
        let under_cursor = vp.transform().screen_to_layout(cursor);

        vp.wheel(cursor, Vec2::new(0.0, -100.0), true);

        assert!((vp.scale() - 1.3).abs() < 1e-5);
        assert_close(vp.transform().layout_to_screen(under_cursor), cursor);
    }

    #[test]
    fn test_wheel_zoom_extreme_delta_is_clamped() {
        let mut vp = controller();
        vp.wheel(Pos2::new(1.0, 1.0), Vec2::new(0.0, 1.0e6), true);
        assert_eq!(vp.scale(), MIN_SCALE);
        vp.wheel(Pos2::new(1.0, 1.0), Vec2::new(0.0, -1.0e6), true);
        assert_eq!(vp.scale(), MAX_SCALE);
        vp.wheel(Pos2::new(1.0, 1.0), Vec2::new(0.0, f32::NAN), true);
        assert_eq!(vp.scale(), MAX_SCALE);
    }

    #[test]
    fn test_mouse_pan_uses_absolute_anchor() {
        let mut vp = controller();
        vp.pointer_down(Pos2::new(10.0, 10.0));
        assert!(vp.is_panning());

        vp.pointer_move(Pos2::new(60.0, 30.0));
        vp.pointer_move(Pos2::new(70.0, 50.0));
        assert_eq!(vp.translate(), Vec2::new(60.0, 40.0));

        vp.pointer_up();
        assert_eq!(vp.gesture(), Gesture::Idle);

        // Rörelse utan nedtryckt knapp påverkar inget
        vp.pointer_move(Pos2::new(500.0, 500.0));
        assert_eq!(vp.translate(), Vec2::new(60.0, 40.0));
    }

    #[test]
    fn test_pointer_down_while_panning_updates_anchor() {
        let mut vp = controller();
        vp.pointer_down(Pos2::new(0.0, 0.0));
        vp.pointer_move(Pos2::new(20.0, 0.0));
        vp.pointer_down(Pos2::new(100.0, 100.0));
        vp.pointer_move(Pos2::new(110.0, 100.0));
        assert_eq!(vp.translate(), Vec2::new(30.0, 0.0));

        vp.pointer_leave();
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_pinch_scales_about_midpoint() {
        let mut vp = controller();
        let a = Pos2::new(400.0, 400.0);
        let b = Pos2::new(500.0, 400.0);

        vp.touch_start(&[a]);
        assert!(vp.is_panning());
        vp.touch_start(&[a, b]);
        assert!(vp.is_pinching());

        let midpoint = Pos2::new(450.0, 400.0);
        let under_midpoint = vp.transform().screen_to_layout(midpoint);

        vp.touch_move(&[Pos2::new(350.0, 400.0), Pos2::new(550.0, 400.0)]);

        assert!((vp.scale() - 2.0).abs() < 1e-5);
        assert_close(vp.transform().layout_to_screen(under_midpoint), midpoint);
    }

    #[test]
    fn test_pinch_scale_is_relative_to_start() {
        let mut vp = controller();
        vp.touch_start(&[Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)]);
        vp.touch_move(&[Pos2::new(0.0, 0.0), Pos2::new(150.0, 0.0)]);
        vp.touch_move(&[Pos2::new(0.0, 0.0), Pos2::new(200.0, 0.0)]);
        assert!((vp.scale() - 2.0).abs() < 1e-5);

        vp.touch_move(&[Pos2::new(0.0, 0.0), Pos2::new(10_000.0, 0.0)]);
        assert_eq!(vp.scale(), MAX_SCALE);
    }

    #[test]
    fn test_degenerate_pinch_does_not_explode() {
        let mut vp = controller();
        let p = Pos2::new(300.0, 300.0);
        vp.touch_start(&[p, p]);
        vp.touch_move(&[p, p]);
        assert_eq!(vp.scale(), 1.0);
        assert!(vp.translate().x.is_finite());

        // Fingrarna skiljs åt: nypningen förankras om utan hopp
        vp.touch_move(&[Pos2::new(290.0, 300.0), Pos2::new(310.0, 300.0)]);
        assert_eq!(vp.scale(), 1.0);
        vp.touch_move(&[Pos2::new(280.0, 300.0), Pos2::new(320.0, 300.0)]);
        assert!((vp.scale() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_lifting_one_finger_resumes_pan() {
        let mut vp = controller();
        vp.touch_start(&[Pos2::new(100.0, 100.0), Pos2::new(200.0, 100.0)]);
        vp.touch_end(&[Pos2::new(200.0, 100.0)]);
        assert!(vp.is_panning());

        let before = vp.translate();
        vp.touch_move(&[Pos2::new(230.0, 140.0)]);
        assert_eq!(vp.translate(), before + Vec2::new(30.0, 40.0));

        vp.touch_end(&[]);
        assert_eq!(vp.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_center_on() {
        let mut vp = controller();
        vp.zoom_in();
        vp.center_on(Pos2::new(100.0, 50.0));
        assert_close(
            vp.transform().layout_to_screen(Pos2::new(100.0, 50.0)),
            Pos2::new(500.0, 400.0),
        );
    }

    #[test]
    fn test_reset_and_cap_scale() {
        let mut vp = controller();
        vp.zoom_in();
        vp.zoom_in();
        vp.cap_scale(0.8);
        assert_eq!(vp.scale(), 0.8);
        vp.cap_scale(0.01);
        assert_eq!(vp.scale(), MIN_SCALE);
        vp.reset_zoom();
        assert_eq!(vp.scale(), 1.0);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut vp = controller();
        let nan = Pos2::new(f32::NAN, 0.0);
        vp.pointer_down(nan);
        assert_eq!(vp.gesture(), Gesture::Idle);
        vp.touch_start(&[nan, Pos2::ZERO]);
        assert_eq!(vp.gesture(), Gesture::Idle);
        vp.zoom_about(nan, 2.0);
        vp.center_on(nan);
        vp.wheel(Pos2::ZERO, Vec2::new(f32::INFINITY, 0.0), false);
        assert_eq!(vp.transform(), ViewTransform::default());
        assert!(!vp.set_viewport_size(Vec2::new(f32::NAN, 1.0)));
    }

    #[test]
    fn test_scale_stays_in_range_for_mixed_input() {
        let mut vp = controller();
        let mut seed: u32 = 0x2545_f491;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..5000 {
            let r = next();
            let x = (next() % 1000) as f32;
            let y = (next() % 800) as f32;
            match r % 7 {
                0 => vp.zoom_in(),
                1 => vp.zoom_out(),
                2 => vp.wheel(Pos2::new(x, y), Vec2::new(0.0, y - 400.0), true),
                3 => vp.touch_start(&[Pos2::new(x, y), Pos2::new(y, x)]),
                4 => vp.touch_move(&[Pos2::new(x, y), Pos2::new(x + 0.5, y)]),
                5 => vp.touch_move(&[Pos2::new(x, y), Pos2::new(0.0, 0.0)]),
                _ => vp.touch_end(&[]),
            }
            let scale = vp.scale();
            assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "scale {scale}");
            assert!(vp.translate().x.is_finite() && vp.translate().y.is_finite());
        }
    }
}
