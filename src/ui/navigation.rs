//! Navigering: initial centrering, sökval, återställd zoom och storleksändring
//!
//! Centrering kräver att nodens position är renderad. Därför sparas en
//! begäran som löses först i `after_layout_commit`, som vyn anropar när en
//! renderingsomgång har lagt ut sina nodrutor.

use crate::services::family_tree::{ExpansionSet, FamilyGraph, RenderedGeometry};
use crate::ui::viewport::ViewportController;
use egui::Vec2;

/// Antal renderingsomgångar en begäran får vänta på att målet syns
pub const PENDING_COMMIT_LIMIT: u8 = 3;

/// Anledning till en väntande centrering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterReason {
    Search,
    ResetZoom,
    Resize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCenter {
    id: String,
    reason: CenterReason,
    commits_left: u8,
}

/// Håller reda på vilken nod vyn ska följa och när den ska centreras
#[derive(Debug, Clone, Default)]
pub struct NavigationOrchestrator {
    default_focus_id: Option<String>,
    has_centered_initially: bool,
    last_centered_id: Option<String>,
    pending: Option<PendingCenter>,
}

impl NavigationOrchestrator {
    pub fn new(default_focus_id: Option<String>) -> Self {
        Self {
            last_centered_id: default_focus_id.clone(),
            default_focus_id,
            has_centered_initially: false,
            pending: None,
        }
    }

    pub fn default_focus_id(&self) -> Option<&str> {
        self.default_focus_id.as_deref()
    }

    pub fn last_centered_id(&self) -> Option<&str> {
        self.last_centered_id.as_deref()
    }

    pub fn has_centered_initially(&self) -> bool {
        self.has_centered_initially
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_reason(&self) -> Option<CenterReason> {
        self.pending.as_ref().map(|p| p.reason)
    }

    /// Sökval: expandera förfäderna och centrera på noden efter nästa rendering
    pub fn select_member(&mut self, id: &str, graph: &FamilyGraph, expansion: &mut ExpansionSet) {
        let added = expansion.expand_ancestors(id, graph);
        tracing::debug!("Navigerar till '{}' ({} förfäder expanderade)", id, added);

        self.last_centered_id = Some(id.to_string());
        self.schedule(id.to_string(), CenterReason::Search);
    }

    /// Skala 1 och centrera om på senast centrerade nod
    pub fn reset_zoom(&mut self, viewport: &mut ViewportController) {
        viewport.reset_zoom();
        self.schedule_last_centered(CenterReason::ResetZoom);
    }

    /// Ny vyportstorlek: håll fokusnoden på plats i mitten
    pub fn viewport_resized(&mut self, size: Vec2, viewport: &mut ViewportController) {
        if viewport.set_viewport_size(size) {
            self.schedule_last_centered(CenterReason::Resize);
        }
    }

    /// Anropas efter att en renderingsomgång lagt ut sina noder. Returnerar
    /// true om transformen ändrades.
    pub fn after_layout_commit(
        &mut self,
        geometry: &RenderedGeometry,
        viewport: &mut ViewportController,
    ) -> bool {
        let mut changed = false;

        if !self.has_centered_initially {
            if let Some(id) = self.default_focus_id.clone() {
                if center_on_rendered(&id, geometry, viewport) {
                    tracing::debug!("Initial centrering på '{}'", id);
                    self.has_centered_initially = true;
                    if self.pending.is_none() {
                        self.last_centered_id = Some(id);
                    }
                    changed = true;
                }
            }
        }

        if let Some(mut pending) = self.pending.take() {
            if center_on_rendered(&pending.id, geometry, viewport) {
                changed = true;
            } else {
                pending.commits_left = pending.commits_left.saturating_sub(1);
                if pending.commits_left > 0 {
                    self.pending = Some(pending);
                } else {
                    tracing::debug!(
                        "'{}' renderades aldrig, centrering ({:?}) struken",
                        pending.id,
                        pending.reason
                    );
                }
            }
        }

        changed
    }

    fn schedule_last_centered(&mut self, reason: CenterReason) {
        if let Some(id) = self.last_centered_id.clone() {
            self.schedule(id, reason);
        }
    }

    fn schedule(&mut self, id: String, reason: CenterReason) {
        self.pending = Some(PendingCenter {
            id,
            reason,
            commits_left: PENDING_COMMIT_LIMIT,
        });
    }
}

fn center_on_rendered(
    id: &str,
    geometry: &RenderedGeometry,
    viewport: &mut ViewportController,
) -> bool {
    match geometry.layout_center(id, viewport.scale()) {
        Some(center) => {
            viewport.center_on(center);
            true
        }
        None => false,
    }
}
