//! Horizontal scroll synchronization between the timeline header and its rows.
//!
//! The header and every task row are separate horizontally-scrollable
//! surfaces that must behave as one. The synchronizer owns the single
//! authoritative offset. A scroll on any surface becomes the new offset and
//! is queued for every other surface; when the renderer applies a queued
//! offset it is recorded as that surface's known position, so the applied
//! update never reads back as a fresh scroll.

use std::collections::{HashMap, HashSet};

use egui::Id;
use tracing::{debug, trace};

/// Offsets closer than this are the same position.
const EPSILON: f32 = 0.5;

pub type SurfaceId = Id;

/// NaN (never observed) is never the same as anything.
fn same_offset(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Debug, Clone, PartialEq, Default)]
enum SyncPhase {
    #[default]
    Idle,
    /// `pending` surfaces still have to take the authoritative offset.
    Propagating { source: Option<SurfaceId>, pending: HashSet<SurfaceId> },
}

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    header: SurfaceId,
    rows: Vec<SurfaceId>,
    column_width: f32,
}

#[derive(Debug, Default)]
pub struct ScrollSynchronizer {
    binding: Option<Binding>,
    /// Last offset observed or applied per bound surface.
    known: HashMap<SurfaceId, f32>,
    offset: f32,
    phase: SyncPhase,
}

impl ScrollSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_propagating(&self) -> bool {
        matches!(self.phase, SyncPhase::Propagating { .. })
    }

    pub fn is_bound(&self, surface: SurfaceId) -> bool {
        self.known.contains_key(&surface)
    }

    pub fn bound_count(&self) -> usize {
        self.known.len()
    }

    /// (Re)bind to a header and a row set.
    ///
    /// Nothing happens when neither the surfaces nor the column width changed.
    /// Otherwise surfaces that are no longer present are released and every
    /// surface not already at the shared offset is queued to adopt it.
    /// Returns whether a rebind took place.
    pub fn bind(
        &mut self,
        header: SurfaceId,
        rows: impl IntoIterator<Item = SurfaceId>,
        column_width: f32,
    ) -> bool {
        let binding = Binding {
            header,
            rows: rows.into_iter().collect(),
            column_width,
        };
        if self.binding.as_ref() == Some(&binding) {
            return false;
        }

        let surfaces: HashSet<SurfaceId> = std::iter::once(header)
            .chain(binding.rows.iter().copied())
            .collect();
        let released = self.known.len();
        self.known.retain(|id, _| surfaces.contains(id));
        let released = released - self.known.len();

        let pending: HashSet<SurfaceId> = surfaces
            .iter()
            .copied()
            .filter(|id| {
                self.known
                    .get(id)
                    .map(|known| !same_offset(*known, self.offset))
                    .unwrap_or(true)
            })
            .collect();
        for id in &surfaces {
            self.known.entry(*id).or_insert(f32::NAN);
        }

        debug!(
            surfaces = surfaces.len(),
            released,
            column_width,
            "Scroll synchronizer rebound"
        );
        self.phase = if pending.is_empty() {
            SyncPhase::Idle
        } else {
            SyncPhase::Propagating { source: None, pending }
        };
        self.binding = Some(binding);
        true
    }

    /// Drop every binding.
    pub fn unbind(&mut self) {
        self.binding = None;
        self.known.clear();
        self.phase = SyncPhase::Idle;
    }

    /// Report the offset a surface ended up at after being drawn.
    ///
    /// A change from the last known value is a scroll event. Events from
    /// surfaces still waiting for a queued update are echoes and are absorbed.
    pub fn report(&mut self, surface: SurfaceId, observed: f32) {
        let Some(known) = self.known.get_mut(&surface) else {
            trace!(?surface, "Ignoring scroll report from unbound surface");
            return;
        };
        if same_offset(*known, observed) {
            return;
        }
        *known = observed;

        if let SyncPhase::Propagating { pending, .. } = &mut self.phase {
            if pending.contains(&surface) {
                return;
            }
        }

        self.offset = observed;
        let pending: HashSet<SurfaceId> = self
            .known
            .keys()
            .copied()
            .filter(|id| *id != surface)
            .collect();
        self.phase = if pending.is_empty() {
            SyncPhase::Idle
        } else {
            SyncPhase::Propagating { source: Some(surface), pending }
        };
    }

    /// Hand the renderer the offset to force on `surface`, if one is queued.
    ///
    /// The offset becomes the surface's known position, so reporting it back
    /// is a no-op.
    pub fn take_pending(&mut self, surface: SurfaceId) -> Option<f32> {
        let SyncPhase::Propagating { pending, .. } = &mut self.phase else {
            return None;
        };
        if !pending.remove(&surface) {
            return None;
        }
        if pending.is_empty() {
            self.phase = SyncPhase::Idle;
        }
        self.known.insert(surface, self.offset);
        Some(self.offset)
    }

    /// Surface that started the current propagation, if it came from a scroll.
    pub fn source(&self) -> Option<SurfaceId> {
        match &self.phase {
            SyncPhase::Propagating { source, .. } => *source,
            SyncPhase::Idle => None,
        }
    }
}
