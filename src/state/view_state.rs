//! View and zoom state.
//!
//! `ViewState` is a plain value. Every change goes through
//! [`ViewState::apply`], which returns the next state and leaves the old one
//! untouched, so the layout engine only ever sees a consistent snapshot.

use tracing::{debug, warn};

use super::storage::SettingsStore;
use crate::model::Granularity;

pub const MIN_ZOOM: u16 = 50;
pub const MAX_ZOOM: u16 = 200;
pub const ZOOM_STEP: u16 = 25;
pub const DEFAULT_ZOOM: u16 = 100;

pub const ZOOM_KEY: &str = "timelineZoom";
pub const SIDEBAR_KEY: &str = "sidebarCollapsed";
pub const PROJECT_KEY: &str = "selectedProjectId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub granularity: Granularity,
    pub zoom_percent: u16,
    pub sidebar_collapsed: bool,
    pub selected_project_id: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            zoom_percent: DEFAULT_ZOOM,
            sidebar_collapsed: false,
            selected_project_id: None,
        }
    }
}

/// User-driven view transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetZoom(i64),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetGranularity(Granularity),
    ToggleSidebar,
    SetSidebarCollapsed(bool),
    SelectProject(Option<String>),
}

fn clamp_zoom(percent: i64) -> u16 {
    percent.clamp(MIN_ZOOM as i64, MAX_ZOOM as i64) as u16
}

impl ViewState {
    /// Next state after `action`.
    pub fn apply(&self, action: ViewAction) -> ViewState {
        let mut next = self.clone();
        match action {
            ViewAction::SetZoom(percent) => next.zoom_percent = clamp_zoom(percent),
            ViewAction::ZoomIn => {
                next.zoom_percent = clamp_zoom(self.zoom_percent as i64 + ZOOM_STEP as i64)
            }
            ViewAction::ZoomOut => {
                next.zoom_percent = clamp_zoom(self.zoom_percent as i64 - ZOOM_STEP as i64)
            }
            ViewAction::ResetZoom => next.zoom_percent = DEFAULT_ZOOM,
            ViewAction::SetGranularity(granularity) => next.granularity = granularity,
            ViewAction::ToggleSidebar => next.sidebar_collapsed = !self.sidebar_collapsed,
            ViewAction::SetSidebarCollapsed(collapsed) => next.sidebar_collapsed = collapsed,
            ViewAction::SelectProject(id) => next.selected_project_id = id,
        }
        next
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom_percent < MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom_percent > MIN_ZOOM
    }

    /// Restore persisted fields. Missing or malformed entries keep their defaults.
    pub fn load(store: &dyn SettingsStore) -> ViewState {
        let mut state = ViewState::default();

        if let Some(raw) = store.get(ZOOM_KEY) {
            match serde_json::from_str::<i64>(&raw) {
                Ok(zoom) => state.zoom_percent = clamp_zoom(zoom),
                Err(e) => warn!(key = ZOOM_KEY, value = %raw, error = %e, "Ignoring stored zoom"),
            }
        }

        if let Some(raw) = store.get(SIDEBAR_KEY) {
            match raw.trim() {
                "true" => state.sidebar_collapsed = true,
                "false" => state.sidebar_collapsed = false,
                other => warn!(key = SIDEBAR_KEY, value = %other, "Ignoring stored sidebar flag"),
            }
        }

        state.selected_project_id = store
            .get(PROJECT_KEY)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        debug!(?state, "View state loaded");
        state
    }

    /// Write the persisted fields. Failures are logged and otherwise ignored.
    pub fn persist(&self, store: &mut dyn SettingsStore) {
        let results = [
            (ZOOM_KEY, store.set(ZOOM_KEY, self.zoom_percent.to_string())),
            (SIDEBAR_KEY, store.set(SIDEBAR_KEY, self.sidebar_collapsed.to_string())),
            (
                PROJECT_KEY,
                match &self.selected_project_id {
                    Some(id) => store.set(PROJECT_KEY, id.clone()),
                    None => store.remove(PROJECT_KEY),
                },
            ),
        ];
        for (key, result) in results {
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to persist view state");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn defaults() {
        let state = ViewState::default();
        assert_eq!(state.zoom_percent, 100);
        assert!(!state.sidebar_collapsed);
        assert_eq!(state.granularity, Granularity::Weekly);
    }

    #[test]
    fn zoom_steps_and_saturates() {
        let mut state = ViewState::default();
        for _ in 0..10 {
            state = state.apply(ViewAction::ZoomIn);
        }
        assert_eq!(state.zoom_percent, MAX_ZOOM);
        assert_eq!(state.apply(ViewAction::ZoomIn), state);

        let state = state.apply(ViewAction::SetZoom(50));
        assert_eq!(state.apply(ViewAction::ZoomOut), state);

        let state = state.apply(ViewAction::ZoomIn);
        assert_eq!(state.zoom_percent, 75);
        assert_eq!(state.apply(ViewAction::ResetZoom).zoom_percent, 100);
    }

    #[test]
    fn apply_leaves_the_previous_state_alone() {
        let before = ViewState::default();
        let after = before.apply(ViewAction::SetGranularity(Granularity::Kanban));
        assert_eq!(before.granularity, Granularity::Weekly);
        assert_eq!(after.granularity, Granularity::Kanban);
    }

    #[test]
    fn sidebar_toggles() {
        let state = ViewState::default().apply(ViewAction::ToggleSidebar);
        assert!(state.sidebar_collapsed);
        assert!(!state.apply(ViewAction::ToggleSidebar).sidebar_collapsed);
        assert!(state.apply(ViewAction::SetSidebarCollapsed(true)).sidebar_collapsed);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let state = ViewState::default()
            .apply(ViewAction::SetZoom(175))
            .apply(ViewAction::ToggleSidebar)
            .apply(ViewAction::SelectProject(Some("proj-1".into())));
        state.persist(&mut store);

        assert_eq!(store.get(ZOOM_KEY).as_deref(), Some("175"));
        assert_eq!(store.get(SIDEBAR_KEY).as_deref(), Some("true"));

        let loaded = ViewState::load(&store);
        assert_eq!(loaded.zoom_percent, 175);
        assert!(loaded.sidebar_collapsed);
        assert_eq!(loaded.selected_project_id.as_deref(), Some("proj-1"));

        state.apply(ViewAction::SelectProject(None)).persist(&mut store);
        assert_eq!(store.get(PROJECT_KEY), None);
    }

    #[test]
    fn corrupt_entries_fail_soft() {
        let mut store = MemoryStore::new();
        store.set(ZOOM_KEY, "{oops".into()).unwrap();
        store.set(SIDEBAR_KEY, "maybe".into()).unwrap();
        let loaded = ViewState::load(&store);
        assert_eq!(loaded.zoom_percent, DEFAULT_ZOOM);
        assert!(!loaded.sidebar_collapsed);
    }

    #[test]
    fn out_of_range_stored_zoom_is_clamped() {
        let mut store = MemoryStore::new();
        store.set(ZOOM_KEY, "900".into()).unwrap();
        assert_eq!(ViewState::load(&store).zoom_percent, MAX_ZOOM);
    }

    proptest! {
        #[test]
        fn set_zoom_always_lands_in_range(x in any::<i64>()) {
            let state = ViewState::default().apply(ViewAction::SetZoom(x));
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&state.zoom_percent));
        }

        #[test]
        fn zoom_steps_stay_in_range(start in 50i64..=200, ins in 0usize..12, outs in 0usize..12) {
            let mut state = ViewState::default().apply(ViewAction::SetZoom(start));
            for _ in 0..ins {
                state = state.apply(ViewAction::ZoomIn);
            }
            for _ in 0..outs {
                state = state.apply(ViewAction::ZoomOut);
            }
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&state.zoom_percent));
        }
    }
}
