//! Per-session UI state shared by the controller and the progress listener

use std::sync::{Arc, Mutex, MutexGuard};

use super::guard::InFlightSet;
use super::loading::LoadingIndicator;
use crate::common::traits::UiShell;
use crate::common::types::{BettingHouse, HouseSelection};

#[derive(Debug, Default)]
struct Selector {
    houses: Vec<BettingHouse>,
    selected: Option<HouseSelection>,
    last_update_label: Option<String>,
}

/// Explicit session context replacing the page's module-level globals
pub struct SessionContext {
    in_flight: InFlightSet,
    loading: Arc<LoadingIndicator>,
    selector: Mutex<Selector>,
}

impl SessionContext {
    pub fn new(shell: Arc<dyn UiShell>) -> Self {
        Self {
            in_flight: InFlightSet::new(),
            loading: Arc::new(LoadingIndicator::new(shell)),
            selector: Mutex::new(Selector::default()),
        }
    }

    fn selector(&self) -> MutexGuard<'_, Selector> {
        self.selector.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    pub fn loading(&self) -> &Arc<LoadingIndicator> {
        &self.loading
    }

    pub fn set_houses(&self, houses: Vec<BettingHouse>) {
        self.selector().houses = houses;
    }

    pub fn houses(&self) -> Vec<BettingHouse> {
        self.selector().houses.clone()
    }

    /// Find a loaded house by label or lottery identifier
    pub fn find_house(&self, key: &str) -> Option<BettingHouse> {
        self.selector()
            .houses
            .iter()
            .find(|h| h.name == key || h.value == key)
            .cloned()
    }

    /// Change the current selection; the old house's last-update label no longer applies
    pub fn select(&self, selection: HouseSelection) {
        let mut selector = self.selector();
        if selector.selected.as_ref() != Some(&selection) {
            selector.last_update_label = None;
        }
        selector.selected = Some(selection);
    }

    /// The selected house, or the placeholder when none is
    pub fn selection(&self) -> HouseSelection {
        self.selector()
            .selected
            .clone()
            .unwrap_or_else(HouseSelection::invalid)
    }

    pub fn set_last_update_label(&self, label: impl Into<String>) {
        self.selector().last_update_label = Some(label.into());
    }

    /// Label currently shown in the header's last-update field
    pub fn last_update_label(&self) -> Option<String> {
        self.selector().last_update_label.clone()
    }
}
