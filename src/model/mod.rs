//! Application model - the complete state of the dispatcher and its grids
//!
//! Only `update` mutates the model, and only on the runtime thread.

pub mod live_grid;

pub use live_grid::{
    FetchRequest, FetchState, GridId, GridOptions, GridStats, LiveGrid, FETCH_TIMEOUT_MS,
};

use std::collections::BTreeMap;

use crate::ajax::AjaxEngine;

/// The complete application model
#[derive(Debug, Default)]
pub struct AppModel {
    /// Request names, response handlers and content targets
    pub ajax: AjaxEngine,
    /// Live grids keyed by id
    pub grids: BTreeMap<GridId, LiveGrid>,
    /// User-visible diagnostics, oldest first
    pub diagnostics: Vec<String>,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self, id: &GridId) -> Option<&LiveGrid> {
        self.grids.get(id)
    }

    pub fn grid_mut(&mut self, id: &GridId) -> Option<&mut LiveGrid> {
        self.grids.get_mut(id)
    }

    /// Record a non-fatal problem the user should see
    pub fn push_diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.diagnostics.push(message);
    }
}
