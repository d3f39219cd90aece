//! Response handlers and content targets, keyed by response id

use std::collections::HashMap;
use std::fmt;

use super::envelope::ResponseElement;
use crate::messages::{GridMsg, Msg};
use crate::model::GridId;

/// Receives `type="object"` responses.
///
/// A handler turns the response into an optional follow-up message that the
/// update loop processes right away, so handlers never touch the model
/// directly.
pub trait AjaxHandler {
    fn deliver(&mut self, response: &ResponseElement) -> Option<Msg>;
}

impl<F> AjaxHandler for F
where
    F: FnMut(&ResponseElement) -> Option<Msg>,
{
    fn deliver(&mut self, response: &ResponseElement) -> Option<Msg> {
        self(response)
    }
}

/// Routes row data responses to a live grid
#[derive(Debug, Clone)]
pub struct GridUpdater {
    grid_id: GridId,
}

impl GridUpdater {
    pub fn new(grid_id: GridId) -> Self {
        Self { grid_id }
    }
}

impl AjaxHandler for GridUpdater {
    fn deliver(&mut self, response: &ResponseElement) -> Option<Msg> {
        Some(Msg::Grid(GridMsg::FetchCompleted {
            grid_id: self.grid_id.clone(),
            response: response.clone(),
        }))
    }
}

/// Handlers registered for `object` responses
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn AjaxHandler>>,
}

impl HandlerRegistry {
    pub fn register(&mut self, id: impl Into<String>, handler: Box<dyn AjaxHandler>) {
        self.handlers.insert(id.into(), handler);
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn AjaxHandler + 'static)> {
        self.handlers.get_mut(id).map(|h| &mut **h)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.handlers.keys().collect();
        ids.sort();
        f.debug_struct("HandlerRegistry").field("ids", &ids).finish()
    }
}

/// A DOM-like slot whose inner content can be replaced wholesale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTarget {
    inner: String,
    replacements: usize,
}

impl ContentTarget {
    pub fn inner(&self) -> &str {
        &self.inner
    }

    /// Number of times the content has been replaced
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    pub fn replace(&mut self, content: String) {
        self.inner = content;
        self.replacements += 1;
    }
}

/// Targets registered for `element` responses
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: HashMap<String, ContentTarget>,
}

impl TargetRegistry {
    /// Register an empty target; re-registering keeps existing content
    pub fn register(&mut self, id: impl Into<String>) {
        self.targets.entry(id.into()).or_default();
    }

    pub fn get(&self, id: &str) -> Option<&ContentTarget> {
        self.targets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ContentTarget> {
        self.targets.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
