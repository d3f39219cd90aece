//! Output side of the runtime: renders and notifications

use std::io::Write;

use crate::commands::Notification;
use crate::grid::{OutputFormat, PageView};
use crate::model::{AppModel, GridId};

/// Receives everything the runtime would show to a user
pub trait Observer {
    /// The grid's visible page changed
    fn page_rendered(&mut self, model: &AppModel, grid_id: &GridId);
    fn notified(&mut self, model: &AppModel, notification: &Notification);
}

/// Writes pages and notifications to a terminal or any other writer
pub struct PrintObserver<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> PrintObserver<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write> Observer for PrintObserver<W> {
    fn page_rendered(&mut self, model: &AppModel, grid_id: &GridId) {
        let Some(grid) = model.grid(grid_id) else {
            return;
        };
        let view = PageView {
            grid: grid_id.as_str(),
            offset: grid.displayed_offset().unwrap_or(0),
            total_rows: grid.metadata.total_rows(),
            rows: grid.table.rows(),
        };
        let mut text = view.render(self.format);
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.emit(&text);
    }

    fn notified(&mut self, model: &AppModel, notification: &Notification) {
        match notification {
            Notification::Diagnostic(message) => {
                self.emit(&format!("! {}\n", message));
            }
            Notification::ContentReplaced { target } => {
                if let Some(content) = model.ajax.targets.get(target) {
                    self.emit(&format!("[{}] {}\n", target, content.inner()));
                }
            }
            Notification::Scrolled { grid_id, offset } => {
                tracing::debug!("Grid '{}' scrolled to {}", grid_id, offset);
            }
            Notification::ScrollIdle { grid_id } => {
                if let Some(grid) = model.grid(grid_id) {
                    tracing::info!("Grid '{}' idle, stats: {:?}", grid_id, grid.stats);
                }
            }
        }
    }
}

/// Records everything; used by tests and benchmarks
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Grid id and first rendered row offset, in order
    pub renders: Vec<(GridId, Option<usize>)>,
    pub notifications: Vec<Notification>,
}

impl Observer for RecordingObserver {
    fn page_rendered(&mut self, model: &AppModel, grid_id: &GridId) {
        let offset = model.grid(grid_id).and_then(|g| g.displayed_offset());
        self.renders.push((grid_id.clone(), offset));
    }

    fn notified(&mut self, _model: &AppModel, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}
