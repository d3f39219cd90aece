//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::ajax::{HttpRequest, ResponseMode};
use crate::model::GridId;
use crate::timer::{TimerId, TimerToken};

/// Events reported to whoever is watching the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Scrollbar moved; carries the new content offset
    Scrolled { grid_id: GridId, offset: usize },
    /// Scrollbar has been quiet for the idle period
    ScrollIdle { grid_id: GridId },
    /// Non-fatal problem, e.g. an unknown response type
    Diagnostic(String),
    /// A content target received new inner content
    ContentReplaced { target: String },
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Execute an HTTP request on a worker thread.
    /// Sends `Msg::Ajax(AjaxMsg::Completed)` when done.
    SendRequest {
        request: HttpRequest,
        mode: ResponseMode,
    },
    /// Sleep on a worker thread, then send `Msg::Timer(TimerMsg::Fired)`
    ScheduleTimer {
        timer: TimerId,
        token: TimerToken,
        delay_ms: u64,
    },
    /// The grid's visible page changed
    RenderGrid { grid_id: GridId },
    Notify(Notification),
    /// Request application exit
    Quit,
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Combine optional commands, dropping the empty ones
    pub fn merge<I>(cmds: I) -> Option<Cmd>
    where
        I: IntoIterator<Item = Option<Cmd>>,
    {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .flatten()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// All leaf commands in execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
