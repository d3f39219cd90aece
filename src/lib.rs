//! livegrid - AJAX response dispatch and a live-scrolling data grid
//!
//! Requests are sent under logical names, `ajax-response` envelopes are
//! routed to registered handlers and content targets, and live grids keep
//! a window of server rows around the visible page. State changes follow
//! the Elm Architecture: `update(&mut AppModel, Msg) -> Option<Cmd>`.

pub mod ajax;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod grid;
pub mod input;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod timer;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::LiveGridConfig;
pub use messages::Msg;
pub use model::AppModel;
