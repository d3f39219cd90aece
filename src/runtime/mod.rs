//! Runtime module - executes commands and feeds results back as messages
//!
//! - `app` - the message loop and command execution
//! - `transport` - HTTP execution (`reqwest` blocking client)
//! - `observer` - where renders and notifications go

pub mod app;
pub mod observer;
pub mod transport;

pub use app::App;
pub use observer::{Observer, PrintObserver, RecordingObserver};
pub use transport::{HttpTransport, Transport};
