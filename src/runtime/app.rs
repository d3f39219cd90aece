use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::commands::Cmd;
use crate::messages::{AjaxMsg, Msg, TimerMsg};
use crate::model::AppModel;
use crate::update::update;

use super::observer::Observer;
use super::transport::Transport;

/// The event loop: feeds messages through `update` and executes the
/// resulting commands. HTTP requests and timers run on short-lived worker
/// threads whose only effect is a message sent back on `msg_tx`.
pub struct App<O: Observer> {
    model: AppModel,
    transport: Arc<dyn Transport>,
    observer: O,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// HTTP requests sent but not yet answered
    outstanding: usize,
    quit: bool,
}

impl<O: Observer> App<O> {
    pub fn new(transport: Arc<dyn Transport>, observer: O) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model: AppModel::new(),
            transport,
            observer,
            msg_tx,
            msg_rx,
            outstanding: 0,
            quit: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Handle for other threads (e.g. stdin) to post messages
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Run one message through `update` and execute its command
    pub fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::Ajax(AjaxMsg::Completed { .. })) {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::SendRequest { request, mode } => {
                self.outstanding += 1;
                let tx = self.msg_tx.clone();
                let transport = Arc::clone(&self.transport);
                std::thread::spawn(move || {
                    let result = transport.execute(&request);
                    let _ = tx.send(Msg::Ajax(AjaxMsg::Completed {
                        request: request.id,
                        name: request.name,
                        mode,
                        result,
                    }));
                });
            }
            Cmd::ScheduleTimer {
                timer,
                token,
                delay_ms,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Timer(TimerMsg::Fired { timer, token }));
                });
            }
            Cmd::RenderGrid { grid_id } => {
                self.observer.page_rendered(&self.model, &grid_id);
            }
            Cmd::Notify(notification) => {
                self.observer.notified(&self.model, &notification);
            }
            Cmd::Quit => {
                self.quit = true;
            }
        }
    }

    /// Block on the message channel until `Quit`
    pub fn run(&mut self) -> Result<()> {
        while !self.quit {
            let msg = self.msg_rx.recv()?;
            self.dispatch(msg);
        }
        tracing::info!("Runtime stopped");
        Ok(())
    }

    /// Process messages until no HTTP request is outstanding and the channel
    /// is drained, or until `timeout` passes. Returns true when idle.
    ///
    /// Timers still sleeping do not count as outstanding.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }
            if self.outstanding == 0 || self.quit {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return true,
            }
        }
    }

    /// Process every message that arrives within `duration`
    pub fn pump_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.quit {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.dispatch(msg),
                Err(_) => break,
            }
        }
    }
}
