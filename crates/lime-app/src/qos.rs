//! QoS monitoring page
//!
//! Holds one [`JobView`](lime_core::JobView) per configured job while the
//! section is active, and the console pane fed by the streaming socket.
//!
//! Every activation opens a fresh socket tagged with a new [`ConsoleId`].
//! Events carrying any other id belong to a connection this page has
//! already let go of and are dropped.

use std::collections::VecDeque;
use std::fmt;

use lime_client::{ConsoleEvent, ConsoleHandle};
use lime_core::prelude::*;
use lime_core::{ConsoleMessage, JobBoard, RateControl};

use crate::handler::UpdateAction;
use crate::section::{Section, SectionContext};
use crate::settings::QosSettings;

/// Lines kept in the console pane
pub const CONSOLE_CAPACITY: usize = 500;

/// Generation tag of one console connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsoleId(pub u64);

impl fmt::Display for ConsoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStatus {
    Idle,
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    CommandSucceeded,
    CommandFailed,
    Unknown,
    Text,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug)]
pub struct QosPage {
    pub board: JobBoard,
    pub console: VecDeque<ConsoleLine>,
    /// Highlighted job row
    pub selected: usize,
    pub status: ConsoleStatus,
    pub gauge_max: f64,
    rate_step: f64,
    console_id: Option<ConsoleId>,
    next_console_id: u64,
    handle: Option<ConsoleHandle>,
}

impl QosPage {
    pub fn new(settings: &QosSettings) -> Self {
        Self {
            board: JobBoard::new(),
            console: VecDeque::with_capacity(CONSOLE_CAPACITY),
            selected: 0,
            status: ConsoleStatus::Idle,
            gauge_max: settings.gauge_max,
            rate_step: settings.rate_step,
            console_id: None,
            next_console_id: 1,
            handle: None,
        }
    }

    /// Id of the connection this page currently listens to
    pub fn console_id(&self) -> Option<ConsoleId> {
        self.console_id
    }

    pub fn is_current(&self, id: ConsoleId) -> bool {
        self.console_id == Some(id)
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Store the sending side of connection `id`.
    ///
    /// A handle for a stale connection is handed back as a close action.
    pub fn attach(&mut self, id: ConsoleId, handle: ConsoleHandle) -> Option<UpdateAction> {
        if !self.is_current(id) {
            debug!("console {} attached after teardown, closing it", id);
            return Some(UpdateAction::CloseConsole { handle });
        }
        self.handle = Some(handle);
        None
    }

    /// Apply one event of connection `id`
    pub fn handle_event(&mut self, id: ConsoleId, event: ConsoleEvent) {
        if !self.is_current(id) {
            trace!("dropping event of stale console {}: {:?}", id, event);
            return;
        }

        match event {
            ConsoleEvent::Opened => {
                info!("console {} open", id);
                self.status = ConsoleStatus::Open;
                self.push_line(LineKind::Info, "Console connected");
            }
            ConsoleEvent::Message(message) => self.handle_message(message),
            ConsoleEvent::Error(error) => {
                error!("console {} error: {}", id, error);
                self.push_line(LineKind::Error, error);
            }
            ConsoleEvent::Closed => {
                info!("console {} closed", id);
                self.status = ConsoleStatus::Closed;
                self.handle = None;
                self.push_line(LineKind::Info, "Console closed");
            }
        }
    }

    fn handle_message(&mut self, message: ConsoleMessage) {
        match &message {
            ConsoleMessage::Datapoint(datapoint) => {
                if let Err(e) = self.board.apply(datapoint) {
                    error!("dropping datapoint: {}", e);
                }
            }
            ConsoleMessage::CommandResult(result) => {
                info!("command result: {}", message.summary());
                let kind = if result.succeeded() {
                    LineKind::CommandSucceeded
                } else {
                    LineKind::CommandFailed
                };
                self.push_line(kind, message.summary());
            }
            ConsoleMessage::Unknown { kind, .. } => {
                warn!("unhandled console message type {:?}", kind);
                self.push_line(LineKind::Unknown, message.summary());
            }
            ConsoleMessage::Text(_) => {
                self.push_line(LineKind::Text, message.summary());
            }
        }
    }

    fn push_line(&mut self, kind: LineKind, text: impl Into<String>) {
        if self.console.len() == CONSOLE_CAPACITY {
            self.console.pop_front();
        }
        self.console.push_back(ConsoleLine {
            kind,
            text: text.into(),
        });
    }

    // ── Job selection and rate control ──────────────────────

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.board.len() {
            self.selected += 1;
        }
    }

    /// Raise (`steps > 0`) or lower the selected job's rate limit.
    ///
    /// The starting point is the last requested limit, else the current
    /// rate. Limits never go below zero.
    pub fn adjust_rate(&mut self, steps: i32) -> Result<UpdateAction> {
        let handle = match &self.handle {
            Some(handle) if self.status == ConsoleStatus::Open => handle.clone(),
            _ => return Err(Error::socket("console is not connected")),
        };
        let step = self.rate_step;
        let selected = self.selected;
        let job = self
            .board
            .get_index_mut(selected)
            .ok_or_else(|| Error::unknown_job(format!("row {selected}")))?;

        let base = job
            .rate_limit
            .or(job.current_rate.map(|rate| rate as f64))
            .unwrap_or(0.0);
        let rate = (base + f64::from(steps) * step).max(0.0);
        job.rate_limit = Some(rate);

        let control = RateControl {
            job_id: job.job_id.clone(),
            rate,
        };
        info!("requesting rate {} for {}", control.rate, control.job_id);
        Ok(UpdateAction::SendRateControl { handle, control })
    }
}

impl Section for QosPage {
    fn activate(&mut self, ctx: &SectionContext<'_>) -> Option<UpdateAction> {
        self.board.clear();
        for job_id in ctx.doc.job_ids() {
            if let Err(e) = self.board.register(&job_id) {
                warn!("{}", e);
            }
        }
        self.selected = 0;

        let id = ConsoleId(self.next_console_id);
        self.next_console_id += 1;
        self.console_id = Some(id);
        self.status = ConsoleStatus::Connecting;

        debug!("QoS activated with {} jobs, console {}", self.board.len(), id);
        Some(UpdateAction::OpenConsole {
            id,
            url: ctx.endpoints.console(),
            handshake: ctx.doc.serialized(),
        })
    }

    fn deactivate(&mut self) -> Option<UpdateAction> {
        self.board.clear();
        self.console.clear();
        self.selected = 0;
        self.status = ConsoleStatus::Idle;
        self.console_id = None;
        self.handle
            .take()
            .map(|handle| UpdateAction::CloseConsole { handle })
    }
}
