//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers per focus and section

pub(crate) mod keys;
pub(crate) mod update;


use url::Url;

use lime_client::ConsoleHandle;
use lime_core::RateControl;

use crate::message::Message;
use crate::qos::ConsoleId;

// Re-export main entry point
pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Download the initial configuration from the server
    FetchConfig,

    /// Open console `id` and send `handshake` once it is up
    OpenConsole {
        id: ConsoleId,
        url: Url,
        handshake: String,
    },

    /// Write a rate control message on an open console
    SendRateControl {
        handle: ConsoleHandle,
        control: RateControl,
    },

    /// Close a console connection
    CloseConsole { handle: ConsoleHandle },

    /// `POST /save`
    SaveConfig { body: String },

    /// `POST /run`; `result` indexes the result page to update
    RunConfig { result: usize, body: String },

    /// Put text on the system clipboard
    CopyToClipboard { text: String },

    /// Several actions, performed in order
    Sequence(Vec<UpdateAction>),
}

impl UpdateAction {
    /// Collapse a list of actions into at most one
    pub fn sequence(mut actions: Vec<UpdateAction>) -> Option<UpdateAction> {
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Sequence(actions)),
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Wrap an optional action
    pub fn maybe_action(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }
}
