//! Startup functions for the TUI runner
//!
//! Decides where the initial configuration comes from: a local file given
//! on the command line, or the control server.

use std::path::Path;

use lime_app::{Message, UpdateAction};
use lime_core::prelude::*;
use lime_core::ConfigDocument;

/// First step of the application
#[derive(Debug)]
pub enum StartupAction {
    /// Feed this message to the update function
    Message(Message),
    /// Perform this action; its result arrives as a message
    Action(UpdateAction),
}

/// Choose the initial configuration source
pub fn startup(config_path: Option<&Path>) -> StartupAction {
    let Some(path) = config_path else {
        info!("fetching configuration from server");
        return StartupAction::Action(UpdateAction::FetchConfig);
    };

    info!("loading configuration from {}", path.display());
    match ConfigDocument::load(path) {
        Ok(doc) => StartupAction::Message(Message::ConfigLoaded { doc }),
        Err(e) => StartupAction::Message(Message::ConfigLoadFailed {
            error: e.to_string(),
        }),
    }
}
