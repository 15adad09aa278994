//! lime-app - Application state and orchestration for the LIME console
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: [`Message`]s flow through [`handler::update`], which mutates
//! [`AppState`] and may return an [`UpdateAction`]. Actions are executed on
//! background tasks by [`actions::handle_action`] and report back with
//! further messages.
//!
//! The navigation tree drives three kinds of section: the QoS monitor, the
//! configuration editor and one result page per run.

pub mod actions;
pub mod config_page;
pub mod control_table;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod navigation;
pub mod process;
pub mod qos;
pub mod result_page;
pub mod section;
pub mod settings;
pub mod state;

// Re-export primary types
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use navigation::SectionKey;
pub use settings::Settings;
pub use state::AppState;
