//! # lime-client - LIME Web Service Clients
//!
//! Network plumbing for the LIME console:
//!
//! - [`ConsoleClient`] - streaming WebSocket console (`/console_websocket`)
//! - [`ControlApi`] / [`HttpControlApi`] - save, run and initial configuration over HTTP
//!
//! Both report failures as [`lime_core::Error`]; neither retries.

pub mod api;
pub mod console;

pub use api::{ControlApi, HttpControlApi, LocalControlApi, JSON_CONTENT_TYPE};
pub use console::{ConnectionState, ConsoleClient, ConsoleCommand, ConsoleEvent, ConsoleHandle};
