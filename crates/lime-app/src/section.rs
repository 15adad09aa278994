//! Section lifecycle
//!
//! Every page reachable from the navigation tree implements [`Section`].
//! `AppState::activate_section` is the only caller: it deactivates the
//! outgoing section before activating the incoming one, so teardown always
//! precedes setup.

use lime_core::{ConfigDocument, ServerEndpoints};

use crate::handler::UpdateAction;

/// Read-only inputs available to a section while it activates
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub doc: &'a ConfigDocument,
    pub endpoints: &'a ServerEndpoints,
}

pub trait Section {
    /// Build the section's view state; may ask the event loop for I/O
    fn activate(&mut self, ctx: &SectionContext<'_>) -> Option<UpdateAction>;

    /// Drop view state and release resources acquired in `activate`
    fn deactivate(&mut self) -> Option<UpdateAction>;
}
