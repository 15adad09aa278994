//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Each call to [`handle_action`] runs on its own tokio task and reports
//! back to the TEA loop with [`Message`]s. Nothing here touches `AppState`.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;

use lime_client::ControlApi;

use crate::message::Message;
use crate::UpdateAction;

mod console;
mod control;

/// Execute an action on a background task.
///
/// The parts of a [`UpdateAction::Sequence`] run one after another on that
/// task, so each part is complete before the next one starts. A console's
/// event forwarding outlives its part on a task of its own.
///
/// Must be called from within a Tokio runtime.
pub fn handle_action<A>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, api: &Arc<A>)
where
    A: ControlApi + Sync + 'static,
{
    let api = Arc::clone(api);
    tokio::spawn(async move {
        let mut pending = VecDeque::from([action]);
        while let Some(action) = pending.pop_front() {
            match action {
                UpdateAction::Sequence(parts) => {
                    // Nested sequences expand in place
                    for part in parts.into_iter().rev() {
                        pending.push_front(part);
                    }
                }

                UpdateAction::FetchConfig => control::fetch_config(api.as_ref(), &msg_tx).await,

                UpdateAction::OpenConsole { id, url, handshake } => {
                    console::open_console(id, url, handshake, msg_tx.clone());
                }

                UpdateAction::SendRateControl { handle, control } => {
                    console::send_rate_control(&handle, &control).await;
                }

                UpdateAction::CloseConsole { handle } => handle.close().await,

                UpdateAction::SaveConfig { body } => {
                    control::save(api.as_ref(), body, &msg_tx).await;
                }

                UpdateAction::RunConfig { result, body } => {
                    control::run(api.as_ref(), result, body, &msg_tx).await;
                }

                UpdateAction::CopyToClipboard { text } => control::copy(text, &msg_tx).await,
            }
        }
    });
}
