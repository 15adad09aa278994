//! Console connection lifecycle and event forwarding.
//!
//! [`open_console`] starts a [`ConsoleClient`], hands its sending side to
//! the TEA loop as `ConsoleAttached`, then forwards every event tagged with
//! the connection's [`ConsoleId`] until the client's event channel closes.

use tokio::sync::mpsc;
use url::Url;

use lime_client::{ConsoleClient, ConsoleHandle};
use lime_core::prelude::*;
use lime_core::RateControl;

use crate::message::Message;
use crate::qos::ConsoleId;

/// Connect console `id` and spawn the task that forwards its events
pub(super) fn open_console(id: ConsoleId, url: Url, handshake: String, msg_tx: mpsc::Sender<Message>) {
    debug!("opening console {} at {}", id, url);
    let client = ConsoleClient::connect(&url, handshake);
    let (handle, mut event_rx) = client.into_parts();

    tokio::spawn(async move {
        // The handle must reach the state before any event does
        if msg_tx
            .send(Message::ConsoleAttached {
                id,
                handle: handle.clone(),
            })
            .await
            .is_err()
        {
            handle.close().await;
            return;
        }

        while let Some(event) = event_rx.recv().await {
            if msg_tx.send(Message::Console { id, event }).await.is_err() {
                debug!("message channel closed, closing console {}", id);
                handle.close().await;
                break;
            }
        }
        debug!("console {} forwarding finished", id);
    });
}

/// Serialize `control` and write it on the console; failures are logged
pub(super) async fn send_rate_control(handle: &ConsoleHandle, control: &RateControl) {
    let sent = match control.to_json() {
        Ok(text) => handle.send(text).await,
        Err(e) => Err(e),
    };
    let _ = sent.with_context(|| format!("rate control for {} not sent", control.job_id));
}
