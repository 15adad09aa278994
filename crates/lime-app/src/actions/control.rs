//! Save, run, initial fetch and clipboard calls

use tokio::sync::mpsc;

use lime_client::ControlApi;
use lime_core::prelude::*;
use lime_core::ConfigDocument;

use crate::message::Message;

pub(super) async fn fetch_config<A: ControlApi>(api: &A, msg_tx: &mpsc::Sender<Message>) {
    let msg = match api
        .fetch_config()
        .await
        .context("initial configuration fetch failed")
    {
        Ok(value) => Message::ConfigLoaded {
            doc: ConfigDocument::new(value),
        },
        Err(e) => Message::ConfigLoadFailed {
            error: e.to_string(),
        },
    };
    let _ = msg_tx.send(msg).await;
}

pub(super) async fn save<A: ControlApi>(api: &A, body: String, msg_tx: &mpsc::Sender<Message>) {
    let msg = match api.save(body.clone()).await.context("saving configuration") {
        Ok(()) => Message::SaveCompleted { body },
        Err(e) => Message::SaveFailed {
            body,
            error: e.to_string(),
        },
    };
    let _ = msg_tx.send(msg).await;
}

pub(super) async fn run<A: ControlApi>(
    api: &A,
    result: usize,
    body: String,
    msg_tx: &mpsc::Sender<Message>,
) {
    let msg = match api.run(body).await.context("running configuration") {
        Ok(()) => Message::RunCompleted { result },
        Err(e) => Message::RunFailed {
            result,
            error: e.to_string(),
        },
    };
    let _ = msg_tx.send(msg).await;
}

/// Clipboard access blocks on some platforms, so it runs off the runtime
pub(super) async fn copy(text: String, msg_tx: &mpsc::Sender<Message>) {
    let outcome = tokio::task::spawn_blocking(move || set_clipboard(text))
        .await
        .unwrap_or_else(|e| Err(Error::clipboard(e.to_string())))
        .context("copying configuration");
    let msg = match outcome {
        Ok(()) => Message::CopyCompleted,
        Err(e) => Message::CopyFailed {
            error: e.to_string(),
        },
    };
    let _ = msg_tx.send(msg).await;
}

fn set_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| Error::clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| Error::clipboard(e.to_string()))?;
    debug!("configuration copied to clipboard");
    Ok(())
}
