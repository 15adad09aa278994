//! Streaming console client for the LIME web service.
//!
//! A [`ConsoleClient`] owns one WebSocket connection to
//! `/console_websocket`. The connection lives in a background task; the
//! public side is a clonable [`ConsoleHandle`] for outgoing frames and an
//! mpsc receiver of [`ConsoleEvent`]s.
//!
//! ```text
//!   ConsoleHandle ──cmd──▶ background task ──ws──▶ server
//!   event_rx      ◀─evt─── (select! over ws stream and cmd channel)
//! ```
//!
//! The handshake payload is sent as soon as the socket opens. There is no
//! reconnection: once [`ConsoleEvent::Closed`] has been emitted the client
//! is finished and a new one must be created.

use std::sync::{Arc, RwLock};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use lime_core::prelude::*;
use lime_core::{parse_console_message, ConsoleMessage};

/// Capacity of the command channel (bounded, to apply backpressure).
const CMD_CHANNEL_CAPACITY: usize = 32;

/// Capacity of the event channel. Datapoints arrive once per job per
/// sampling interval, so bursts stay small.
const EVENT_CHANNEL_CAPACITY: usize = 256;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Lifecycle of a console connection. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Events emitted by the background task, in order of occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// The socket is open and the handshake has been queued.
    Opened,
    /// A text frame, parsed.
    Message(ConsoleMessage),
    /// A transport failure. Only reported; a `Closed` may follow.
    Error(String),
    /// The connection is gone. Always the last event.
    Closed,
}

/// Commands accepted by the background task.
#[derive(Debug)]
pub enum ConsoleCommand {
    /// Write a text frame.
    Send(String),
    /// Send a Close frame and stop.
    Close,
}

// ---------------------------------------------------------------------------
// ConsoleHandle
// ---------------------------------------------------------------------------

/// Clonable sender side of a console connection.
///
/// The handle becomes inoperable once the background task has exited;
/// [`ConsoleHandle::send`] then returns [`Error::ChannelClosed`].
#[derive(Clone)]
pub struct ConsoleHandle {
    cmd_tx: mpsc::Sender<ConsoleCommand>,
    state: Arc<RwLock<ConnectionState>>,
}

impl std::fmt::Debug for ConsoleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleHandle")
            .field("connection_state", &self.connection_state())
            .finish()
    }
}

impl ConsoleHandle {
    /// Queue a text frame for the server.
    pub async fn send(&self, text: String) -> Result<()> {
        self.cmd_tx
            .send(ConsoleCommand::Send(text))
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Ask the background task to close the socket.
    ///
    /// Returns immediately. Closing an already closed connection is a no-op.
    pub async fn close(&self) {
        let _ = self.cmd_tx.send(ConsoleCommand::Close).await;
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_open(&self) -> bool {
        self.connection_state() == ConnectionState::Open
    }
}

/// A handle wired to a plain channel instead of a socket task.
///
/// The receiver observes every command the handle sends.
#[cfg(any(test, feature = "test-helpers"))]
pub fn test_handle(state: ConnectionState) -> (ConsoleHandle, mpsc::Receiver<ConsoleCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
    let handle = ConsoleHandle {
        cmd_tx,
        state: Arc::new(RwLock::new(state)),
    };
    (handle, cmd_rx)
}

fn set_state(state: &RwLock<ConnectionState>, next: ConnectionState) {
    let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
    *guard = next;
}

// ---------------------------------------------------------------------------
// ConsoleClient
// ---------------------------------------------------------------------------

/// One streaming console connection.
pub struct ConsoleClient {
    handle: ConsoleHandle,
    event_rx: mpsc::Receiver<ConsoleEvent>,
}

impl ConsoleClient {
    /// Start connecting to `url` and return immediately.
    ///
    /// Must be called from within a Tokio runtime. The outcome of the
    /// connection attempt is reported on the event channel: `Opened` on
    /// success, `Error` followed by `Closed` on failure.
    pub fn connect(url: &Url, handshake: String) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ConsoleCommand>(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<ConsoleEvent>(EVENT_CHANNEL_CAPACITY);
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));

        tokio::spawn(run_console_task(
            url.to_string(),
            handshake,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
        ));

        Self {
            handle: ConsoleHandle { cmd_tx, state },
            event_rx,
        }
    }

    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<ConsoleEvent> {
        &mut self.event_rx
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.handle.connection_state()
    }

    /// Split into the sending handle and the event receiver.
    pub fn into_parts(self) -> (ConsoleHandle, mpsc::Receiver<ConsoleEvent>) {
        (self.handle, self.event_rx)
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_console_task(
    url: String,
    handshake: String,
    mut cmd_rx: mpsc::Receiver<ConsoleCommand>,
    event_tx: mpsc::Sender<ConsoleEvent>,
    state: Arc<RwLock<ConnectionState>>,
) {
    info!("Console: connecting to {}", url);

    match connect_async(url.as_str()).await {
        Ok((ws_stream, _response)) => {
            set_state(&state, ConnectionState::Open);
            emit(&event_tx, ConsoleEvent::Opened).await;
            run_io_loop(ws_stream, handshake, &mut cmd_rx, &event_tx).await;
        }
        Err(err) => {
            warn!("Console: failed to connect to {}: {}", url, err);
            emit(&event_tx, ConsoleEvent::Error(err.to_string())).await;
        }
    }

    set_state(&state, ConnectionState::Closed);
    emit(&event_tx, ConsoleEvent::Closed).await;
    debug!("Console background task exiting");
}

/// Run the read/write select loop until either side closes.
async fn run_io_loop(
    ws_stream: WsStream,
    handshake: String,
    cmd_rx: &mut mpsc::Receiver<ConsoleCommand>,
    event_tx: &mpsc::Sender<ConsoleEvent>,
) {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    if let Err(err) = ws_sink.send(WsMessage::Text(handshake.into())).await {
        warn!("Console: failed to send handshake: {}", err);
        emit(event_tx, ConsoleEvent::Error(err.to_string())).await;
        return;
    }

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        let message = parse_console_message(text.as_str());
                        trace!("Console: {}", message.summary());
                        emit(event_tx, ConsoleEvent::Message(message)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Console: received Close frame");
                        return;
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary
                    }
                    Some(Err(err)) => {
                        warn!("Console: WebSocket read error: {}", err);
                        emit(event_tx, ConsoleEvent::Error(err.to_string())).await;
                        return;
                    }
                    None => {
                        debug!("Console: WebSocket stream ended");
                        return;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ConsoleCommand::Send(text)) => {
                        if let Err(err) = ws_sink.send(WsMessage::Text(text.into())).await {
                            warn!("Console: failed to send frame: {}", err);
                            emit(event_tx, ConsoleEvent::Error(err.to_string())).await;
                        }
                    }
                    Some(ConsoleCommand::Close) => {
                        send_close(&mut ws_sink).await;
                        return;
                    }
                    None => {
                        debug!("Console: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        return;
                    }
                }
            }
        }
    }
}

async fn emit(event_tx: &mpsc::Sender<ConsoleEvent>, event: ConsoleEvent) {
    if event_tx.send(event).await.is_err() {
        trace!("Console: event receiver dropped");
    }
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
