//! Main TUI runner - entry point and event loop

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use lime_app::actions::handle_action;
use lime_app::message::Message;
use lime_app::process::process_message;
use lime_app::section::Section;
use lime_app::{AppState, Settings, UpdateAction};
use lime_client::{ControlApi, HttpControlApi};
use lime_core::prelude::*;
use lime_core::ServerEndpoints;

use crate::startup::{self, StartupAction};
use crate::{event, render, terminal};

/// Run the console until the user quits
pub async fn run(
    settings: Settings,
    endpoints: ServerEndpoints,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // Install panic hook for terminal restoration
    terminal::install_panic_hook();

    info!("LIME console starting against {}", endpoints.base());
    let api = Arc::new(HttpControlApi::new(endpoints.clone()));
    let tick = Duration::from_millis(settings.ui.tick_ms);

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    let mut state = AppState::new(settings, endpoints);

    // Initialize terminal
    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;

    match startup::startup(config_path.as_deref()) {
        StartupAction::Message(message) => process_message(&mut state, message, &msg_tx, &api),
        StartupAction::Action(action) => handle_action(action, msg_tx.clone(), &api),
    }

    let result = run_loop(&mut term, &mut state, msg_rx, msg_tx, &api, tick);

    // Close the console socket, if any, before leaving
    if let Some(UpdateAction::CloseConsole { handle }) = state.qos.deactivate() {
        handle.close().await;
    }

    // Restore terminal
    ratatui::restore();
    info!("LIME console stopped");

    result
}

/// Main event loop
fn run_loop<A>(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: mpsc::Sender<Message>,
    api: &Arc<A>,
    tick: Duration,
) -> Result<()>
where
    A: ControlApi + Sync + 'static,
{
    while !state.should_quit() {
        // Results of background tasks
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, &msg_tx, api);
        }

        // Render
        terminal.draw(|frame| render::view(frame, state))?;

        // Handle terminal events
        if let Some(message) = event::poll(tick)? {
            process_message(state, message, &msg_tx, api);
        }
    }

    Ok(())
}
