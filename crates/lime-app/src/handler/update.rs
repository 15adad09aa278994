//! Main update function - handles state transitions (TEA pattern)

use chrono::Utc;

use lime_core::prelude::*;

use crate::message::Message;
use crate::result_page::ResultPage;
use crate::state::{AppPhase, AppState, Focus};

use super::{keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Startup
        // ─────────────────────────────────────────────────────────
        Message::ConfigLoaded { doc } => UpdateResult::maybe_action(state.load_config(doc)),

        Message::ConfigLoadFailed { error } => {
            error!("failed to load configuration: {}", error);
            state.set_error(format!("Failed to load configuration: {error}"));
            state.load_error = Some(error);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::ToggleFocus => {
            state.focus = match state.focus {
                Focus::Navigation => Focus::Page,
                Focus::Page => Focus::Navigation,
            };
            UpdateResult::none()
        }

        Message::NavUp => {
            state.navigation.cursor_up();
            UpdateResult::none()
        }

        Message::NavDown => {
            state.navigation.cursor_down();
            UpdateResult::none()
        }

        Message::NavActivate => match state.navigation.cursor_key() {
            Some(key) => UpdateResult::message(Message::ActivateSection(key)),
            None => UpdateResult::none(),
        },

        Message::ActivateSection(key) => {
            UpdateResult::maybe_action(state.activate_section(key))
        }

        // ─────────────────────────────────────────────────────────
        // Configuration page
        // ─────────────────────────────────────────────────────────
        Message::RowUp => {
            state.control_table.cursor_up();
            UpdateResult::none()
        }

        Message::RowDown => {
            state.control_table.cursor_down(state.doc.job_count());
            UpdateResult::none()
        }

        Message::SelectOnly => {
            let cursor = state.control_table.cursor;
            if cursor < state.doc.job_count() {
                state.control_table.select_only(cursor);
            }
            UpdateResult::none()
        }

        Message::ToggleSelect => {
            let cursor = state.control_table.cursor;
            if cursor < state.doc.job_count() {
                state.control_table.toggle(cursor);
            }
            UpdateResult::none()
        }

        Message::MoveRow(direction) => {
            if state
                .control_table
                .move_selected(&mut state.doc, direction)
                .is_none()
            {
                state.set_status("Nothing to move: select exactly one row away from the edge");
            }
            UpdateResult::none()
        }

        Message::AddRow => {
            match state.control_table.add(&mut state.doc) {
                Some(index) => {
                    let job_id = state.doc.job_id_at(index).unwrap_or_default().to_string();
                    state.set_status(format!("Added {job_id}"));
                }
                None => state.set_error("Configuration has no job list to add to"),
            }
            UpdateResult::none()
        }

        Message::RemoveRow => {
            match state.control_table.remove_selected(&mut state.doc) {
                Some(removed) => {
                    let job_id = removed
                        .get(lime_core::JOB_ID_KEY)
                        .and_then(|v| v.as_str())
                        .unwrap_or("row")
                        .to_string();
                    state.set_status(format!("Removed {job_id}"));
                }
                None => state.set_status("Select exactly one row to remove"),
            }
            UpdateResult::none()
        }

        Message::PreviewUp => {
            state.config_page.scroll_preview_up();
            UpdateResult::none()
        }

        Message::PreviewDown => {
            let lines = state.doc.serialized().lines().count();
            state.config_page.scroll_preview_down(lines);
            UpdateResult::none()
        }

        Message::StartRename => {
            let cursor = state.control_table.cursor;
            if !state.config_page.start_rename(&state.doc, cursor) {
                state.set_status("No job row to rename");
            }
            UpdateResult::none()
        }

        Message::RenameInput(c) => {
            state.config_page.input(c);
            UpdateResult::none()
        }

        Message::RenameBackspace => {
            state.config_page.backspace();
            UpdateResult::none()
        }

        Message::RenameCancel => {
            state.config_page.cancel_rename();
            UpdateResult::none()
        }

        Message::RenameCommit => {
            match state.config_page.commit_rename(&mut state.doc) {
                Ok(job_id) => state.set_status(format!("Renamed to {job_id}")),
                Err(e) => {
                    warn!("rename rejected: {}", e);
                    state.set_error(e.to_string());
                }
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Toolbar
        // ─────────────────────────────────────────────────────────
        Message::SaveConfig => match state.control_table.begin_save(&state.doc) {
            Some(body) => {
                state.set_status("Saving configuration...");
                UpdateResult::action(UpdateAction::SaveConfig { body })
            }
            None => {
                state.set_status("No changes to save");
                UpdateResult::none()
            }
        },

        Message::SaveCompleted { body } => {
            state.control_table.finish_save(&body, true);
            info!("configuration saved");
            state.set_status("Configuration saved");
            UpdateResult::none()
        }

        Message::SaveFailed { body, error } => {
            state.control_table.finish_save(&body, false);
            error!("save failed: {}", error);
            state.set_error(format!("Save failed: {error}"));
            UpdateResult::none()
        }

        Message::CopyConfig => UpdateResult::action(UpdateAction::CopyToClipboard {
            text: state.control_table.copy_text(&state.doc),
        }),

        Message::CopyCompleted => {
            state.set_status("Configuration copied to clipboard");
            UpdateResult::none()
        }

        Message::CopyFailed { error } => {
            warn!("copy failed: {}", error);
            state.set_error(format!("Copy failed: {error}"));
            UpdateResult::none()
        }

        Message::RunConfig => handle_run(state),

        Message::RunCompleted { result } => {
            state.control_table.finish_run();
            if let Some(page) = state.results.get_mut(result) {
                page.finish(Ok(()), Utc::now());
                info!("run {} finished", page.workspace);
            }
            state.set_status("Run finished");
            UpdateResult::none()
        }

        Message::RunFailed { result, error } => {
            state.control_table.finish_run();
            if let Some(page) = state.results.get_mut(result) {
                page.finish(Err(error.clone()), Utc::now());
            }
            error!("run failed: {}", error);
            state.set_error(format!("Run failed: {error}"));
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // QoS page
        // ─────────────────────────────────────────────────────────
        Message::JobUp => {
            state.qos.select_up();
            UpdateResult::none()
        }

        Message::JobDown => {
            state.qos.select_down();
            UpdateResult::none()
        }

        Message::AdjustRate(steps) => match state.qos.adjust_rate(steps) {
            Ok(action) => UpdateResult::action(action),
            Err(e) => {
                state.set_error(e.to_string());
                UpdateResult::none()
            }
        },

        Message::ConsoleAttached { id, handle } => {
            UpdateResult::maybe_action(state.qos.attach(id, handle))
        }

        Message::Console { id, event } => {
            state.qos.handle_event(id, event);
            UpdateResult::none()
        }
    }
}

/// Start a run: latch, result entry, switch to it, then post
fn handle_run(state: &mut AppState) -> UpdateResult {
    let now = Utc::now();
    let Some(request) = state.control_table.begin_run(&state.doc, now) else {
        state.set_status("A run is already in progress");
        return UpdateResult::none();
    };

    let body = match request.to_body() {
        Ok(body) => body,
        Err(e) => {
            state.control_table.finish_run();
            state.set_error(format!("Run failed: {e}"));
            return UpdateResult::none();
        }
    };

    let index = state.results.len();
    state
        .results
        .push(ResultPage::new(request.workspace.clone(), now));
    let key = state.navigation.add_result(request.workspace.clone());
    info!("starting run {}", request.workspace);
    state.set_status(format!("Running {}", request.workspace));

    let mut actions: Vec<UpdateAction> = state.activate_section(key).into_iter().collect();
    actions.push(UpdateAction::RunConfig {
        result: index,
        body,
    });
    UpdateResult::maybe_action(UpdateAction::sequence(actions))
}
