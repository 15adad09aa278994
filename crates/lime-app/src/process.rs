//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and
//! hands every resulting action to the action dispatcher.

use std::sync::Arc;

use tokio::sync::mpsc;

use lime_client::ControlApi;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<A>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    api: &Arc<A>,
) where
    A: ControlApi + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), api);
        }

        msg = result.message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use lime_client::console::test_handle;
    use lime_client::{ConnectionState, ConsoleCommand};
    use lime_core::{ConfigDocument, Direction, Error, RateControl, Result, ServerEndpoints};
    use serde_json::{json, Value};

    use crate::handler::{update, UpdateAction};
    use crate::navigation::SectionKey;
    use crate::result_page::RunStatus;
    use crate::settings::Settings;

    /// Records every call; run and save fail on request
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
        fail_save: bool,
        fail_run: bool,
    }

    impl RecordingApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    impl ControlApi for RecordingApi {
        async fn save(&self, _body: String) -> Result<()> {
            self.record("save");
            if self.fail_save {
                return Err(Error::http("HTTP 500 Internal Server Error"));
            }
            Ok(())
        }

        async fn run(&self, _body: String) -> Result<()> {
            self.record("run");
            if self.fail_run {
                return Err(Error::http("HTTP 502 Bad Gateway"));
            }
            Ok(())
        }

        async fn fetch_config(&self) -> Result<Value> {
            self.record("fetch_config");
            Ok(json!({ "jobs": [{ "job_id": "job_0" }] }))
        }
    }

    /// Notes, when `run` is called, whether the console was already told
    /// to close
    struct CloseAwareApi {
        commands: Mutex<mpsc::Receiver<ConsoleCommand>>,
        closed_before_run: Mutex<Option<bool>>,
    }

    impl ControlApi for CloseAwareApi {
        async fn save(&self, _body: String) -> Result<()> {
            Ok(())
        }

        async fn run(&self, _body: String) -> Result<()> {
            let closed = matches!(
                self.commands.lock().unwrap().try_recv(),
                Ok(ConsoleCommand::Close)
            );
            *self.closed_before_run.lock().unwrap() = Some(closed);
            Ok(())
        }

        async fn fetch_config(&self) -> Result<Value> {
            Ok(json!({ "jobs": [] }))
        }
    }

    /// Loaded state on the Configuration page, built without spawning the
    /// QoS console
    fn configuration_state() -> AppState {
        let mut state = AppState::new(
            Settings::default(),
            ServerEndpoints::parse("http://127.0.0.1:9").unwrap(),
        );
        let doc = ConfigDocument::new(json!({
            "jobs": [{ "job_id": "job_0" }, { "job_id": "job_1" }]
        }));
        update(&mut state, Message::ConfigLoaded { doc });
        update(&mut state, Message::ActivateSection(SectionKey::Configuration));
        state
    }

    async fn next_message(rx: &mut mpsc::Receiver<Message>) -> Message {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("message channel closed")
    }

    #[tokio::test]
    async fn test_identical_save_is_sent_once() {
        let api = Arc::new(RecordingApi::default());
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let mut state = configuration_state();
        update(&mut state, Message::SelectOnly);
        update(&mut state, Message::MoveRow(Direction::Down));

        process_message(&mut state, Message::SaveConfig, &msg_tx, &api);
        process_message(&mut state, Message::SaveConfig, &msg_tx, &api);

        let reply = next_message(&mut msg_rx).await;
        assert!(matches!(reply, Message::SaveCompleted { .. }));
        process_message(&mut state, reply, &msg_tx, &api);

        assert_eq!(api.calls(), vec!["save"]);
        assert!(!state.is_dirty());

        process_message(&mut state, Message::SaveConfig, &msg_tx, &api);
        assert_eq!(api.calls(), vec!["save"]);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_changes_pending() {
        let api = Arc::new(RecordingApi {
            fail_save: true,
            ..Default::default()
        });
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let mut state = configuration_state();
        update(&mut state, Message::AddRow);

        process_message(&mut state, Message::SaveConfig, &msg_tx, &api);
        let reply = next_message(&mut msg_rx).await;
        assert!(matches!(reply, Message::SaveFailed { .. }));
        process_message(&mut state, reply, &msg_tx, &api);

        assert!(state.is_dirty());
        assert!(!state.control_table.save_in_flight());
    }

    #[tokio::test]
    async fn test_run_latch_clears_after_failed_run() {
        let api = Arc::new(RecordingApi {
            fail_run: true,
            ..Default::default()
        });
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let mut state = configuration_state();

        process_message(&mut state, Message::RunConfig, &msg_tx, &api);
        process_message(&mut state, Message::RunConfig, &msg_tx, &api);
        assert!(state.control_table.is_running());

        let reply = next_message(&mut msg_rx).await;
        assert!(matches!(reply, Message::RunFailed { result: 0, .. }));
        process_message(&mut state, reply, &msg_tx, &api);

        assert_eq!(api.calls(), vec!["run"]);
        assert!(!state.control_table.is_running());
        assert!(matches!(state.results[0].status, RunStatus::Failed(_)));
        assert_eq!(state.active_section(), Some(SectionKey::Result(0)));
    }

    #[tokio::test]
    async fn test_fetch_config_reports_loaded_document() {
        let api = Arc::new(RecordingApi::default());
        let (msg_tx, mut msg_rx) = mpsc::channel(16);

        handle_action(UpdateAction::FetchConfig, msg_tx, &api);

        match next_message(&mut msg_rx).await {
            Message::ConfigLoaded { doc } => assert_eq!(doc.job_ids(), vec!["job_0"]),
            other => panic!("expected ConfigLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_control_is_written_to_console() {
        let api = Arc::new(RecordingApi::default());
        let (msg_tx, _msg_rx) = mpsc::channel(16);
        let (handle, mut cmd_rx) = test_handle(ConnectionState::Open);

        handle_action(
            UpdateAction::SendRateControl {
                handle,
                control: RateControl {
                    job_id: "job_0".into(),
                    rate: 15.0,
                },
            },
            msg_tx,
            &api,
        );

        match tokio::time::timeout(Duration::from_secs(5), cmd_rx.recv()).await {
            Ok(Some(ConsoleCommand::Send(text))) => {
                let value: Value = serde_json::from_str(&text).unwrap();
                assert_eq!(value["job_id"], "job_0");
                assert_eq!(value["rate"], 15.0);
            }
            other => panic!("expected Send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_console_sends_close_command() {
        let api = Arc::new(RecordingApi::default());
        let (msg_tx, _msg_rx) = mpsc::channel(16);
        let (handle, mut cmd_rx) = test_handle(ConnectionState::Open);

        handle_action(UpdateAction::CloseConsole { handle }, msg_tx, &api);

        let command = tokio::time::timeout(Duration::from_secs(5), cmd_rx.recv())
            .await
            .unwrap();
        assert!(matches!(command, Some(ConsoleCommand::Close)));
    }

    #[tokio::test]
    async fn test_sequence_closes_console_before_run_is_posted() {
        let (handle, cmd_rx) = test_handle(ConnectionState::Open);
        let api = Arc::new(CloseAwareApi {
            commands: Mutex::new(cmd_rx),
            closed_before_run: Mutex::new(None),
        });
        let (msg_tx, mut msg_rx) = mpsc::channel(16);

        handle_action(
            UpdateAction::Sequence(vec![
                UpdateAction::CloseConsole { handle },
                UpdateAction::RunConfig {
                    result: 0,
                    body: "{}".to_string(),
                },
            ]),
            msg_tx,
            &api,
        );

        let reply = next_message(&mut msg_rx).await;
        assert!(matches!(reply, Message::RunCompleted { result: 0 }));
        assert_eq!(*api.closed_before_run.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_nested_sequence_runs_every_part_in_order() {
        let api = Arc::new(RecordingApi::default());
        let (msg_tx, mut msg_rx) = mpsc::channel(16);

        handle_action(
            UpdateAction::Sequence(vec![
                UpdateAction::Sequence(vec![UpdateAction::SaveConfig {
                    body: "{}".to_string(),
                }]),
                UpdateAction::RunConfig {
                    result: 3,
                    body: "{}".to_string(),
                },
            ]),
            msg_tx,
            &api,
        );

        assert!(matches!(
            next_message(&mut msg_rx).await,
            Message::SaveCompleted { .. }
        ));
        assert!(matches!(
            next_message(&mut msg_rx).await,
            Message::RunCompleted { result: 3 }
        ));
        assert_eq!(api.calls(), vec!["save", "run"]);
    }
}
