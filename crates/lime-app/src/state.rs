//! Application state (Model in TEA pattern)

use lime_core::prelude::*;
use lime_core::{ConfigDocument, ServerEndpoints};

use crate::config_page::ConfigPage;
use crate::control_table::ControlTable;
use crate::handler::UpdateAction;
use crate::navigation::{Navigation, SectionKey};
use crate::qos::QosPage;
use crate::result_page::ResultPage;
use crate::section::{Section, SectionContext};
use crate::settings::Settings;

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Waiting for the initial configuration
    #[default]
    Loading,
    Ready,
    Quitting,
}

/// Which pane receives page-level keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Navigation,
    #[default]
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line feedback shown at the bottom of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub text: String,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub settings: Settings,
    pub endpoints: ServerEndpoints,

    /// The configuration being edited; empty until loaded
    pub doc: ConfigDocument,
    pub control_table: ControlTable,
    pub navigation: Navigation,

    pub qos: QosPage,
    pub config_page: ConfigPage,
    pub results: Vec<ResultPage>,

    pub focus: Focus,
    pub status: Option<StatusLine>,
    /// Reason the initial configuration could not be loaded
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings, endpoints: ServerEndpoints) -> Self {
        let doc = ConfigDocument::default();
        Self {
            phase: AppPhase::Loading,
            qos: QosPage::new(&settings.qos),
            settings,
            endpoints,
            control_table: ControlTable::new(&doc),
            doc,
            navigation: Navigation::new(),
            config_page: ConfigPage::new(),
            results: Vec::new(),
            focus: Focus::default(),
            status: None,
            load_error: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn is_ready(&self) -> bool {
        self.phase == AppPhase::Ready
    }

    /// Install the loaded document and bring up the QoS section
    pub fn load_config(&mut self, doc: ConfigDocument) -> Option<UpdateAction> {
        info!("configuration loaded ({} jobs)", doc.job_count());
        self.control_table = ControlTable::new(&doc);
        self.doc = doc;
        self.phase = AppPhase::Ready;
        self.load_error = None;
        self.activate_section(SectionKey::Qos)
    }

    pub fn active_section(&self) -> Option<SectionKey> {
        self.navigation.active()
    }

    /// Switch sections: the outgoing section is torn down before the
    /// incoming one is built. Unknown keys, folders and the already active
    /// section leave everything as it is.
    pub fn activate_section(&mut self, key: SectionKey) -> Option<UpdateAction> {
        let transition = self.navigation.plan_activation(key)?;
        let mut actions = Vec::new();

        if let Some(previous) = transition.deactivate {
            match section_mut(
                &mut self.qos,
                &mut self.config_page,
                &mut self.results,
                previous,
            ) {
                Some(section) => actions.extend(section.deactivate()),
                None => warn!("no section behind {}", previous),
            }
        }

        let ctx = SectionContext {
            doc: &self.doc,
            endpoints: &self.endpoints,
        };
        match section_mut(
            &mut self.qos,
            &mut self.config_page,
            &mut self.results,
            transition.activate,
        ) {
            Some(section) => actions.extend(section.activate(&ctx)),
            None => {
                error!("{}", Error::no_such_node(transition.activate.to_string()));
                return UpdateAction::sequence(actions);
            }
        }

        self.navigation.set_active(transition.activate);
        debug!("activated {}", transition.activate);
        UpdateAction::sequence(actions)
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            level: StatusLevel::Info,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            level: StatusLevel::Error,
            text: text.into(),
        });
    }

    pub fn is_dirty(&self) -> bool {
        self.control_table.is_dirty(&self.doc)
    }
}

fn section_mut<'a>(
    qos: &'a mut QosPage,
    config_page: &'a mut ConfigPage,
    results: &'a mut [ResultPage],
    key: SectionKey,
) -> Option<&'a mut dyn Section> {
    match key {
        SectionKey::Qos => Some(qos as &mut dyn Section),
        SectionKey::Configuration => Some(config_page as &mut dyn Section),
        SectionKey::Result(index) => results.get_mut(index).map(|r| r as &mut dyn Section),
        SectionKey::Results => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(
            Settings::default(),
            ServerEndpoints::parse("http://mds01:24").unwrap(),
        )
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = state();
        assert_eq!(state.phase, AppPhase::Loading);
        assert_eq!(state.active_section(), None);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_load_config_activates_qos() {
        let mut state = state();
        let doc = ConfigDocument::new(json!({ "jobs": [{ "job_id": "job_0" }] }));

        let action = state.load_config(doc);

        assert!(matches!(action, Some(UpdateAction::OpenConsole { .. })));
        assert!(state.is_ready());
        assert_eq!(state.active_section(), Some(SectionKey::Qos));
        assert_eq!(state.qos.board.len(), 1);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_switching_away_from_qos_tears_it_down_first() {
        let mut state = state();
        state.load_config(ConfigDocument::new(json!({ "jobs": [{ "job_id": "a" }] })));
        let first = state.qos.console_id().unwrap();

        state.activate_section(SectionKey::Configuration);
        assert!(state.qos.board.is_empty());
        assert_eq!(state.qos.console_id(), None);
        assert_eq!(state.active_section(), Some(SectionKey::Configuration));

        let action = state.activate_section(SectionKey::Qos);
        match action {
            Some(UpdateAction::OpenConsole { id, .. }) => assert!(id > first),
            other => panic!("expected OpenConsole, got {other:?}"),
        }
        assert_eq!(state.qos.board.len(), 1);
    }

    #[test]
    fn test_activate_missing_result_changes_nothing() {
        let mut state = state();
        state.load_config(ConfigDocument::default());

        assert!(state.activate_section(SectionKey::Result(0)).is_none());
        assert_eq!(state.active_section(), Some(SectionKey::Qos));
        assert!(state.qos.console_id().is_some());
    }
}
