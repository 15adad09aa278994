//! One page per run, titled with the run's workspace timestamp

use chrono::{DateTime, Utc};

use lime_core::prelude::*;

use crate::handler::UpdateAction;
use crate::section::{Section, SectionContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ResultPage {
    pub workspace: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ResultPage {
    pub fn new(workspace: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            workspace: workspace.into(),
            status: RunStatus::Running,
            started_at,
            finished_at: None,
        }
    }

    pub fn finish(&mut self, outcome: std::result::Result<(), String>, at: DateTime<Utc>) {
        self.status = match outcome {
            Ok(()) => RunStatus::Succeeded,
            Err(error) => RunStatus::Failed(error),
        };
        self.finished_at = Some(at);
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.finished_at.unwrap_or(now) - self.started_at
    }
}

impl Section for ResultPage {
    fn activate(&mut self, _ctx: &SectionContext<'_>) -> Option<UpdateAction> {
        debug!("showing result {}", self.workspace);
        None
    }

    fn deactivate(&mut self) -> Option<UpdateAction> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_finish_records_outcome() {
        let start = Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap();
        let mut page = ResultPage::new("2017-06-01T12:00:00.000Z", start);
        assert_eq!(page.status, RunStatus::Running);

        let end = Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 30).unwrap();
        page.finish(Err("HTTP request failed: 500".into()), end);
        assert_eq!(page.status, RunStatus::Failed("HTTP request failed: 500".into()));
        assert_eq!(page.elapsed(end).num_seconds(), 30);
    }

    #[test]
    fn test_elapsed_while_running() {
        let start = Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap();
        let page = ResultPage::new("w", start);
        let now = Utc.with_ymd_and_hms(2017, 6, 1, 12, 1, 0).unwrap();
        assert_eq!(page.elapsed(now).num_seconds(), 60);
    }
}
