//! Configuration page: job table, JSON preview and inline rename
//!
//! Row data and selection live in the document and the control table; this
//! page only carries what the editor needs between key presses.

use lime_core::prelude::*;
use lime_core::ConfigDocument;

use crate::handler::UpdateAction;
use crate::section::{Section, SectionContext};

/// In-progress rename of one job row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEditor {
    pub index: usize,
    pub buffer: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigPage {
    pub rename: Option<RenameEditor>,
    /// First visible line of the JSON preview
    pub preview_scroll: u16,
}

impl ConfigPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_renaming(&self) -> bool {
        self.rename.is_some()
    }

    /// Open the editor on row `index`, prefilled with its current id
    pub fn start_rename(&mut self, doc: &ConfigDocument, index: usize) -> bool {
        if index >= doc.job_count() {
            return false;
        }
        let current = doc.job_id_at(index).unwrap_or_default().to_string();
        self.rename = Some(RenameEditor {
            index,
            buffer: current,
        });
        true
    }

    pub fn input(&mut self, c: char) {
        if let Some(editor) = &mut self.rename {
            editor.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(editor) = &mut self.rename {
            editor.buffer.pop();
        }
    }

    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    /// Apply the edit to `doc`. The editor stays open on error.
    pub fn commit_rename(&mut self, doc: &mut ConfigDocument) -> Result<String> {
        let editor = self
            .rename
            .as_ref()
            .ok_or_else(|| Error::invalid_job_id("no rename in progress"))?;
        doc.rename_job(editor.index, &editor.buffer)?;
        let new_id = editor.buffer.trim().to_string();
        self.rename = None;
        Ok(new_id)
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }

    pub fn scroll_preview_down(&mut self, line_count: usize) {
        if usize::from(self.preview_scroll) + 1 < line_count {
            self.preview_scroll = self.preview_scroll.saturating_add(1);
        }
    }
}

impl Section for ConfigPage {
    fn activate(&mut self, ctx: &SectionContext<'_>) -> Option<UpdateAction> {
        debug!("Configuration activated ({} jobs)", ctx.doc.job_count());
        self.preview_scroll = 0;
        None
    }

    fn deactivate(&mut self) -> Option<UpdateAction> {
        self.rename = None;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> ConfigDocument {
        ConfigDocument::new(json!({ "jobs": [{ "job_id": "a" }, { "job_id": "b" }] }))
    }

    #[test]
    fn test_rename_flow() {
        let mut doc = doc();
        let mut page = ConfigPage::new();

        assert!(page.start_rename(&doc, 1));
        assert_eq!(page.rename.as_ref().unwrap().buffer, "b");
        page.backspace();
        for c in "dd.1".chars() {
            page.input(c);
        }

        assert_eq!(page.commit_rename(&mut doc).unwrap(), "dd.1");
        assert!(!page.is_renaming());
        assert_eq!(doc.job_ids(), vec!["a", "dd.1"]);
    }

    #[test]
    fn test_rename_to_duplicate_keeps_editor_open() {
        let mut doc = doc();
        let mut page = ConfigPage::new();
        page.start_rename(&doc, 1);
        page.backspace();
        page.input('a');

        let err = page.commit_rename(&mut doc).unwrap_err();
        assert!(matches!(err, Error::DuplicateJob { .. }));
        assert!(page.is_renaming());
        assert_eq!(doc.job_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_rename_out_of_range() {
        let doc = doc();
        let mut page = ConfigPage::new();
        assert!(!page.start_rename(&doc, 5));
    }

    #[test]
    fn test_deactivate_cancels_rename() {
        let doc = doc();
        let mut page = ConfigPage::new();
        page.start_rename(&doc, 0);
        assert!(page.deactivate().is_none());
        assert!(!page.is_renaming());
    }

    #[test]
    fn test_preview_scroll_bounds() {
        let mut page = ConfigPage::new();
        page.scroll_preview_up();
        assert_eq!(page.preview_scroll, 0);
        page.scroll_preview_down(2);
        page.scroll_preview_down(2);
        assert_eq!(page.preview_scroll, 1);
    }
}
