//! Control-table controller
//!
//! Backs the configuration toolbar: row moves, add/remove, save, copy and
//! run. Save is driven by textual comparison of the serialized document
//! against the last serialization the server acknowledged; run is guarded
//! by a latch that clears whatever the outcome.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use lime_core::prelude::*;
use lime_core::{ConfigDocument, Direction, RunRequest};

#[derive(Debug, Clone, Default)]
pub struct ControlTable {
    /// Selected row indices
    pub selection: BTreeSet<usize>,
    /// Highlighted row
    pub cursor: usize,
    /// Last serialization acknowledged by the save endpoint
    saved: String,
    /// Body of the save request currently on the wire
    save_in_flight: Option<String>,
    running: bool,
}

impl ControlTable {
    /// Start from a freshly loaded document, which counts as saved
    pub fn new(doc: &ConfigDocument) -> Self {
        Self {
            saved: doc.serialized(),
            ..Self::default()
        }
    }

    // ── Selection ───────────────────────────────────────────

    /// Make `index` the only selected row
    pub fn select_only(&mut self, index: usize) {
        self.selection.clear();
        self.selection.insert(index);
        self.cursor = index;
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.selection.remove(&index) {
            self.selection.insert(index);
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    /// The selected row when exactly one is selected
    pub fn single_selected(&self) -> Option<usize> {
        if self.selection.len() == 1 {
            self.selection.iter().next().copied()
        } else {
            None
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    /// Keep cursor and selection inside a list of `row_count` rows
    pub fn clamp(&mut self, row_count: usize) {
        self.selection.retain(|&i| i < row_count);
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }

    // ── Row operations ──────────────────────────────────────

    /// Move the single selected row; the selection follows it
    pub fn move_selected(&mut self, doc: &mut ConfigDocument, direction: Direction) -> Option<usize> {
        let moved = doc.move_row(&self.selection, direction)?;
        self.select_only(moved);
        Some(moved)
    }

    /// Remove the single selected row
    pub fn remove_selected(&mut self, doc: &mut ConfigDocument) -> Option<Value> {
        let removed = doc.remove_row(&self.selection)?;
        self.selection.clear();
        self.clamp(doc.job_count());
        Some(removed)
    }

    /// Add a job after the single selected row (or at the end) and select it
    pub fn add(&mut self, doc: &mut ConfigDocument) -> Option<usize> {
        let index = doc.add_row(self.single_selected())?;
        self.select_only(index);
        Some(index)
    }

    // ── Save ────────────────────────────────────────────────

    pub fn is_dirty(&self, doc: &ConfigDocument) -> bool {
        doc.serialized() != self.saved
    }

    /// Body to transmit, or `None` when the server already has it or the
    /// same body is on the wire
    pub fn begin_save(&mut self, doc: &ConfigDocument) -> Option<String> {
        let body = doc.serialized();
        if body == self.saved {
            debug!("save skipped: configuration unchanged");
            return None;
        }
        if self.save_in_flight.as_deref() == Some(body.as_str()) {
            debug!("save skipped: identical request in flight");
            return None;
        }
        self.save_in_flight = Some(body.clone());
        Some(body)
    }

    /// Record the outcome of a save request for `body`
    pub fn finish_save(&mut self, body: &str, ok: bool) {
        if self.save_in_flight.as_deref() == Some(body) {
            self.save_in_flight = None;
        }
        if ok {
            self.saved = body.to_string();
        }
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight.is_some()
    }

    /// Text placed on the clipboard by the copy action
    pub fn copy_text(&self, doc: &ConfigDocument) -> String {
        doc.serialized()
    }

    // ── Run ─────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set the run latch and build the request, unless a run is outstanding
    pub fn begin_run(&mut self, doc: &ConfigDocument, now: DateTime<Utc>) -> Option<RunRequest> {
        if self.running {
            debug!("run ignored: a run is already in progress");
            return None;
        }
        self.running = true;
        Some(RunRequest::new(doc, now))
    }

    /// Clear the run latch; called on success and on failure
    pub fn finish_run(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn doc(ids: &[&str]) -> ConfigDocument {
        let jobs: Vec<Value> = ids.iter().map(|id| json!({ "job_id": id })).collect();
        ConfigDocument::new(json!({ "jobs": jobs }))
    }

    #[test]
    fn test_fresh_table_is_clean() {
        let doc = doc(&["a"]);
        let table = ControlTable::new(&doc);
        assert!(!table.is_dirty(&doc));
    }

    #[test]
    fn test_move_requires_single_selection() {
        let mut doc = doc(&["a", "b", "c"]);
        let mut table = ControlTable::new(&doc);

        assert_eq!(table.move_selected(&mut doc, Direction::Down), None);

        table.toggle(0);
        table.toggle(1);
        assert_eq!(table.move_selected(&mut doc, Direction::Down), None);
        assert_eq!(doc.job_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_selection_follows_row() {
        let mut doc = doc(&["a", "b", "c"]);
        let mut table = ControlTable::new(&doc);
        table.select_only(0);

        assert_eq!(table.move_selected(&mut doc, Direction::Down), Some(1));
        assert_eq!(doc.job_ids(), vec!["b", "a", "c"]);
        assert_eq!(table.single_selected(), Some(1));
        assert!(table.is_dirty(&doc));
    }

    #[test]
    fn test_move_at_boundary_is_no_change() {
        let mut doc = doc(&["a", "b"]);
        let mut table = ControlTable::new(&doc);

        table.select_only(0);
        assert_eq!(table.move_selected(&mut doc, Direction::Up), None);
        table.select_only(1);
        assert_eq!(table.move_selected(&mut doc, Direction::Down), None);
        assert!(!table.is_dirty(&doc));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut doc = doc(&["a", "b"]);
        let mut table = ControlTable::new(&doc);
        table.select_only(1);

        let removed = table.remove_selected(&mut doc).unwrap();
        assert_eq!(removed, json!({ "job_id": "b" }));
        assert!(table.selection.is_empty());
        assert_eq!(table.cursor, 0);
    }

    #[test]
    fn test_add_after_selection_selects_new_row() {
        let mut doc = doc(&["job_0", "b"]);
        let mut table = ControlTable::new(&doc);
        table.select_only(0);

        assert_eq!(table.add(&mut doc), Some(1));
        assert_eq!(doc.job_ids(), vec!["job_0", "job_1", "b"]);
        assert_eq!(table.single_selected(), Some(1));
    }

    #[test]
    fn test_save_skipped_when_unchanged() {
        let doc = doc(&["a"]);
        let mut table = ControlTable::new(&doc);
        assert_eq!(table.begin_save(&doc), None);
    }

    #[test]
    fn test_save_cycle_clears_dirty() {
        let mut doc = doc(&["a", "b"]);
        let mut table = ControlTable::new(&doc);
        table.select_only(0);
        table.move_selected(&mut doc, Direction::Down);

        let body = table.begin_save(&doc).unwrap();
        assert!(table.save_in_flight());
        // Second press while the first is on the wire
        assert_eq!(table.begin_save(&doc), None);

        table.finish_save(&body, true);
        assert!(!table.save_in_flight());
        assert!(!table.is_dirty(&doc));
        assert_eq!(table.begin_save(&doc), None);
    }

    #[test]
    fn test_failed_save_stays_dirty() {
        let mut doc = doc(&["a"]);
        let mut table = ControlTable::new(&doc);
        table.add(&mut doc);

        let body = table.begin_save(&doc).unwrap();
        table.finish_save(&body, false);

        assert!(table.is_dirty(&doc));
        assert_eq!(table.begin_save(&doc), Some(body));
    }

    #[test]
    fn test_run_latch() {
        let doc = doc(&["a"]);
        let mut table = ControlTable::new(&doc);
        let now = Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap();

        let request = table.begin_run(&doc, now).unwrap();
        assert_eq!(request.workspace, "2017-06-01T12:00:00.000Z");
        assert!(table.is_running());
        assert!(table.begin_run(&doc, now).is_none());

        table.finish_run();
        assert!(!table.is_running());
        assert!(table.begin_run(&doc, now).is_some());
    }

    #[test]
    fn test_copy_text_is_serialized_config() {
        let doc = doc(&["a"]);
        let table = ControlTable::new(&doc);
        assert_eq!(table.copy_text(&doc), doc.serialized());
    }
}
