//! The LIME configuration document
//!
//! The console treats the configuration as an opaque JSON document owned by
//! the server. Only the job list is interpreted: it lives at `jobs`, or at
//! `cluster.jobs` when the top-level key is absent. Everything else is carried
//! through untouched and serialized wholesale on save and run.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::prelude::*;

/// Key of a job entry's identifier inside the job list
pub const JOB_ID_KEY: &str = "job_id";

/// Prefix used when generating identifiers for new job rows
const NEW_JOB_PREFIX: &str = "job_";

/// Direction of a row move in the job list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Opaque configuration document with a known job list location
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    value: Value,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl ConfigDocument {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse a document from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Load a document from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let doc = Self::parse(&text)?;
        debug!(
            "Loaded configuration from {:?} ({} jobs)",
            path,
            doc.job_count()
        );
        Ok(doc)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Canonical text form: pretty JSON with four-space indentation.
    ///
    /// Used both as the body of save/run requests and as the basis of the
    /// dirty comparison, so two documents compare equal exactly when this
    /// text is equal.
    pub fn serialized(&self) -> String {
        to_pretty_string(&self.value).unwrap_or_else(|e| {
            warn!("Failed to serialize configuration: {}", e);
            String::new()
        })
    }

    /// The job entries in list order (empty when the document has no list)
    pub fn jobs(&self) -> &[Value] {
        self.jobs_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn job_count(&self) -> usize {
        self.jobs().len()
    }

    /// Identifiers of all job entries that carry a string `job_id`
    pub fn job_ids(&self) -> Vec<String> {
        self.jobs()
            .iter()
            .filter_map(|job| job.get(JOB_ID_KEY).and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Identifier of the job at `index`, if it has one
    pub fn job_id_at(&self, index: usize) -> Option<&str> {
        self.jobs()
            .get(index)
            .and_then(|job| job.get(JOB_ID_KEY))
            .and_then(Value::as_str)
    }

    /// Swap the single selected row with its neighbour.
    ///
    /// Returns the new index of the moved row, or `None` for "no change":
    /// the selection does not hold exactly one row, the index is out of
    /// range, or the row already sits at the boundary.
    pub fn move_row(&mut self, selection: &BTreeSet<usize>, direction: Direction) -> Option<usize> {
        let index = single_selection(selection)?;
        let jobs = self.jobs_mut()?;

        if index >= jobs.len() {
            error!("invalid selected index {} ({} rows)", index, jobs.len());
            return None;
        }

        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => {
                if index + 1 == jobs.len() {
                    return None;
                }
                index + 1
            }
        };

        jobs.swap(index, target);
        Some(target)
    }

    /// Remove the single selected row and return it
    pub fn remove_row(&mut self, selection: &BTreeSet<usize>) -> Option<Value> {
        let index = single_selection(selection)?;
        let jobs = self.jobs_mut()?;
        if index >= jobs.len() {
            error!("invalid selected index {} ({} rows)", index, jobs.len());
            return None;
        }
        Some(jobs.remove(index))
    }

    /// Insert a fresh job row after `after` (or at the end).
    ///
    /// The new row gets the smallest unused `job_<n>` identifier. A `jobs`
    /// list is created when the document has none. Returns the new row's
    /// index, or `None` when the document root is not an object.
    pub fn add_row(&mut self, after: Option<usize>) -> Option<usize> {
        let job_id = self.unused_job_id();
        let jobs = self.jobs_mut_or_create()?;

        let index = match after {
            Some(i) if i < jobs.len() => i + 1,
            _ => jobs.len(),
        };

        let mut entry = Map::new();
        entry.insert(JOB_ID_KEY.to_string(), Value::String(job_id));
        jobs.insert(index, Value::Object(entry));
        Some(index)
    }

    /// Change the identifier of the job at `index`.
    ///
    /// Identifiers must be non-empty and unique across the list.
    pub fn rename_job(&mut self, index: usize, new_id: &str) -> Result<()> {
        let new_id = new_id.trim();
        if new_id.is_empty() {
            return Err(Error::invalid_job_id("job id cannot be empty"));
        }

        let clash = self
            .jobs()
            .iter()
            .enumerate()
            .any(|(i, job)| i != index && job.get(JOB_ID_KEY).and_then(Value::as_str) == Some(new_id));
        if clash {
            return Err(Error::duplicate_job(new_id));
        }

        let job = self
            .jobs_mut()
            .and_then(|jobs| jobs.get_mut(index))
            .ok_or_else(|| Error::invalid_job_id(format!("no job row at index {index}")))?;

        match job.as_object_mut() {
            Some(obj) => {
                obj.insert(JOB_ID_KEY.to_string(), Value::String(new_id.to_string()));
                Ok(())
            }
            None => Err(Error::invalid_job_id(format!(
                "job row {index} is not an object"
            ))),
        }
    }

    fn unused_job_id(&self) -> String {
        let ids = self.job_ids();
        (0..)
            .map(|n| format!("{NEW_JOB_PREFIX}{n}"))
            .find(|candidate| !ids.contains(candidate))
            .unwrap_or_else(|| NEW_JOB_PREFIX.to_string())
    }

    fn jobs_ref(&self) -> Option<&Vec<Value>> {
        if let Some(jobs) = self.value.get("jobs") {
            return jobs.as_array();
        }
        self.value
            .get("cluster")
            .and_then(|cluster| cluster.get("jobs"))
            .and_then(Value::as_array)
    }

    fn jobs_mut(&mut self) -> Option<&mut Vec<Value>> {
        if self.value.get("jobs").is_some() {
            return self.value.get_mut("jobs").and_then(Value::as_array_mut);
        }
        self.value
            .get_mut("cluster")
            .and_then(|cluster| cluster.get_mut("jobs"))
            .and_then(Value::as_array_mut)
    }

    fn jobs_mut_or_create(&mut self) -> Option<&mut Vec<Value>> {
        if self.jobs_ref().is_none() {
            let root = self.value.as_object_mut()?;
            if root.contains_key("jobs") {
                warn!("configuration key \"jobs\" is not a list, leaving it untouched");
                return None;
            }
            root.insert("jobs".to_string(), Value::Array(Vec::new()));
        }
        self.jobs_mut()
    }
}

/// Serialize any value as pretty JSON with four-space indentation
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::protocol(format!("serialized JSON is not UTF-8: {e}")))
}

fn single_selection(selection: &BTreeSet<usize>) -> Option<usize> {
    if selection.len() != 1 {
        return None;
    }
    selection.iter().next().copied()
}
