//! Navigation tree
//!
//! ```text
//! QoS
//! Configuration
//! Results
//!   2017-06-01T12:00:00.000Z
//!   ...
//! ```
//!
//! Exactly one leaf is active at a time. [`Navigation`] only plans
//! transitions; running the section lifecycle is `AppState`'s job.

use std::fmt;

use lime_core::prelude::*;

/// Identifies a navigation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Qos,
    Configuration,
    /// Folder holding one entry per run
    Results,
    /// The n-th run, in creation order
    Result(usize),
}

impl SectionKey {
    pub fn is_folder(&self) -> bool {
        matches!(self, SectionKey::Results)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKey::Qos => write!(f, "QoS"),
            SectionKey::Configuration => write!(f, "Configuration"),
            SectionKey::Results => write!(f, "Results"),
            SectionKey::Result(index) => write!(f, "Results/{index}"),
        }
    }
}

/// A key/title pair; folders carry children
#[derive(Debug, Clone, PartialEq)]
pub struct NavNode {
    pub key: SectionKey,
    pub title: String,
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn leaf(key: SectionKey, title: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.key.is_folder()
    }
}

/// A flattened node with its nesting depth, for rendering
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    pub node: &'a NavNode,
    pub depth: usize,
}

/// The section change requested by an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub deactivate: Option<SectionKey>,
    pub activate: SectionKey,
}

#[derive(Debug, Clone)]
pub struct Navigation {
    roots: Vec<NavNode>,
    cursor: usize,
    active: Option<SectionKey>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            roots: vec![
                NavNode::leaf(SectionKey::Qos, "QoS"),
                NavNode::leaf(SectionKey::Configuration, "Configuration"),
                NavNode::leaf(SectionKey::Results, "Results"),
            ],
            cursor: 0,
            active: None,
        }
    }

    /// Depth-first flattening; folders are always expanded
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        fn walk<'a>(nodes: &'a [NavNode], depth: usize, out: &mut Vec<VisibleNode<'a>>) {
            for node in nodes {
                out.push(VisibleNode { node, depth });
                walk(&node.children, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }

    pub fn find(&self, key: SectionKey) -> Option<&NavNode> {
        self.visible_nodes()
            .into_iter()
            .find(|v| v.node.key == key)
            .map(|v| v.node)
    }

    pub fn contains(&self, key: SectionKey) -> bool {
        self.find(key).is_some()
    }

    pub fn active(&self) -> Option<SectionKey> {
        self.active
    }

    pub fn result_count(&self) -> usize {
        self.results_folder().map(|f| f.children.len()).unwrap_or(0)
    }

    /// Append a run entry under the Results folder
    pub fn add_result(&mut self, title: impl Into<String>) -> SectionKey {
        let index = self.result_count();
        let key = SectionKey::Result(index);
        match self.roots.iter_mut().find(|n| n.key == SectionKey::Results) {
            Some(folder) => folder.children.push(NavNode::leaf(key, title)),
            None => error!("{}", Error::no_such_node(SectionKey::Results.to_string())),
        }
        key
    }

    /// Work out what activating `key` means.
    ///
    /// Returns `None` for unknown keys (logged), for folders, and for the
    /// section that is already active.
    pub fn plan_activation(&self, key: SectionKey) -> Option<Transition> {
        if !self.contains(key) {
            error!("{}", Error::no_such_node(key.to_string()));
            return None;
        }
        if key.is_folder() {
            debug!("{} is a folder, nothing to activate", key);
            return None;
        }
        if self.active == Some(key) {
            return None;
        }
        Some(Transition {
            deactivate: self.active,
            activate: key,
        })
    }

    /// Record `key` as active and move the cursor onto it
    pub fn set_active(&mut self, key: SectionKey) {
        self.active = Some(key);
        if let Some(pos) = self.visible_nodes().iter().position(|v| v.node.key == key) {
            self.cursor = pos;
        }
    }

    // ── Cursor ──────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_key(&self) -> Option<SectionKey> {
        self.visible_nodes().get(self.cursor).map(|v| v.node.key)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let len = self.visible_nodes().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    fn results_folder(&self) -> Option<&NavNode> {
        self.roots.iter().find(|n| n.key == SectionKey::Results)
    }
}
