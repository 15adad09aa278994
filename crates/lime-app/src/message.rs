//! Message types for the application (TEA pattern)

use lime_client::{ConsoleEvent, ConsoleHandle};
use lime_core::{ConfigDocument, Direction};

use crate::input_key::InputKey;
use crate::navigation::SectionKey;
use crate::qos::ConsoleId;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit immediately (q, Esc, Ctrl+C)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────
    /// Initial configuration is available
    ConfigLoaded { doc: ConfigDocument },

    /// Initial configuration could not be obtained
    ConfigLoadFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Switch keyboard focus between the tree and the page
    ToggleFocus,
    NavUp,
    NavDown,
    /// Activate the node under the navigation cursor
    NavActivate,
    /// Activate a section directly
    ActivateSection(SectionKey),

    // ─────────────────────────────────────────────────────────
    // Configuration page
    // ─────────────────────────────────────────────────────────
    RowUp,
    RowDown,
    /// Select exactly the row under the cursor
    SelectOnly,
    /// Add/remove the row under the cursor to/from the selection
    ToggleSelect,
    MoveRow(Direction),
    AddRow,
    RemoveRow,
    PreviewUp,
    PreviewDown,

    StartRename,
    RenameInput(char),
    RenameBackspace,
    RenameCommit,
    RenameCancel,

    // ─────────────────────────────────────────────────────────
    // Toolbar
    // ─────────────────────────────────────────────────────────
    SaveConfig,
    SaveCompleted { body: String },
    SaveFailed { body: String, error: String },

    CopyConfig,
    CopyCompleted,
    CopyFailed { error: String },

    RunConfig,
    /// `result` indexes the run's result page
    RunCompleted { result: usize },
    RunFailed { result: usize, error: String },

    // ─────────────────────────────────────────────────────────
    // QoS page
    // ─────────────────────────────────────────────────────────
    JobUp,
    JobDown,
    /// Change the selected job's limit by this many steps
    AdjustRate(i32),

    /// The sending side of console `id` exists
    ConsoleAttached { id: ConsoleId, handle: ConsoleHandle },

    /// Event from console `id`
    Console { id: ConsoleId, event: ConsoleEvent },
}
