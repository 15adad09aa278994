//! # lime-core - Core Domain Types
//!
//! Foundation crate for the LIME console. Provides the configuration
//! document, job telemetry view-models, the web service wire protocol,
//! error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, url, tracing).
//!
//! ## Public API
//!
//! ### Configuration (`config_doc`)
//! - [`ConfigDocument`] - Opaque JSON configuration with row operations on its job list
//! - [`Direction`] - Row move direction
//!
//! ### Telemetry (`telemetry`)
//! - [`JobBoard`] - Ordered, id-unique collection of job view-models
//! - [`JobView`] - Latest rate and a 60-point chart window for one job
//! - [`RingBuffer`] - Fixed-capacity FIFO
//!
//! ### Protocol (`protocol`)
//! - [`ConsoleMessage`] - Parsed inbound console frame
//! - [`RateControl`], [`RunRequest`] - Outbound payloads
//! - [`ServerEndpoints`] - HTTP and WebSocket URLs of the service
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use lime_core::prelude::*;
//! ```

pub mod config_doc;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod telemetry;

/// Prelude for common imports used throughout all LIME console crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use config_doc::{ConfigDocument, Direction, JOB_ID_KEY};
pub use error::{Error, Result, ResultExt};
pub use protocol::{
    parse_console_message, workspace_timestamp, CommandResult, ConsoleMessage, Datapoint,
    RateControl, RunRequest, ServerEndpoints,
};
pub use telemetry::{JobBoard, JobView, RatePoint, RingBuffer, JOB_WINDOW_CAPACITY};
