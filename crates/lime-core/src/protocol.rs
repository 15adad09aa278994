//! Wire protocol of the LIME web service
//!
//! Inbound console messages are JSON objects tagged by `type`. Earlier
//! server versions streamed untyped free text, which is kept as
//! [`ConsoleMessage::Text`]. Outbound messages are the rate control sent over
//! the socket and the run request posted over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config_doc::{to_pretty_string, ConfigDocument};
use crate::prelude::*;

/// Path of the streaming console endpoint
pub const CONSOLE_PATH: &str = "console_websocket";
/// Path of the save endpoint
pub const SAVE_PATH: &str = "save";
/// Path of the run endpoint
pub const RUN_PATH: &str = "run";
/// Path of the static initial configuration
pub const STATIC_CONFIG_PATH: &str = "static/lime_config.json";

// ─────────────────────────────────────────────────────────────────────────────
// Inbound
// ─────────────────────────────────────────────────────────────────────────────

/// A rate sample for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub job_id: String,
    /// Throughput in MB/s, fractional
    pub rate: f64,
    /// Server time in epoch seconds
    pub time: f64,
}

/// Outcome of a server-side command (cluster init, rate change)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: String,
    pub result: String,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub rate: Option<f64>,
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        self.result == "success"
    }
}

/// A parsed message from the console socket
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleMessage {
    Datapoint(Datapoint),
    CommandResult(CommandResult),
    /// Valid JSON with a missing or unrecognized `type` tag
    Unknown { kind: Option<String>, raw: String },
    /// Not JSON at all
    Text(String),
}

impl ConsoleMessage {
    /// One-line rendering for the console pane
    pub fn summary(&self) -> String {
        match self {
            ConsoleMessage::Datapoint(dp) => {
                format!("datapoint {} rate={} time={}", dp.job_id, dp.rate, dp.time)
            }
            ConsoleMessage::CommandResult(cr) => {
                let mut line = format!("{}: {}", cr.command, cr.result);
                if let Some(job_id) = &cr.job_id {
                    line.push_str(&format!(" job={job_id}"));
                }
                if let Some(rate) = cr.rate {
                    line.push_str(&format!(" rate={rate}"));
                }
                line
            }
            ConsoleMessage::Unknown { kind, raw } => match kind {
                Some(kind) => format!("[{kind}] {}", truncate(raw, 200)),
                None => truncate(raw, 200).to_string(),
            },
            ConsoleMessage::Text(text) => text.trim_end().to_string(),
        }
    }
}

/// Parse a console text frame into a [`ConsoleMessage`].
///
/// Never fails: malformed payloads degrade to `Unknown` or `Text`.
pub fn parse_console_message(text: &str) -> ConsoleMessage {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return ConsoleMessage::Text(text.to_string()),
    };

    let kind = value.get("type").and_then(Value::as_str).map(str::to_string);
    match kind.as_deref() {
        Some("datapoint") => match serde_json::from_value::<Datapoint>(value) {
            Ok(dp) => ConsoleMessage::Datapoint(dp),
            Err(e) => {
                warn!("malformed datapoint: {}", e);
                ConsoleMessage::Unknown {
                    kind,
                    raw: text.to_string(),
                }
            }
        },
        Some("command_result") => match serde_json::from_value::<CommandResult>(value) {
            Ok(cr) => ConsoleMessage::CommandResult(cr),
            Err(e) => {
                warn!("malformed command_result: {}", e);
                ConsoleMessage::Unknown {
                    kind,
                    raw: text.to_string(),
                }
            }
        },
        _ => ConsoleMessage::Unknown {
            kind,
            raw: text.to_string(),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbound
// ─────────────────────────────────────────────────────────────────────────────

/// Rate limit change for one job, sent over the console socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateControl {
    pub job_id: String,
    pub rate: f64,
}

impl RateControl {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of `POST /run`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRequest {
    pub config: Value,
    /// Name of the result workspace: the request's ISO-8601 timestamp
    pub workspace: String,
}

impl RunRequest {
    pub fn new(config: &ConfigDocument, now: DateTime<Utc>) -> Self {
        Self {
            config: config.value().clone(),
            workspace: workspace_timestamp(now),
        }
    }

    pub fn to_body(&self) -> Result<String> {
        to_pretty_string(self)
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g.
/// `2017-06-01T12:00:00.000Z`
pub fn workspace_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// URLs of the LIME web service, derived from its base address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoints {
    base: Url,
}

impl ServerEndpoints {
    /// Parse the base address (`http://host:port/`)
    pub fn parse(server: &str) -> Result<Self> {
        let mut base = Url::parse(server).map_err(|_| Error::invalid_url(server))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_url(server));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn save(&self) -> Url {
        self.join(SAVE_PATH)
    }

    pub fn run(&self) -> Url {
        self.join(RUN_PATH)
    }

    pub fn static_config(&self) -> Url {
        self.join(STATIC_CONFIG_PATH)
    }

    /// WebSocket URL of the console (`ws://` or `wss://`)
    pub fn console(&self) -> Url {
        let mut url = self.join(CONSOLE_PATH);
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        if url.set_scheme(scheme).is_err() {
            warn!("could not switch {} to {}", url, scheme);
        }
        url
    }

    fn join(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }
}
