//! LIME console - terminal front end for the LIME QoS controller
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use lime_app::settings::{default_settings_path, load_settings};
use lime_core::prelude::*;
use lime_core::ServerEndpoints;

/// LIME console - monitor and control job I/O rates
#[derive(Parser, Debug)]
#[command(name = "lime")]
#[command(about = "Terminal console for the LIME QoS controller", long_about = None)]
struct Args {
    /// Control server base URL, e.g. http://mds01:24
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Start from a local configuration file instead of the server's
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Settings file (defaults to <config_dir>/lime/config.toml)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Initialize logging (to file, since the TUI owns stdout)
    lime_core::logging::init()?;

    let mut settings = match args.settings.or_else(default_settings_path) {
        Some(path) => load_settings(&path),
        None => Default::default(),
    };
    if let Some(server) = args.server {
        settings.server.url = server;
    }

    let result = match ServerEndpoints::parse(&settings.server.url) {
        Ok(endpoints) => {
            info!("LIME console starting");
            lime_tui::run(settings, endpoints, args.config).await
        }
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
        // The terminal is restored by now; say why we could not run
        if e.is_fatal() {
            eprintln!("lime: {e}");
        }
    }

    info!("LIME console exiting");
    result
}
