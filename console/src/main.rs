//! Harbor Console - Entry Point
//!
//! Operator console for devices, deployments and the audit trail of a
//! Harbor OTA management API.

use std::collections::HashMap;
use std::env;

use harbor_console::app::diagnostic::run_diagnostic;
use harbor_console::app::options::AppOptions;
use harbor_console::app::run::run;
use harbor_console::logs::{init_logging, LogOptions};
use harbor_console::storage::layout::StorageLayout;
use harbor_console::storage::settings::Settings;
use harbor_console::utils::version_info;

use anyhow::Context;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to render version info: {e}"),
        }
        return;
    }

    let layout = match cli_args.get("home") {
        Some(home) => StorageLayout::new(home),
        None => StorageLayout::default(),
    };

    // Retrieve the settings file
    let mut settings = match Settings::load(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return;
        }
    };
    if let Err(e) = apply_cli_overrides(&mut settings, &cli_args) {
        eprintln!("{e:#}");
        return;
    }

    let options = AppOptions::from_settings(&settings, layout.clone());

    // Run diagnostics
    if cli_args.contains_key("diagnostic") || cli_args.contains_key("diag") {
        run_diagnostic(&options).await;
        return;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_to_file.then(|| layout.logs_dir()),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    info!("Running Harbor Console with options: {:?}", options);
    let result = run(options, await_shutdown_signal()).await;
    if let Err(e) = result {
        error!("Failed to run the console: {e}");
    }
}

fn apply_cli_overrides(
    settings: &mut Settings,
    cli_args: &HashMap<String, String>,
) -> anyhow::Result<()> {
    if let Some(host) = cli_args.get("host") {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli_args.get("port") {
        settings.server.port = port
            .parse()
            .with_context(|| format!("Invalid --port value: {port}"))?;
    }
    if let Some(api) = cli_args.get("api") {
        settings.api.base_url = api.clone();
    }
    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                warn!("Unable to install signal handlers, falling back to Ctrl+C");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {e}");
                }
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Ctrl+C received, shutting down...");
    }
}
