//! UGREEN panel - Entry Point
//!
//! A small local web page with two buttons: reset the UGREEN HDMI capture
//! device through its fix script, or restart the LXC container using it.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use ugreen_panel::app::options::AppOptions;
use ugreen_panel::app::run::run;
use ugreen_panel::logs::init_logging;
use ugreen_panel::utils::{run_diagnostic, version_info};

use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
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
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize version info: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    // Configuration is read once and fixed from here on
    let options = match AppOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Run diagnostics
    if cli_args.contains_key("diagnostic") || cli_args.contains_key("diag") {
        return if run_diagnostic(&options).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    // Initialize logging
    let _log_guard = match init_logging(&options.logging) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    info!(
        "UGREEN panel {} on http://{}:{} (CT={})",
        version.version, options.server.host, options.server.port, options.container.ct_id
    );
    info!("Running with options: {:?}", options);

    match run(options, await_shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to run the panel: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                _ => {
                    error!("Failed to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
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
        }
        info!("Ctrl+C received, shutting down...");
    }
}
