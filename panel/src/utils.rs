//! Utility functions

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::app::options::AppOptions;
use crate::authn::token_guard::TokenGuard;
use crate::filesys::file::File;

/// Version information for the panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Resolve a program name the way the OS would, using `PATH` for bare names
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

/// Print the resolved configuration and check the external collaborators.
///
/// Returns whether every check passed.
pub async fn run_diagnostic(options: &AppOptions) -> bool {
    println!("{}", "UGREEN panel diagnostic".bold());
    let token_guard = TokenGuard::new(options.server.token.clone());
    println!("  listen:        {}:{}", options.server.host, options.server.port);
    println!(
        "  token:         {}",
        if token_guard.is_enabled() { "enabled" } else { "disabled (open access)" }
    );
    println!("  container:     {} via {}", options.container.ct_id, options.container.tool);
    println!("  restart mode:  {}", options.container.restart_mode);
    println!("  ct timeout:    {:?}", options.container.timeout);
    println!("  fix script:    {}", options.fix.script.display());
    println!("  fix timeout:   {:?}", options.fix.timeout);
    println!("  log file:      {}", options.log_tail.path.display());
    println!();

    let mut all_ok = true;

    let script = File::new(&options.fix.script);
    all_ok &= report("fix script is executable", script.is_executable().await);

    let tool = find_executable(&options.container.tool);
    all_ok &= report(
        &format!("container tool '{}' found", options.container.tool),
        tool.is_some(),
    );

    // the log only appears after the first fix run, so this is a warning
    let log_file = File::new(&options.log_tail.path);
    if !log_file.exists().await {
        println!("  {} log file does not exist yet", "WARN".yellow());
    } else {
        report("log file exists", true);
    }

    all_ok
}

fn report(check: &str, ok: bool) -> bool {
    if ok {
        println!("  {} {}", "OK".green(), check);
    } else {
        println!("  {} {}", "FAIL".red(), check);
    }
    ok
}
