//! Invocation of the Lunaria status engine.
//!
//! The engine ships with the `@lunariajs/core` package. Its CLI is run with
//! the single argument `stdout` and prints `[userConfig, status[]]` as JSON.
//! A non-zero exit status is tolerated; only the printed output matters.

use crate::error::{ActionError, Result};
use crate::models::lunaria::{parse_scoped_config, LunariaConfig};
use crate::models::status::StatusEntry;
use crate::utils;
use serde_json::Value as Json;
use std::path::{Path, PathBuf};
use std::process::Command;

const PACKAGE_DIR: &str = "node_modules/@lunariajs/core";
const CLI_ENTRY: &str = "dist/cli/index.mjs";

/// Parsed engine output.
pub struct EngineContext {
    pub config: LunariaConfig,
    pub status: Vec<StatusEntry>,
}

/// Find the engine CLI by walking up from `start` looking for the package.
pub fn locate_engine(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PACKAGE_DIR))
        .find(|pkg| pkg.join("package.json").is_file())
        .map(|pkg| pkg.join(CLI_ENTRY))
}

fn command_for(bin: &Path) -> Command {
    let is_script = matches!(
        bin.extension().and_then(|e| e.to_str()),
        Some("mjs" | "cjs" | "js")
    );
    if is_script {
        let mut cmd = Command::new("node");
        cmd.arg(bin);
        cmd
    } else {
        Command::new(bin)
    }
}

/// Run the engine and capture its standard output.
pub fn run_engine(bin: &Path, cwd: &Path) -> Result<String> {
    let output = command_for(bin).arg("stdout").current_dir(cwd).output()?;
    if !output.status.success() {
        utils::debug(&format!(
            "status engine exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    String::from_utf8(output.stdout)
        .map_err(|e| ActionError::engine_output(format!("stdout is not UTF-8: {}", e)))
}

/// Parse `[userConfig, status[]]` and validate the config.
pub fn parse_engine_output(stdout: &str) -> Result<EngineContext> {
    let (user_config, status): (Json, Vec<StatusEntry>) = serde_json::from_str(stdout.trim())?;
    let config = parse_scoped_config(user_config)?;
    Ok(EngineContext { config, status })
}

/// Locate (unless `bin` is given), run, and parse the engine.
pub fn load_context(bin: Option<&Path>, cwd: &Path) -> Result<EngineContext> {
    let bin = match bin {
        Some(b) => b.to_path_buf(),
        None => locate_engine(cwd).ok_or(ActionError::EngineNotFound)?,
    };
    let stdout = run_engine(&bin, cwd)?;
    utils::debug(&stdout);
    parse_engine_output(&stdout)
}
