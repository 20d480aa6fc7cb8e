//! Common utilities for running the athenaq binary.

use std::path::Path;
use std::process::Command;

/// Runs athenaq with the given arguments in `dir`, with no Athena settings
/// inherited from the environment. Returns (exit code, stdout, stderr).
pub fn run_athenaq(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let missing_config = dir.join("missing-config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_athenaq"))
        .current_dir(dir)
        .arg("--config")
        .arg(&missing_config)
        .args(args)
        .env_remove("ATHENA_OUTPUT_LOCATION")
        .env_remove("ATHENA_WORKGROUP")
        .env_remove("ATHENA_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute athenaq");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
