//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Normal-orientation Intan channels for `neuronexus`/`H16` with map 1..=16.
pub const H16_NORMAL: [u32; 16] = [7, 5, 4, 0, 3, 2, 1, 6, 9, 14, 13, 12, 15, 11, 10, 8];

/// Flipped-orientation Intan channels for `neuronexus`/`H16` with map 1..=16.
pub const H16_FLIPPED: [u32; 16] = [15, 13, 12, 8, 11, 10, 9, 14, 1, 6, 5, 4, 7, 3, 2, 0];

/// Path to the probemapper binary
pub fn probemapper_bin() -> &'static str {
    env!("CARGO_BIN_EXE_probemapper")
}

/// Creates a Command whose configuration file lives in `config_dir`.
///
/// Tests never read the user's real configuration.
pub fn isolated_command(config_dir: &Path) -> Command {
    let mut cmd = Command::new(probemapper_bin());
    cmd.env("PROBEMAPPER_CONFIG", config_dir.join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Runs the binary with an isolated configuration and returns its output.
pub fn run(config_dir: &Path, args: &[&str]) -> Output {
    isolated_command(config_dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Inline flags for a single-shank H16 mapping with channels 1..=16.
pub fn h16_args(out_dir: &Path) -> Vec<String> {
    vec![
        "--probe-type".to_string(),
        "neuronexus".to_string(),
        "--connector".to_string(),
        "H16".to_string(),
        "--probe-name".to_string(),
        "A1x16".to_string(),
        "--channel-map".to_string(),
        "1-16".to_string(),
        "--chan-per-shank".to_string(),
        "16".to_string(),
        "--out-dir".to_string(),
        out_dir.display().to_string(),
    ]
}

/// Runs `command` on the H16 flags, with `extra` flags replacing the value of
/// a flag already present or appended otherwise.
pub fn run_h16(config_dir: &Path, command: &str, extra: &[&str]) -> Output {
    let mut args = vec![command.to_string()];
    args.extend(h16_args(&config_dir.join("out")));

    let mut idx = 0;
    while idx < extra.len() {
        let flag = extra[idx];
        let value = extra.get(idx + 1).filter(|v| !v.starts_with("--"));
        match (args.iter().position(|a| a == flag), value) {
            (Some(pos), Some(value)) => {
                args[pos + 1] = (*value).to_string();
                idx += 2;
            }
            _ => {
                args.push(flag.to_string());
                idx += 1;
            }
        }
    }

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run(config_dir, &args)
}

/// Writes a file into `dir` and returns its path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Writes a mapping request TOML for H16 into a fresh temp directory.
///
/// Returns the request path and the temp directory, which also serves as
/// the output directory.
pub fn create_temp_request_file(extra: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let out_dir = temp_dir.path().join("out");
    let contents = format!(
        r#"probe_type = "neuronexus"
connector = "H16"
probe_name = "A1x16"
channel_map = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
chan_per_shank = [16]
out_dir = "{}"
{}
"#,
        out_dir.display().to_string().replace('\\', "\\\\"),
        extra
    );
    let path = write_file(temp_dir.path(), "request.toml", &contents);
    (path, temp_dir)
}

/// Formats channels the way the shank text files do.
pub fn shank_line(index: usize, channels: &[u32]) -> String {
    let channels = channels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("shank{index}: {channels}")
}

/// Stdout as a lossy string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr as a lossy string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
