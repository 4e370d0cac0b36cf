use assert_cmd::Command;
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness running the CLI against a temporary board file.
pub struct CliTestHarness {
    _temp_dir: TempDir,
    data_file: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let data_file = temp_dir.path().join("board.csv");
        Self {
            _temp_dir: temp_dir,
            data_file,
        }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("kanri").expect("Failed to find kanri binary");
        cmd.env("KANRI_DATA_FILE", &self.data_file);
        cmd
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// A start-time argument `days` days and `minutes` minutes from now, safely
/// inside the one-year window every process anchors at startup.
pub fn start_arg(days: i64, minutes: i64) -> String {
    (Utc::now() + Duration::days(days) + Duration::minutes(minutes))
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
