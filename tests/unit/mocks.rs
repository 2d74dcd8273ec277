//! Shared mock infrastructure for unit tests.
//!
//! Provides a recording [`CommandRunner`] and canned `Output` helpers so each
//! test file doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used)]
#![allow(dead_code)] // not every test file uses every helper

use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use stackctl::command_runner::CommandRunner;

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(1 << 8),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Recording runner ──────────────────────────────────────────────────────────

/// One recorded external call: working directory, program, argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Snapshot the recorded calls.
pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().expect("call log").clone()
}

/// Recording runner — captures every call and returns canned results
/// instead of spawning the compose tool.
pub struct RecordingRunner {
    log: CallLog,
    /// Directory names whose passthrough runs exit non-zero.
    pub fail_dirs: Vec<&'static str>,
    /// Canned stderr for captured runs; when set, captured runs exit
    /// non-zero with this stderr.
    pub run_stderr: Option<Vec<u8>>,
    /// Stub child spawned for piped runs: program and argv. Defaults to an
    /// immediately-exiting child so fan-out tests finish on their own.
    pub spawn_command: (&'static str, &'static [&'static str]),
}

impl RecordingRunner {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                log: Arc::clone(&log),
                fail_dirs: Vec::new(),
                run_stderr: None,
                spawn_command: ("true", &[]),
            },
            log,
        )
    }

    fn record(&self, dir: &Path, program: &str, args: &[&str]) {
        self.log.lock().expect("call log").push(Call {
            dir: dir.to_path_buf(),
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        });
    }

    fn dir_fails(&self, dir: &Path) -> bool {
        self.fail_dirs.iter().any(|name| dir.ends_with(name))
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
        self.record(dir, program, args);
        Ok(match &self.run_stderr {
            Some(stderr) => err_output(stderr),
            None => ok_output(b""),
        })
    }

    async fn run_passthrough(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<ExitStatus> {
        self.record(dir, program, args);
        if self.dir_fails(dir) {
            Ok(ExitStatus::from_raw(1 << 8))
        } else {
            Ok(ExitStatus::from_raw(0))
        }
    }

    fn spawn_piped(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<tokio::process::Child> {
        self.record(dir, program, args);
        let (stub, stub_args) = self.spawn_command;
        tokio::process::Command::new(stub)
            .args(stub_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context("failed to spawn stub child")
    }
}

// ── Filesystem helpers ────────────────────────────────────────────────────────

/// Create a stack root containing the given service directories.
pub fn stack_root(dirs: &[&str]) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    for dir in dirs {
        std::fs::create_dir(tmp.path().join(dir)).expect("create service dir");
    }
    tmp
}
