use std::path::Path;
use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Generic command execution with an explicit working directory.
///
/// The working directory is a parameter on every call — the CLI process never
/// changes its own directory, so there is no restoration step to get wrong on
/// any exit path. The production implementation uses tokio; test doubles can
/// record calls and return canned results without spawning processes.
///
/// No timeouts: every stack operation blocks until the external command exits
/// or the operator interrupts.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command with captured stdout/stderr and wait for it to exit.
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a command with inherited stdio and wait for its exit status.
    /// Used for compose lifecycle commands whose output belongs on the
    /// operator's terminal.
    async fn run_passthrough(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<std::process::ExitStatus>;

    /// Spawn a command with piped stdout/stderr and return the child handle.
    /// The caller manages the child lifetime; `kill_on_drop(true)` is set as
    /// a safety net.
    ///
    /// # Errors
    ///
    /// Returns an error if the process fails to spawn.
    fn spawn_piped(&self, dir: &Path, program: &str, args: &[&str])
    -> Result<tokio::process::Child>;
}

/// Production `CommandRunner` backed by `tokio::process`.
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Read stdout/stderr CONCURRENTLY with wait() to avoid pipe deadlock.
        // A child that writes more than the OS pipe buffer blocks on write,
        // and wait() alone would then never resolve.
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );

        Ok(Output {
            status: status.with_context(|| format!("waiting for {program}"))?,
            stdout,
            stderr,
        })
    }

    async fn run_passthrough(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<std::process::ExitStatus> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }

    fn spawn_piped(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<tokio::process::Child> {
        tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))
    }
}
