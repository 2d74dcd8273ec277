//! Compose invoker — resolves service directories and shells out to the
//! compose tool.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::command_runner::CommandRunner;
use crate::domain::{Action, ExecutionOptions, ServiceGroup};
use crate::output::OutputContext;

/// External compose tool, invoked as `docker compose <subcommand>`.
const COMPOSE_PROGRAM: &str = "docker";
const COMPOSE_SUBCOMMAND: &str = "compose";

/// Shared networks pre-created before any `up` batch. The compose files
/// reference them as external, so they must exist before the first group
/// starts.
pub const SHARED_NETWORKS: [&str; 2] = ["proxy", "backend"];

/// Infrastructure adapter that routes all compose and network calls through a
/// [`CommandRunner`].
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct ComposeInvoker<R: CommandRunner> {
    runner: R,
    root: PathBuf,
}

impl<R: CommandRunner> ComposeInvoker<R> {
    /// Create an invoker rooted at the directory holding the per-service
    /// compose directories.
    pub fn new(runner: R, root: PathBuf) -> Self {
        Self { runner, root }
    }

    /// Directory expected to contain `group`'s compose file.
    #[must_use]
    pub fn service_dir(&self, group: ServiceGroup) -> PathBuf {
        self.root.join(group.dir_name())
    }

    /// Resolve `group`'s directory, checking existence lazily at the time of
    /// use (never cached). Returns `None` when the directory is missing; the
    /// caller skips that group's operation.
    #[must_use]
    pub fn resolve_dir(&self, group: ServiceGroup) -> Option<PathBuf> {
        let dir = self.service_dir(group);
        dir.is_dir().then_some(dir)
    }

    /// Run `docker compose <action>` for one service group, streaming output
    /// to the terminal and blocking until the command exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose tool cannot be spawned or exits
    /// non-zero.
    pub async fn invoke(
        &self,
        dir: &std::path::Path,
        action: Action,
        opts: ExecutionOptions,
    ) -> Result<()> {
        let mut args = vec![COMPOSE_SUBCOMMAND];
        args.extend_from_slice(action.compose_args(opts.detached));

        let status = self
            .runner
            .run_passthrough(dir, COMPOSE_PROGRAM, &args)
            .await
            .with_context(|| format!("failed to run docker compose in {}", dir.display()))?;

        if !status.success() {
            anyhow::bail!("docker compose {} exited with {status}", args[1..].join(" "));
        }
        Ok(())
    }

    /// Spawn a follow-mode log stream for one service directory, with piped
    /// output for prefixing.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose tool cannot be spawned.
    pub fn spawn_logs(&self, dir: &std::path::Path) -> Result<tokio::process::Child> {
        let mut args = vec![COMPOSE_SUBCOMMAND];
        args.extend_from_slice(Action::Logs.compose_args(true));
        self.runner
            .spawn_piped(dir, COMPOSE_PROGRAM, &args)
            .with_context(|| format!("failed to spawn docker compose logs in {}", dir.display()))
    }

    /// Pre-create the shared networks, tolerating pre-existence as success.
    ///
    /// Runs once per `up` batch, before the first service operation. An
    /// "already exists" failure is fully suppressed; any other failure is
    /// downgraded to a warning so an unreachable daemon does not abort a
    /// batch that might still make progress.
    pub async fn ensure_networks(&self, ctx: &OutputContext) {
        for network in SHARED_NETWORKS {
            let result = self
                .runner
                .run(&self.root, "docker", &["network", "create", network])
                .await;
            match result {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    if !stderr.contains("already exists") {
                        ctx.warn(&format!(
                            "could not create network {network}: {}",
                            stderr.trim()
                        ));
                    }
                }
                Err(e) => ctx.warn(&format!("could not create network {network}: {e:#}")),
            }
        }
    }
}
