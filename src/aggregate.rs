//! Aggregate status and log paths for multi-service selections.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::command_runner::CommandRunner;
use crate::compose::ComposeInvoker;
use crate::domain::{Action, ExecutionOptions, ServiceGroup, is_full_set};
use crate::output::OutputContext;

/// Width of the service-name column in prefixed log output.
const PREFIX_WIDTH: usize = 8;

/// Which execution path a parsed invocation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Generic per-service loop.
    Batch,
    /// Aggregate status: one labeled `ps` per existing directory.
    StatusAll,
    /// Concurrent prefixed log streams, one per existing directory.
    LogsFanOut,
}

/// Decide the execution path for an action and selection.
///
/// `status` takes the aggregate path only when the selection is exactly the
/// full fixed set; `logs` fans out only when more than one service is
/// selected. Everything else goes through the generic batch.
#[must_use]
pub fn route(action: Action, selection: &[ServiceGroup]) -> Route {
    match action {
        Action::Status if is_full_set(selection) => Route::StatusAll,
        Action::Logs if selection.len() > 1 => Route::LogsFanOut,
        _ => Route::Batch,
    }
}

/// Print `docker compose ps` for each primary group in fixed order, labeled
/// by service name. Missing directories are silently skipped.
pub async fn status_all<R: CommandRunner>(invoker: &ComposeInvoker<R>, ctx: &OutputContext) {
    for group in ServiceGroup::ALL {
        let Some(dir) = invoker.resolve_dir(group) else {
            continue;
        };
        ctx.header(group.name());
        if let Err(e) = invoker
            .invoke(&dir, Action::Status, ExecutionOptions::default())
            .await
        {
            ctx.error(&format!("{group}: {e:#}"));
        }
        println!();
    }
}

/// Stream logs for the selected groups concurrently, each output line
/// prefixed with its service name. One stream per existing directory;
/// duplicate selections collapse. Runs until the operator interrupts or
/// every stream ends on its own.
///
/// The streams run as tasks on a [`JoinSet`] supervisor: on ctrl-c (or joint
/// completion) the set is shut down, aborting the tasks, and `kill_on_drop`
/// terminates the child processes on every exit path.
pub async fn stream_logs<R: CommandRunner>(
    invoker: &ComposeInvoker<R>,
    ctx: &OutputContext,
    selection: &[ServiceGroup],
) {
    stream_logs_until(invoker, ctx, selection, operator_interrupt()).await;
}

/// Resolves when the operator interrupts the process.
async fn operator_interrupt() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Like [`stream_logs`], but with an explicit shutdown trigger instead of
/// ctrl-c. The streams stop when `shutdown` resolves or when every stream
/// ends on its own, whichever comes first.
pub async fn stream_logs_until<R, F>(
    invoker: &ComposeInvoker<R>,
    ctx: &OutputContext,
    selection: &[ServiceGroup],
    shutdown: F,
) where
    R: CommandRunner,
    F: Future<Output = ()>,
{
    let mut tasks = JoinSet::new();
    let mut started: Vec<ServiceGroup> = Vec::new();

    for &group in selection {
        if started.contains(&group) {
            continue;
        }
        let Some(dir) = invoker.resolve_dir(group) else {
            ctx.warn(&format!(
                "{group}: directory {} not found, skipping",
                invoker.service_dir(group).display()
            ));
            continue;
        };
        match invoker.spawn_logs(&dir) {
            Ok(child) => {
                tasks.spawn(forward_logs(group, child));
                started.push(group);
            }
            Err(e) => ctx.error(&format!("{group}: {e:#}")),
        }
    }

    if tasks.is_empty() {
        ctx.warn("no log streams started");
        return;
    }
    ctx.info(&format!(
        "streaming logs for {} service group(s), ctrl-c to stop",
        started.len()
    ));

    tokio::select! {
        () = shutdown => {
            ctx.info("interrupted, stopping log streams");
        }
        () = async {
            while tasks.join_next().await.is_some() {}
        } => {}
    }

    tasks.shutdown().await;
}

/// Forward one child's stdout and stderr line by line, prefixed with the
/// service name. Interleaving across services is unordered; the prefix
/// disambiguates origin.
async fn forward_logs(group: ServiceGroup, mut child: tokio::process::Child) {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let name = group.name();

    let forward_stdout = async {
        if let Some(out) = stdout {
            let mut lines = BufReader::new(out).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{name:<width$}| {line}", width = PREFIX_WIDTH);
            }
        }
    };
    let forward_stderr = async {
        if let Some(err) = stderr {
            let mut lines = BufReader::new(err).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{name:<width$}| {line}", width = PREFIX_WIDTH);
            }
        }
    };

    tokio::join!(forward_stdout, forward_stderr);
    let _ = child.wait().await;
}
