//! Batch sequencing across selected service groups.

use std::time::Duration;

use crate::command_runner::CommandRunner;
use crate::compose::ComposeInvoker;
use crate::domain::{Action, ExecutionOptions, ServiceGroup};
use crate::output::OutputContext;

/// Pause between consecutive groups on a multi-service `up`, staggering
/// startup so one group settles before the next starts.
pub const STAGGER_DELAY: Duration = Duration::from_secs(2);

/// Drives one batch of service operations in selection order.
pub struct Orchestrator<'a, R: CommandRunner> {
    invoker: &'a ComposeInvoker<R>,
    ctx: &'a OutputContext,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
    pub fn new(invoker: &'a ComposeInvoker<R>, ctx: &'a OutputContext) -> Self {
        Self { invoker, ctx }
    }

    /// Run `action` for every group in `selection`, in order.
    ///
    /// Per-service failures are reported and never abort the batch; there is
    /// no rollback. For `up`, the shared networks are ensured exactly once
    /// before the first service operation, and [`STAGGER_DELAY`] separates
    /// consecutive groups when more than one is selected.
    pub async fn run_batch(
        &self,
        selection: &[ServiceGroup],
        action: Action,
        opts: ExecutionOptions,
    ) {
        if action.needs_network_setup() {
            self.invoker.ensure_networks(self.ctx).await;
        }

        let stagger = action == Action::Up && selection.len() > 1;
        for (i, &group) in selection.iter().enumerate() {
            if stagger && i > 0 {
                tokio::time::sleep(STAGGER_DELAY).await;
            }
            self.run_one(group, action, opts).await;
        }
    }

    /// Run one service operation, resolving the group's directory lazily.
    /// A missing directory or a failed command is reported and skipped.
    pub async fn run_one(&self, group: ServiceGroup, action: Action, opts: ExecutionOptions) {
        let Some(dir) = self.invoker.resolve_dir(group) else {
            self.ctx.warn(&format!(
                "{group}: directory {} not found, skipping",
                self.invoker.service_dir(group).display()
            ));
            return;
        };

        self.ctx.info(&format!(
            "{group}: docker compose {}",
            action.compose_args(opts.detached).join(" ")
        ));
        if let Err(e) = self.invoker.invoke(&dir, action, opts).await {
            self.ctx.error(&format!("{group}: {e:#}"));
        }
    }
}
