//! Per-invocation execution options.

/// Options constructed once from the command line and immutable thereafter.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOptions {
    /// Start services detached (`up -d`). Cleared by `--foreground`.
    pub detached: bool,
    /// Worker scale factor. Parsed and validated but not applied by any
    /// action; kept so existing invocations that pass `--scale` keep working.
    pub scale_workers: Option<u64>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            detached: true,
            scale_workers: None,
        }
    }
}
