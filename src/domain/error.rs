//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

/// Errors in command-line input. Fatal: reported before any service
/// operation runs, with exit status 1.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(
        "No service groups selected. Pass at least one of --traefik, --postgres, --n8n, --dbeaver, or --all."
    )]
    EmptySelection,
}
