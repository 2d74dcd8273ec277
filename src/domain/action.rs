//! Action verbs and their compose argv table.

use clap::ValueEnum;

/// Verb applied to each selected service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Create and start containers
    Up,
    /// Stop and remove containers
    Down,
    /// Restart containers
    Restart,
    /// Stop containers without removing them
    Stop,
    /// Start previously stopped containers
    Start,
    /// Follow container log output
    Logs,
    /// Show container status
    Status,
    /// Pull the latest images
    Pull,
}

impl Action {
    /// Action used when no action token is given on the command line.
    pub const DEFAULT: Self = Self::Up;

    /// Compose subcommand argv for this action.
    ///
    /// `up` detaches unless foreground mode was requested; `logs` always
    /// follows; `status` maps onto `ps`. The match is exhaustive, so there is
    /// no runtime fallback branch for unknown actions.
    #[must_use]
    pub fn compose_args(self, detached: bool) -> &'static [&'static str] {
        match self {
            Self::Up if detached => &["up", "-d"],
            Self::Up => &["up"],
            Self::Down => &["down"],
            Self::Restart => &["restart"],
            Self::Stop => &["stop"],
            Self::Start => &["start"],
            Self::Logs => &["logs", "-f"],
            Self::Status => &["ps"],
            Self::Pull => &["pull"],
        }
    }

    /// `true` for actions that need the shared networks to exist beforehand.
    #[must_use]
    pub fn needs_network_setup(self) -> bool {
        matches!(self, Self::Up)
    }
}
