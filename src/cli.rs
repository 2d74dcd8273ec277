//! CLI argument parsing with clap derive, plus dispatch.

use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::aggregate::{self, Route};
use crate::command_runner::TokioCommandRunner;
use crate::compose::ComposeInvoker;
use crate::domain::{
    Action, ExecutionOptions, InputError, SelectionEvent, Selector, ServiceGroup, build_selection,
};
use crate::orchestrator::Orchestrator;
use crate::output::OutputContext;

/// Compose stack control for self-hosted service groups
#[derive(Parser)]
#[command(
    name = "stackctl",
    version,
    about,
    after_help = "Selectors are repeatable and applied in command-line order. \
                  The action defaults to `up` when omitted; when repeated, the last one wins."
)]
pub struct Cli {
    // Selector flags append one placeholder value per occurrence; a counted
    // flag would record a single argv index and collapse repeats. The ordered
    // selection is rebuilt from these indices in `Invocation::from_matches`.
    /// Select the reverse proxy group (repeatable)
    #[arg(
        long = "traefik",
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub traefik: Vec<bool>,

    /// Select the database group (repeatable)
    #[arg(
        long = "postgres",
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub postgres: Vec<bool>,

    /// Select the workflow automation group (repeatable)
    #[arg(
        long = "n8n",
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub n8n: Vec<bool>,

    /// Select the database tooling alias (resolves to the postgres group)
    #[arg(
        long = "dbeaver",
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub dbeaver: Vec<bool>,

    /// Select all service groups, replacing any prior selection
    #[arg(
        long = "all",
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub all: Vec<bool>,

    /// Worker scale factor (accepted for compatibility; not applied)
    #[arg(long = "scale", value_name = "N")]
    pub scale: Option<u64>,

    /// Run `up` in the foreground instead of detached
    #[arg(long)]
    pub foreground: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// The `NO_COLOR` environment variable is honored separately by the
    /// output layer, regardless of its value.
    #[arg(long)]
    pub no_color: bool,

    /// Action to apply to the selected groups [default: up]
    #[arg(value_enum, value_name = "ACTION")]
    pub actions: Vec<Action>,
}

/// A fully parsed invocation: ordered selection, resolved action, options.
pub struct Invocation {
    pub selection: Vec<ServiceGroup>,
    pub action: Action,
    pub options: ExecutionOptions,
    pub quiet: bool,
    pub no_color: bool,
}

/// Selector flags in the order their indices are collected. The tuple pairs
/// each clap argument id with the selection event it contributes.
const SELECTOR_FLAGS: [(&str, SelectionEvent); 5] = [
    ("traefik", SelectionEvent::One(Selector::Traefik)),
    ("postgres", SelectionEvent::One(Selector::Postgres)),
    ("n8n", SelectionEvent::One(Selector::N8n)),
    ("dbeaver", SelectionEvent::One(Selector::Dbeaver)),
    ("all", SelectionEvent::All),
];

impl Invocation {
    /// Build an invocation from parsed matches.
    ///
    /// clap groups occurrences per flag, so the ordered selection is rebuilt
    /// from argv indices — command-line order must survive because it is the
    /// execution order.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptySelection`] when no selector flag was given.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let cli = Cli::from_arg_matches(matches).context("reading parsed arguments")?;

        let mut events: Vec<(usize, SelectionEvent)> = Vec::new();
        for (flag, event) in SELECTOR_FLAGS {
            if matches.value_source(flag) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Some(indices) = matches.indices_of(flag) {
                events.extend(indices.map(|i| (i, event)));
            }
        }
        events.sort_by_key(|&(i, _)| i);

        let selection = build_selection(events.into_iter().map(|(_, e)| e));
        if selection.is_empty() {
            return Err(InputError::EmptySelection.into());
        }

        Ok(Self {
            selection,
            action: cli.actions.last().copied().unwrap_or(Action::DEFAULT),
            options: ExecutionOptions {
                detached: !cli.foreground,
                scale_workers: cli.scale,
            },
            quiet: cli.quiet,
            no_color: cli.no_color,
        })
    }

    /// Parse an invocation from an explicit argument list.
    ///
    /// # Errors
    ///
    /// Returns a clap error for malformed flags, or a domain error for an
    /// empty selection.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    /// Execute the invocation end to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    /// Per-service failures are reported and do not fail the batch.
    pub async fn run(self) -> Result<()> {
        let ctx = OutputContext::new(self.no_color, self.quiet);
        let root = std::env::current_dir().context("cannot determine working directory")?;
        let invoker = ComposeInvoker::new(TokioCommandRunner, root);

        match aggregate::route(self.action, &self.selection) {
            Route::StatusAll => aggregate::status_all(&invoker, &ctx).await,
            Route::LogsFanOut => aggregate::stream_logs(&invoker, &ctx, &self.selection).await,
            Route::Batch => {
                Orchestrator::new(&invoker, &ctx)
                    .run_batch(&self.selection, self.action, self.options)
                    .await;
            }
        }

        ctx.success("All operations completed.");
        Ok(())
    }
}
