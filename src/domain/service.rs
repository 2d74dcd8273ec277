//! Service groups, selectors, and selection building.

use std::fmt;

/// A named, independently deployable unit backed by its own compose directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceGroup {
    /// Reverse proxy.
    Traefik,
    /// Database.
    Postgres,
    /// Workflow automation.
    N8n,
}

impl ServiceGroup {
    /// The full fixed set, in startup order.
    pub const ALL: [Self; 3] = [Self::Traefik, Self::Postgres, Self::N8n];

    /// Display name for labels and log prefixes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Traefik => "traefik",
            Self::Postgres => "postgres",
            Self::N8n => "n8n",
        }
    }

    /// Relative directory expected to contain this group's compose file.
    /// Identity mapping: the group name is the directory name.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for ServiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-group command-line selector. Selectors are a superset of the
/// service groups: `Dbeaver` is an alias for the database group, resolved at
/// parse time before any ordering logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Traefik,
    Postgres,
    N8n,
    /// Auxiliary database tooling — shares the postgres compose directory.
    Dbeaver,
}

impl Selector {
    /// Resolve the selector to its service group, collapsing aliases.
    #[must_use]
    pub fn resolve(self) -> ServiceGroup {
        match self {
            Self::Traefik => ServiceGroup::Traefik,
            Self::Postgres | Self::Dbeaver => ServiceGroup::Postgres,
            Self::N8n => ServiceGroup::N8n,
        }
    }
}

/// One selector occurrence, in command-line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A single-group selector flag.
    One(Selector),
    /// `--all` — replaces the accumulated selection with the full fixed set.
    All,
}

/// Fold ordered selector events into the final selection.
///
/// Insertion order is command-line order and duplicates are kept. `All`
/// replaces everything accumulated so far with [`ServiceGroup::ALL`]; later
/// selectors append after it.
#[must_use]
pub fn build_selection<I>(events: I) -> Vec<ServiceGroup>
where
    I: IntoIterator<Item = SelectionEvent>,
{
    let mut selection = Vec::new();
    for event in events {
        match event {
            SelectionEvent::All => {
                selection.clear();
                selection.extend(ServiceGroup::ALL);
            }
            SelectionEvent::One(selector) => selection.push(selector.resolve()),
        }
    }
    selection
}

/// `true` when `selection` is exactly the full fixed set: one entry per
/// primary group, any order, no duplicates.
#[must_use]
pub fn is_full_set(selection: &[ServiceGroup]) -> bool {
    selection.len() == ServiceGroup::ALL.len()
        && ServiceGroup::ALL.iter().all(|group| selection.contains(group))
}
