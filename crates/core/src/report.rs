//! Reported outcomes of a run.
//!
//! Reconciliation steps never return errors for individual items. Every
//! outcome is an [`Event`] handed to a [`Reporter`], and a [`Summary`]
//! tallies them for the caller.

use crate::index::Collection;
use std::fmt;

/// Which pass a per-name outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RemoveBindings,
    DeleteFilters,
}

/// One reported outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ListingFailed {
        collection: Collection,
        error: String,
    },
    PrefixNotFound {
        name: String,
        stage: Stage,
    },
    BindingQueryFailed {
        name: String,
        error: String,
    },
    NotBound {
        name: String,
    },
    BindingsFound {
        name: String,
        count: usize,
    },
    ZombieBinding {
        name: String,
        site_id: String,
    },
    BindingRemoved {
        name: String,
        site: String,
    },
    BindingRemovalFailed {
        name: String,
        site: String,
        error: String,
    },
    FilterDeleted {
        name: String,
    },
    FilterDeletionFailed {
        name: String,
        error: String,
    },
}

impl Event {
    /// True for outcomes an operator should treat as a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::ListingFailed { .. }
                | Event::PrefixNotFound { .. }
                | Event::BindingQueryFailed { .. }
                | Event::BindingRemovalFailed { .. }
                | Event::FilterDeletionFailed { .. }
        )
    }

    /// Underlying error text, if the outcome carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Event::ListingFailed { error, .. }
            | Event::BindingQueryFailed { error, .. }
            | Event::BindingRemovalFailed { error, .. }
            | Event::FilterDeletionFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ListingFailed { collection, .. } => {
                write!(f, "ERR: Could not retrieve {collection}")
            }
            Event::PrefixNotFound { name, .. } => {
                write!(f, "ERR: Prefix {name} not found. Ignoring this prefix.")
            }
            Event::BindingQueryFailed { name, .. } => {
                write!(f, "ERR: Could not retrieve prefix filter bindings for {name}")
            }
            Event::NotBound { name } => write!(f, "{name} not bound to any site"),
            Event::BindingsFound { name, .. } => write!(f, "{name}"),
            Event::ZombieBinding { site_id, .. } => write!(
                f,
                "\tWARN: Site name not found. Removing zombie association from {site_id}"
            ),
            Event::BindingRemoved { site, .. } => write!(f, "\t{site}: Binding removed"),
            Event::BindingRemovalFailed { name, site, .. } => write!(
                f,
                "ERR: Could not remove binding for prefix filter {name} from site {site}"
            ),
            Event::FilterDeleted { name } => write!(f, "{name} deleted"),
            Event::FilterDeletionFailed { name, .. } => {
                write!(f, "ERR: Could not delete prefix filter {name}")
            }
        }
    }
}

/// Sink for reported events.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

impl Reporter for Vec<Event> {
    fn report(&mut self, event: Event) {
        self.push(event);
    }
}

/// Counts of every outcome in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub listing_failures: usize,
    pub not_found: usize,
    pub query_failures: usize,
    pub unbound: usize,
    pub bindings_removed: usize,
    pub binding_failures: usize,
    pub zombie_bindings: usize,
    pub filters_deleted: usize,
    pub filter_failures: usize,
}

impl Summary {
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::ListingFailed { .. } => self.listing_failures += 1,
            Event::PrefixNotFound { .. } => self.not_found += 1,
            Event::BindingQueryFailed { .. } => self.query_failures += 1,
            Event::NotBound { .. } => self.unbound += 1,
            Event::BindingsFound { .. } => {}
            Event::ZombieBinding { .. } => self.zombie_bindings += 1,
            Event::BindingRemoved { .. } => self.bindings_removed += 1,
            Event::BindingRemovalFailed { .. } => self.binding_failures += 1,
            Event::FilterDeleted { .. } => self.filters_deleted += 1,
            Event::FilterDeletionFailed { .. } => self.filter_failures += 1,
        }
    }

    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut summary = Self::default();
        for event in events {
            summary.record(event);
        }
        summary
    }

    /// Failed operations, not counting skipped names.
    pub fn failures(&self) -> usize {
        self.listing_failures + self.query_failures + self.binding_failures + self.filter_failures
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(
            f,
            "  Bindings removed: {} ({} zombie)",
            self.bindings_removed, self.zombie_bindings
        )?;
        writeln!(f, "  Binding removals failed: {}", self.binding_failures)?;
        writeln!(f, "  Prefix filters not bound: {}", self.unbound)?;
        writeln!(f, "  Prefix filters deleted: {}", self.filters_deleted)?;
        writeln!(f, "  Prefix filter deletions failed: {}", self.filter_failures)?;
        writeln!(f, "  Names not found: {}", self.not_found)?;
        write!(
            f,
            "  Lookup failures: {} listing, {} binding query",
            self.listing_failures, self.query_failures
        )
    }
}
