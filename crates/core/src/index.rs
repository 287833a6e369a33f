//! Name/ID lookup tables built once per run.

use crate::api::ControllerApi;
use crate::report::{Event, Reporter};
use std::collections::HashMap;

/// Bidirectional id/name map for one entity type.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    id_to_name: HashMap<String, String>,
    name_to_id: HashMap<String, String>,
    shadowed: Vec<String>,
}

impl LookupTable {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::default();
        for (id, name) in pairs {
            if let Some(previous) = table.name_to_id.insert(name.clone(), id.clone())
                && previous != id
            {
                tracing::warn!(
                    name = %name,
                    kept_id = %id,
                    shadowed_id = %previous,
                    "Duplicate name; only the last id is reachable by name"
                );
                table.shadowed.push(previous);
            }
            table.id_to_name.insert(id, name);
        }
        table
    }

    /// Ids whose name was taken over by a later entry with the same name.
    pub fn shadowed(&self) -> &[String] {
        &self.shadowed
    }

    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

/// Read-only snapshot of sites and prefix filters.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    pub sites: LookupTable,
    pub prefix_filters: LookupTable,
}

/// Collections the index is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sites,
    PrefixFilters,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Sites => f.write_str("Sites"),
            Collection::PrefixFilters => f.write_str("Security Local Prefix Filters"),
        }
    }
}

/// List sites and prefix filters and index them by id and name.
///
/// A failed listing is reported and leaves that half of the index empty.
pub async fn build_index<A, R>(api: &A, reporter: &mut R) -> NameIndex
where
    A: ControllerApi + ?Sized,
    R: Reporter + ?Sized,
{
    let sites = match api.list_sites().await {
        Ok(sites) => LookupTable::from_pairs(sites.into_iter().map(|s| (s.id, s.name))),
        Err(error) => {
            tracing::warn!(error = %error, "Site listing failed");
            reporter.report(Event::ListingFailed {
                collection: Collection::Sites,
                error: error.to_string(),
            });
            LookupTable::default()
        }
    };

    let prefix_filters = match api.list_prefix_filters().await {
        Ok(filters) => LookupTable::from_pairs(filters.into_iter().map(|p| (p.id, p.name))),
        Err(error) => {
            tracing::warn!(error = %error, "Prefix filter listing failed");
            reporter.report(Event::ListingFailed {
                collection: Collection::PrefixFilters,
                error: error.to_string(),
            });
            LookupTable::default()
        }
    };

    tracing::info!(
        sites = sites.len(),
        prefix_filters = prefix_filters.len(),
        "Built name index"
    );

    NameIndex {
        sites,
        prefix_filters,
    }
}
