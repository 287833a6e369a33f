//! Binding removal and prefix filter deletion.

use crate::api::ControllerApi;
use crate::error::Result;
use crate::index::NameIndex;
use crate::model::{Binding, PageRequest};
use crate::report::{Event, Reporter, Stage};
use std::collections::HashSet;

/// Default number of bindings requested per query page.
pub const DEFAULT_QUERY_PAGE_SIZE: u32 = 100;

/// Largest page size the controller accepts for queries.
pub const MAX_QUERY_PAGE_SIZE: u32 = 1000;

/// Remove every site binding of each named prefix filter.
///
/// Names missing from the index are reported and skipped. A failed query
/// skips the name; a failed delete only affects that binding.
pub async fn remove_bindings<A, R>(
    api: &A,
    index: &NameIndex,
    names: &[String],
    page_size: u32,
    reporter: &mut R,
) where
    A: ControllerApi + ?Sized,
    R: Reporter + ?Sized,
{
    for name in distinct(names) {
        let Some(prefix_id) = index.prefix_filters.id_of(name) else {
            reporter.report(Event::PrefixNotFound {
                name: name.to_string(),
                stage: Stage::RemoveBindings,
            });
            continue;
        };

        let bindings = match fetch_all_bindings(api, prefix_id, page_size).await {
            Ok(bindings) => bindings,
            Err(error) => {
                tracing::warn!(prefix = %name, prefix_id = %prefix_id, error = %error, "Binding query failed");
                reporter.report(Event::BindingQueryFailed {
                    name: name.to_string(),
                    error: error.to_string(),
                });
                continue;
            }
        };

        if bindings.is_empty() {
            reporter.report(Event::NotBound {
                name: name.to_string(),
            });
            continue;
        }

        reporter.report(Event::BindingsFound {
            name: name.to_string(),
            count: bindings.len(),
        });

        for binding in &bindings {
            let site = match index.sites.name_of(&binding.site_id) {
                Some(site_name) => site_name.to_string(),
                None => {
                    reporter.report(Event::ZombieBinding {
                        name: name.to_string(),
                        site_id: binding.site_id.clone(),
                    });
                    binding.site_id.clone()
                }
            };

            match api.delete_binding(&binding.site_id, &binding.id).await {
                Ok(()) => reporter.report(Event::BindingRemoved {
                    name: name.to_string(),
                    site,
                }),
                Err(error) => {
                    tracing::warn!(
                        prefix = %name,
                        site_id = %binding.site_id,
                        binding_id = %binding.id,
                        error = %error,
                        "Binding removal failed"
                    );
                    reporter.report(Event::BindingRemovalFailed {
                        name: name.to_string(),
                        site,
                        error: error.to_string(),
                    });
                }
            }
        }
    }
}

/// Delete each named prefix filter object.
pub async fn delete_filters<A, R>(api: &A, index: &NameIndex, names: &[String], reporter: &mut R)
where
    A: ControllerApi + ?Sized,
    R: Reporter + ?Sized,
{
    for name in distinct(names) {
        let Some(prefix_id) = index.prefix_filters.id_of(name) else {
            reporter.report(Event::PrefixNotFound {
                name: name.to_string(),
                stage: Stage::DeleteFilters,
            });
            continue;
        };

        match api.delete_prefix_filter(prefix_id).await {
            Ok(()) => reporter.report(Event::FilterDeleted {
                name: name.to_string(),
            }),
            Err(error) => {
                tracing::warn!(prefix = %name, prefix_id = %prefix_id, error = %error, "Prefix filter deletion failed");
                reporter.report(Event::FilterDeletionFailed {
                    name: name.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }
}

/// Page through every binding that references `prefix_id`.
///
/// Stops on a short or empty page, once `total_count` items are in hand, or
/// when a page brings no binding id not already seen. Each id is returned
/// once.
pub async fn fetch_all_bindings<A>(api: &A, prefix_id: &str, page_size: u32) -> Result<Vec<Binding>>
where
    A: ControllerApi + ?Sized,
{
    let mut page = PageRequest::first(page_size.clamp(1, MAX_QUERY_PAGE_SIZE));
    let mut bindings = Vec::new();
    let mut seen = HashSet::new();

    loop {
        tracing::debug!(prefix_id = %prefix_id, page = page.page, size = page.size, "Querying bindings");
        let result = api.query_bindings(prefix_id, page).await?;
        let returned = result.items.len();
        let before = bindings.len();
        bindings.extend(
            result
                .items
                .into_iter()
                .filter(|binding| seen.insert(binding.id.clone())),
        );

        if returned > 0 && bindings.len() == before {
            tracing::warn!(
                prefix_id = %prefix_id,
                page = page.page,
                "Binding query returned only known bindings; controller may be ignoring dest_page"
            );
            break;
        }

        let complete = returned < page.size as usize
            || result
                .total_count
                .is_some_and(|total| bindings.len() as u64 >= total);
        if complete {
            break;
        }
        page = page.next();
    }

    Ok(bindings)
}

fn distinct(names: &[String]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .filter(move |name| seen.insert(*name))
}
