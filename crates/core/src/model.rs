//! Controller objects and wire shapes.

use serde::{Deserialize, Serialize};

/// A site a prefix filter can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
}

/// A tenant-level local prefix filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixFilter {
    pub id: String,
    pub name: String,
}

/// Association between one prefix filter and one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub id: String,
    pub site_id: String,
    #[serde(default)]
    pub prefix_id: String,
}

/// Bulk listing payload returned by collection GETs.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub items: Vec<T>,
}

/// One page of a binding query.
#[derive(Debug, Default, Deserialize)]
pub struct BindingPage {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub items: Vec<Binding>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Page selector for the binding query. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub size: u32,
    pub page: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        Self { size, page: 1 }
    }

    pub fn next(self) -> Self {
        Self {
            size: self.size,
            page: self.page + 1,
        }
    }
}

/// Body of the binding query POST.
#[derive(Debug, Serialize)]
pub struct BindingQuery {
    pub query_params: BindingQueryParams,
    pub limit: u32,
    pub dest_page: u32,
    #[serde(rename = "getDeleted")]
    pub get_deleted: bool,
    pub retrieved_fields_mask: bool,
    pub retrieved_fields: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BindingQueryParams {
    pub prefix_id: EqFilter,
}

#[derive(Debug, Serialize)]
pub struct EqFilter {
    pub eq: String,
}

impl BindingQuery {
    /// Query for bindings of `prefix_id`, restricted to one page.
    pub fn for_prefix(prefix_id: &str, page: PageRequest) -> Self {
        Self {
            query_params: BindingQueryParams {
                prefix_id: EqFilter {
                    eq: prefix_id.to_string(),
                },
            },
            limit: page.size,
            dest_page: page.page,
            get_deleted: false,
            retrieved_fields_mask: false,
            retrieved_fields: Vec::new(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
