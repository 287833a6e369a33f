//! Controller API seam.

use crate::error::Result;
use crate::model::{BindingPage, PageRequest, PrefixFilter, Site};
use async_trait::async_trait;

/// Operations the reconciler needs from the controller.
///
/// Every call is awaited before the next is issued; implementations do not
/// need to be re-entrant.
#[async_trait]
pub trait ControllerApi: Send + Sync {
    /// List all sites of the tenant.
    async fn list_sites(&self) -> Result<Vec<Site>>;

    /// List all tenant-level security local prefix filters.
    async fn list_prefix_filters(&self) -> Result<Vec<PrefixFilter>>;

    /// Fetch one page of site bindings that reference `prefix_id`.
    async fn query_bindings(&self, prefix_id: &str, page: PageRequest) -> Result<BindingPage>;

    /// Remove one site binding.
    async fn delete_binding(&self, site_id: &str, binding_id: &str) -> Result<()>;

    /// Remove a prefix filter object.
    async fn delete_prefix_filter(&self, prefix_id: &str) -> Result<()>;
}
