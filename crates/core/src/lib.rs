//! Reconciliation of SD-WAN security local prefix filters.
//!
//! This crate holds everything that does not depend on HTTP:
//! - Controller object models and query wire shapes
//! - The [`ControllerApi`] seam the reconciler drives
//! - The name/ID index built once per run
//! - CSV work queue parsing
//! - Binding removal, prefix filter deletion and the run driver
//! - Reported events and the run summary

pub mod action;
pub mod api;
pub mod driver;
pub mod error;
pub mod index;
pub mod input;
pub mod model;
pub mod reconcile;
pub mod report;

pub use action::{Action, Resource};
pub use api::ControllerApi;
pub use driver::{RunPlan, run};
pub use error::{Error, Result};
pub use index::{Collection, LookupTable, NameIndex, build_index};
pub use input::{PF_NAME_COLUMN, read_prefix_names};
pub use model::{Binding, BindingPage, BindingQuery, PageRequest, PrefixFilter, Site};
pub use reconcile::{
    DEFAULT_QUERY_PAGE_SIZE, MAX_QUERY_PAGE_SIZE, delete_filters, fetch_all_bindings,
    remove_bindings,
};
pub use report::{Event, Reporter, Stage, Summary};
