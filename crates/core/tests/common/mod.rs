//! In-memory controller used by the reconciliation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use prefixprune_core::{
    Binding, BindingPage, ControllerApi, Error, PageRequest, PrefixFilter, Result, Site,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// A call observed by [`FakeController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSites,
    ListPrefixFilters,
    Query { prefix_id: String, page: u32 },
    DeleteBinding { site_id: String, binding_id: String },
    DeletePrefixFilter { prefix_id: String },
}

#[derive(Default)]
struct State {
    sites: Vec<Site>,
    filters: Vec<PrefixFilter>,
    bindings: BTreeMap<String, Vec<Binding>>,
    calls: Vec<Call>,
}

/// Controller double that keeps state and records every call.
///
/// Successful deletes mutate the state, so a second run observes the
/// result of the first.
#[derive(Default)]
pub struct FakeController {
    state: Mutex<State>,
    fail_site_listing: bool,
    fail_filter_listing: bool,
    fail_queries: HashSet<String>,
    fail_binding_deletes: HashSet<String>,
    fail_filter_deletes: HashSet<String>,
    report_total_count: bool,
    ignore_dest_page: bool,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().sites.push(Site {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_filter(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().filters.push(PrefixFilter {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_binding(self, id: &str, site_id: &str, prefix_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .bindings
            .entry(prefix_id.to_string())
            .or_default()
            .push(Binding {
                id: id.to_string(),
                site_id: site_id.to_string(),
                prefix_id: prefix_id.to_string(),
            });
        self
    }

    pub fn failing_site_listing(mut self) -> Self {
        self.fail_site_listing = true;
        self
    }

    pub fn failing_filter_listing(mut self) -> Self {
        self.fail_filter_listing = true;
        self
    }

    pub fn failing_query(mut self, prefix_id: &str) -> Self {
        self.fail_queries.insert(prefix_id.to_string());
        self
    }

    pub fn failing_binding_delete(mut self, binding_id: &str) -> Self {
        self.fail_binding_deletes.insert(binding_id.to_string());
        self
    }

    pub fn failing_filter_delete(mut self, prefix_id: &str) -> Self {
        self.fail_filter_deletes.insert(prefix_id.to_string());
        self
    }

    pub fn reporting_total_count(mut self) -> Self {
        self.report_total_count = true;
        self
    }

    /// Answer every query with the first page, as a controller that
    /// ignores `dest_page` would.
    pub fn ignoring_dest_page(mut self) -> Self {
        self.ignore_dest_page = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn queries(&self) -> usize {
        self.count(|c| matches!(c, Call::Query { .. }))
    }

    pub fn binding_deletes(&self) -> usize {
        self.count(|c| matches!(c, Call::DeleteBinding { .. }))
    }

    pub fn filter_deletes(&self) -> usize {
        self.count(|c| matches!(c, Call::DeletePrefixFilter { .. }))
    }

    pub fn remaining_bindings(&self, prefix_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .bindings
            .get(prefix_id)
            .map_or(0, Vec::len)
    }

    pub fn has_filter(&self, prefix_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .filters
            .iter()
            .any(|f| f.id == prefix_id)
    }
}

fn server_error() -> Error {
    Error::Api {
        status: 500,
        body: "internal error".to_string(),
    }
}

#[async_trait]
impl ControllerApi for FakeController {
    async fn list_sites(&self) -> Result<Vec<Site>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListSites);
        if self.fail_site_listing {
            return Err(server_error());
        }
        Ok(state.sites.clone())
    }

    async fn list_prefix_filters(&self) -> Result<Vec<PrefixFilter>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListPrefixFilters);
        if self.fail_filter_listing {
            return Err(server_error());
        }
        Ok(state.filters.clone())
    }

    async fn query_bindings(&self, prefix_id: &str, page: PageRequest) -> Result<BindingPage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Query {
            prefix_id: prefix_id.to_string(),
            page: page.page,
        });
        if self.fail_queries.contains(prefix_id) {
            return Err(server_error());
        }
        let all = state.bindings.get(prefix_id).cloned().unwrap_or_default();
        let start = if self.ignore_dest_page {
            0
        } else {
            ((page.page - 1) * page.size) as usize
        };
        let items = all
            .iter()
            .skip(start)
            .take(page.size as usize)
            .cloned()
            .collect();
        Ok(BindingPage {
            items,
            total_count: self.report_total_count.then_some(all.len() as u64),
        })
    }

    async fn delete_binding(&self, site_id: &str, binding_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteBinding {
            site_id: site_id.to_string(),
            binding_id: binding_id.to_string(),
        });
        if self.fail_binding_deletes.contains(binding_id) {
            return Err(server_error());
        }
        for bindings in state.bindings.values_mut() {
            bindings.retain(|b| b.id != binding_id);
        }
        Ok(())
    }

    async fn delete_prefix_filter(&self, prefix_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeletePrefixFilter {
            prefix_id: prefix_id.to_string(),
        });
        if self.fail_filter_deletes.contains(prefix_id) {
            return Err(server_error());
        }
        state.filters.retain(|f| f.id != prefix_id);
        Ok(())
    }
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
