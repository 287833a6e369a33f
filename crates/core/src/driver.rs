//! Run orchestration once the session is authenticated.

use crate::action::Action;
use crate::api::ControllerApi;
use crate::index::{NameIndex, build_index};
use crate::reconcile::{DEFAULT_QUERY_PAGE_SIZE, delete_filters, remove_bindings};
use crate::report::{Event, Reporter, Summary};

/// Validated inputs for a run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub action: Action,
    pub names: Vec<String>,
    pub page_size: u32,
}

impl RunPlan {
    pub fn new(action: Action, names: Vec<String>) -> Self {
        Self {
            action,
            names,
            page_size: DEFAULT_QUERY_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Forwards events to the caller's reporter while counting them.
struct Tally<'a, R: ?Sized> {
    inner: &'a mut R,
    summary: Summary,
}

impl<R: Reporter + ?Sized> Reporter for Tally<'_, R> {
    fn report(&mut self, event: Event) {
        self.summary.record(&event);
        self.inner.report(event);
    }
}

/// Build the index, then run the passes the action calls for.
///
/// `delete_prefix` always removes bindings before deleting filters. The
/// returned summary covers index building and both passes.
pub async fn run<A, R>(api: &A, plan: &RunPlan, reporter: &mut R) -> (NameIndex, Summary)
where
    A: ControllerApi + ?Sized,
    R: Reporter + ?Sized,
{
    let mut tally = Tally {
        inner: reporter,
        summary: Summary::default(),
    };

    let index = build_index(api, &mut tally).await;

    tracing::info!(action = %plan.action, names = plan.names.len(), "Processing prefix filters");
    match plan.action {
        Action::DeleteBinding => {
            remove_bindings(api, &index, &plan.names, plan.page_size, &mut tally).await;
        }
        Action::DeletePrefix => {
            remove_bindings(api, &index, &plan.names, plan.page_size, &mut tally).await;
            delete_filters(api, &index, &plan.names, &mut tally).await;
        }
    }

    (index, tally.summary)
}
