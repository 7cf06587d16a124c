use crate::state::EngineState;
use navgroup_dom::Dom;
use navgroup_dom::MutationRecord;
use navgroup_dom::NodeId;
use navgroup_dom::ObserveOptions;
use navgroup_dom::ObserverId;
use navgroup_dom::host;
use std::time::Duration;
use tracing::debug;
use tracing::trace;

/// How often the sidebar's existence is checked.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The sidebar appeared (or was replaced) and is now observed. The caller
    /// should run one recheck.
    Attached,
    /// The sidebar went away and observation stopped.
    Detached,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No records were queued.
    Empty,
    /// Records arrived while suspended and were discarded.
    Dropped(usize),
    /// Only attribute churn; nothing to regroup.
    AttributesOnly(usize),
    /// At least one insertion or removal.
    Recheck(usize),
}

/// Watches for the sidebar to exist, then for structural change inside it.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    observer: Option<ObserverId>,
    watched: Option<NodeId>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watched(&self) -> Option<NodeId> {
        self.watched
    }

    pub fn probe<D: Dom>(&mut self, dom: &mut D, state: &mut EngineState) -> ProbeOutcome {
        let items = dom.query_first(dom.root(), host::GROUP_ITEMS);
        match items {
            Some(items) => {
                let stale = self
                    .watched
                    .is_some_and(|watched| !dom.is_connected(watched));
                if state.attached && !stale {
                    return ProbeOutcome::Unchanged;
                }
                if stale {
                    debug!("sidebar was replaced; re-attaching observer");
                    self.disconnect(dom);
                }
                // Watch the whole sidebar so edits in any section reach us.
                let target = dom.closest(items, host::SIDEBAR).unwrap_or(items);
                self.observer = Some(dom.observe(target, ObserveOptions::structure()));
                self.watched = Some(target);
                state.attached = true;
                debug!(target = %target, "sidebar observer attached");
                ProbeOutcome::Attached
            }
            None if state.attached => {
                self.stop(dom, state);
                debug!("sidebar gone; observer detached");
                ProbeOutcome::Detached
            }
            None => ProbeOutcome::Unchanged,
        }
    }

    /// Takes the queued batch and decides whether it asks for a recheck.
    pub fn drain<D: Dom>(&mut self, dom: &mut D, state: &EngineState) -> BatchOutcome {
        let Some(observer) = self.observer else {
            return BatchOutcome::Empty;
        };
        let records = dom.take_records(observer);
        if records.is_empty() {
            return BatchOutcome::Empty;
        }
        let count = records.len();
        if state.suspended {
            trace!(count, "dropping records from our own writes");
            return BatchOutcome::Dropped(count);
        }
        if records.iter().any(MutationRecord::is_child_list) {
            BatchOutcome::Recheck(count)
        } else {
            BatchOutcome::AttributesOnly(count)
        }
    }

    pub fn pending<D: Dom>(&self, dom: &D) -> usize {
        self.observer
            .map(|observer| dom.pending_records(observer))
            .unwrap_or(0)
    }

    pub fn stop<D: Dom>(&mut self, dom: &mut D, state: &mut EngineState) {
        self.disconnect(dom);
        state.attached = false;
    }

    fn disconnect<D: Dom>(&mut self, dom: &mut D) {
        if let Some(observer) = self.observer.take() {
            dom.disconnect(observer);
        }
        self.watched = None;
    }
}
