//! Single-threaded event loop feeding the organizer.
//!
//! The existence probe ticks on an interval; everything else arrives over one
//! unbounded channel. Mutation records are delivered on a later turn through a
//! self-sent [`EngineEvent::FlushMutations`], and suppression is released on
//! the turn after that, so a pass never observes its own writes.

use crate::detector::PROBE_INTERVAL;
use crate::organizer::ClickOutcome;
use crate::organizer::Organizer;
use crate::organizer::PassOutcome;
use crate::organizer::PassReport;
use navgroup_config::SettingsEdit;
use navgroup_config::SettingsStore;
use navgroup_dom::Dom;
use navgroup_dom::NodeId;
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio::time::interval_at;
use tracing::debug;
use tracing::warn;

/// A change the host makes to its own document.
pub type HostAction<D> = Box<dyn FnOnce(&mut D)>;

pub enum EngineEvent<D> {
    /// Settings collaborator asks for an immediate regroup.
    Recheck,
    Edit(SettingsEdit),
    Click(NodeId),
    Host(HostAction<D>),
    FlushMutations,
    ReleaseSuppression,
    Shutdown,
}

impl<D> std::fmt::Debug for EngineEvent<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::Recheck => write!(f, "Recheck"),
            EngineEvent::Edit(edit) => write!(f, "Edit({edit:?})"),
            EngineEvent::Click(node) => write!(f, "Click({node})"),
            EngineEvent::Host(_) => write!(f, "Host(..)"),
            EngineEvent::FlushMutations => write!(f, "FlushMutations"),
            EngineEvent::ReleaseSuppression => write!(f, "ReleaseSuppression"),
            EngineEvent::Shutdown => write!(f, "Shutdown"),
        }
    }
}

pub struct EngineEventSender<D> {
    tx: UnboundedSender<EngineEvent<D>>,
}

impl<D> Clone for EngineEventSender<D> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<D> EngineEventSender<D> {
    pub fn send(&self, event: EngineEvent<D>) {
        // The driver may already have exited; nothing to deliver to then.
        if let Err(err) = self.tx.send(event) {
            debug!("engine event dropped: {:?}", err.0);
        }
    }

    pub fn host(&self, action: impl FnOnce(&mut D) + 'static) {
        self.send(EngineEvent::Host(Box::new(action)));
    }

    pub fn edit(&self, edit: SettingsEdit) {
        self.send(EngineEvent::Edit(edit));
    }

    pub fn click(&self, node: NodeId) {
        self.send(EngineEvent::Click(node));
    }

    pub fn recheck(&self) {
        self.send(EngineEvent::Recheck);
    }

    pub fn shutdown(&self) {
        self.send(EngineEvent::Shutdown);
    }
}

type PassListener<D> = Box<dyn FnMut(&D, &PassReport)>;
type ClickListener<D> = Box<dyn FnMut(&D, &ClickOutcome)>;

pub struct DriverExit<D, S: SettingsStore> {
    pub dom: D,
    pub organizer: Organizer<S>,
}

pub struct Driver<D: Dom, S: SettingsStore> {
    dom: D,
    organizer: Organizer<S>,
    rx: UnboundedReceiver<EngineEvent<D>>,
    tx: EngineEventSender<D>,
    on_pass: Option<PassListener<D>>,
    on_click: Option<ClickListener<D>>,
    flush_scheduled: bool,
    release_scheduled: bool,
}

impl<D: Dom, S: SettingsStore> Driver<D, S> {
    pub fn new(dom: D, organizer: Organizer<S>) -> (Self, EngineEventSender<D>) {
        let (tx, rx) = unbounded_channel();
        let tx = EngineEventSender { tx };
        let driver = Self {
            dom,
            organizer,
            rx,
            tx: tx.clone(),
            on_pass: None,
            on_click: None,
            flush_scheduled: false,
            release_scheduled: false,
        };
        (driver, tx)
    }

    /// Called after every pass that ran.
    pub fn on_pass(mut self, listener: impl FnMut(&D, &PassReport) + 'static) -> Self {
        self.on_pass = Some(Box::new(listener));
        self
    }

    pub fn on_click(mut self, listener: impl FnMut(&D, &ClickOutcome) + 'static) -> Self {
        self.on_click = Some(Box::new(listener));
        self
    }

    /// Runs until [`EngineEvent::Shutdown`], then stops the organizer, which
    /// reverts the document.
    pub async fn run(mut self) -> DriverExit<D, S> {
        self.organizer.start(&mut self.dom);
        let mut probe = interval_at(Instant::now() + PROBE_INTERVAL, PROBE_INTERVAL);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let keep_running = select! {
                _ = probe.tick() => {
                    let outcome = self.organizer.on_probe_tick(&mut self.dom);
                    self.report(outcome);
                    true
                }
                event = self.rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => false,
                },
            };
            if !keep_running {
                break;
            }
            self.schedule_follow_ups();
        }

        self.organizer.stop(&mut self.dom);
        DriverExit {
            dom: self.dom,
            organizer: self.organizer,
        }
    }

    fn handle_event(&mut self, event: EngineEvent<D>) -> bool {
        match event {
            EngineEvent::Recheck => {
                let outcome = self.organizer.recheck_and_apply(&mut self.dom);
                self.report(outcome);
            }
            EngineEvent::Edit(edit) => match self.organizer.apply_edit(&mut self.dom, edit) {
                Ok(outcome) => self.report(outcome),
                Err(err) => warn!("settings edit rejected: {err}"),
            },
            EngineEvent::Click(node) => {
                let outcome = self.organizer.handle_click(&mut self.dom, node);
                debug!(?outcome, "click handled");
                if let Some(listener) = self.on_click.as_mut() {
                    listener(&self.dom, &outcome);
                }
            }
            EngineEvent::Host(action) => action(&mut self.dom),
            EngineEvent::FlushMutations => {
                self.flush_scheduled = false;
                let outcome = self.organizer.on_mutations(&mut self.dom);
                self.report(outcome);
            }
            EngineEvent::ReleaseSuppression => {
                self.release_scheduled = false;
                self.organizer.release_suppression();
            }
            EngineEvent::Shutdown => return false,
        }
        true
    }

    fn report(&mut self, outcome: PassOutcome) {
        if let PassOutcome::Applied(report) = outcome
            && let Some(listener) = self.on_pass.as_mut()
        {
            listener(&self.dom, &report);
        }
    }

    /// Queues delivery of pending records, then the release of suppression,
    /// both behind whatever is already queued.
    fn schedule_follow_ups(&mut self) {
        if !self.flush_scheduled && self.organizer.pending_records(&self.dom) > 0 {
            self.flush_scheduled = true;
            self.tx.send(EngineEvent::FlushMutations);
        }
        if !self.release_scheduled && self.organizer.state().suspended {
            self.release_scheduled = true;
            self.tx.send(EngineEvent::ReleaseSuppression);
        }
    }
}
