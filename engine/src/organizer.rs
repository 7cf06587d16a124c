use crate::classes;
use crate::detector::BatchOutcome;
use crate::detector::ChangeDetector;
use crate::detector::ProbeOutcome;
use crate::features;
use crate::grouping;
use crate::grouping::KnownPlugins;
use crate::state::EngineState;
use crate::sync::PresentationSync;
use crate::sync::ProxyActivation;
use navgroup_config::ChangeImpact;
use navgroup_config::ConfigError;
use navgroup_config::Settings;
use navgroup_config::SettingsEdit;
use navgroup_config::SettingsStore;
use navgroup_config::load_settings;
use navgroup_dom::Dom;
use navgroup_dom::NodeId;
use navgroup_dom::host;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Source of installed plugin names. `None` means the registry is not
/// available yet, which skips grouping for the pass.
pub trait PluginRegistry {
    fn plugin_names(&self) -> Option<Vec<String>>;
}

impl PluginRegistry for Vec<String> {
    fn plugin_names(&self) -> Option<Vec<String>> {
        Some(self.clone())
    }
}

/// Shared, mutable plugin list for hosts that install plugins at runtime.
#[derive(Debug, Clone, Default)]
pub struct InstalledPlugins(Rc<RefCell<Vec<String>>>);

impl InstalledPlugins {
    pub fn new(names: Vec<String>) -> Self {
        Self(Rc::new(RefCell::new(names)))
    }

    pub fn install(&self, name: impl Into<String>) {
        let name = name.into();
        let mut names = self.0.borrow_mut();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    pub fn uninstall(&self, name: &str) {
        self.0.borrow_mut().retain(|installed| installed != name);
    }
}

impl PluginRegistry for InstalledPlugins {
    fn plugin_names(&self) -> Option<Vec<String>> {
        Some(self.0.borrow().clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub container: Option<NodeId>,
    pub folders: usize,
    pub proxies: usize,
    pub hidden: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing ran: no sidebar, or nothing asked for a recheck.
    Idle,
    Applied(PassReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Forwarded(NodeId),
    Fallback(NodeId),
    GroupToggled { title: String, open: bool },
    SectionToggled { label: String, collapsed: bool },
    CompactOpened(NodeId),
    /// Not ours to handle; passed to the host.
    Host,
    Ignored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub passes: usize,
    pub rechecks_requested: usize,
    pub dropped_batches: usize,
    pub ignored_batches: usize,
}

/// Ties detection, grouping and presentation together for one host document.
pub struct Organizer<S: SettingsStore> {
    settings: Settings,
    store: S,
    registry: Box<dyn PluginRegistry>,
    state: EngineState,
    detector: ChangeDetector,
    sync: PresentationSync,
    stats: EngineStats,
}

impl<S: SettingsStore> Organizer<S> {
    /// Loads settings from `store`, falling back to defaults.
    pub fn new(store: S, registry: impl PluginRegistry + 'static) -> Self {
        let settings = load_settings(&store);
        Self {
            settings,
            store,
            registry: Box::new(registry),
            state: EngineState::default(),
            detector: ChangeDetector::new(),
            sync: PresentationSync::new(),
            stats: EngineStats::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn presentation(&self) -> &PresentationSync {
        &self.sync
    }

    /// Run once the host layout is ready.
    pub fn start<D: Dom>(&mut self, dom: &mut D) {
        let restored = features::restore_section_states(dom, &self.settings);
        info!(
            groups = self.settings.groups.len(),
            restored, "organizer started"
        );
    }

    pub fn on_probe_tick<D: Dom>(&mut self, dom: &mut D) -> PassOutcome {
        match self.detector.probe(dom, &mut self.state) {
            ProbeOutcome::Attached => self.recheck_and_apply(dom),
            ProbeOutcome::Detached | ProbeOutcome::Unchanged => PassOutcome::Idle,
        }
    }

    /// Handles the batch of records queued since the last call.
    pub fn on_mutations<D: Dom>(&mut self, dom: &mut D) -> PassOutcome {
        match self.detector.drain(dom, &self.state) {
            BatchOutcome::Empty => PassOutcome::Idle,
            BatchOutcome::Dropped(_) => {
                self.stats.dropped_batches += 1;
                PassOutcome::Idle
            }
            BatchOutcome::AttributesOnly(_) => {
                self.stats.ignored_batches += 1;
                PassOutcome::Idle
            }
            BatchOutcome::Recheck(count) => {
                self.stats.rechecks_requested += 1;
                debug!(count, "structural change observed");
                self.recheck_and_apply(dom)
            }
        }
    }

    pub fn pending_records<D: Dom>(&self, dom: &D) -> usize {
        self.detector.pending(dom)
    }

    /// Regroups the sidebar now. Safe to call at any time; without a sidebar
    /// it does nothing.
    ///
    /// Leaves the engine suspended. Call [`Organizer::release_suppression`]
    /// on a later turn, after the records this pass produced were drained.
    pub fn recheck_and_apply<D: Dom>(&mut self, dom: &mut D) -> PassOutcome {
        if dom.query_first(dom.root(), host::GROUP_ITEMS).is_none() {
            return PassOutcome::Idle;
        }
        self.state.suspend();
        features::restore_on_recheck(dom, &self.settings);
        let report = self.organize(dom);
        if let Err(err) = features::apply_compact_mode(dom, &self.settings) {
            warn!("compact mode not applied: {err}");
        }
        self.stats.passes += 1;
        PassOutcome::Applied(report)
    }

    fn organize<D: Dom>(&mut self, dom: &mut D) -> PassReport {
        let Some(names) = self.registry.plugin_names() else {
            debug!("plugin registry unavailable");
            return PassReport::default();
        };
        let known = KnownPlugins::new(names);
        let all = grouping::snapshot_items(&*dom, dom.root());
        // Folders from an earlier pass go even when nothing can be grouped now.
        self.sync.clear(dom);
        let Some(container) = grouping::find_target_container(&all, &known) else {
            debug!("no plugin list in the sidebar");
            return PassReport::default();
        };

        let candidates = grouping::snapshot_items(&*dom, container);
        let plan = grouping::plan(
            container,
            &candidates,
            &self.settings.groups,
            self.settings.show_ungrouped,
            &known,
        );
        let mut report = PassReport {
            container: Some(container),
            ..PassReport::default()
        };
        match self.sync.apply(dom, &plan, &self.settings) {
            Ok(applied) => {
                report.folders = applied.folders;
                report.proxies = applied.proxies;
                report.hidden = applied.hidden;
            }
            Err(err) => warn!("grouping not applied: {err}"),
        }
        report
    }

    pub fn release_suppression(&mut self) {
        self.state.release();
    }

    /// Applies a settings edit, saves it, and regroups when the edit changes
    /// what grouping sees.
    pub fn apply_edit<D: Dom>(
        &mut self,
        dom: &mut D,
        edit: SettingsEdit,
    ) -> Result<PassOutcome, ConfigError> {
        let impact = edit.apply(&mut self.settings)?;
        match impact {
            ChangeImpact::Unchanged => Ok(PassOutcome::Idle),
            ChangeImpact::PersistOnly => {
                self.persist();
                Ok(PassOutcome::Idle)
            }
            ChangeImpact::Resync => {
                self.persist();
                self.state.suspend();
                if !self.settings.collapsible_headers {
                    features::clear_section_collapse(dom);
                }
                self.sync.clear(dom);
                Ok(self.recheck_and_apply(dom))
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.settings) {
            warn!("failed to save settings: {err}");
        }
    }

    /// Routes a user click to whichever engine affordance it landed on, or to
    /// the host.
    pub fn handle_click<D: Dom>(&mut self, dom: &mut D, target: NodeId) -> ClickOutcome {
        if let Some(button) = dom.closest(target, classes::SECTION_BUTTON) {
            return match features::activate_section_button(dom, button) {
                Some(entry) => ClickOutcome::CompactOpened(entry),
                None => ClickOutcome::Ignored,
            };
        }

        if let Some(proxy) = dom.closest(target, classes::PROXY)
            && let Some(activation) = self.sync.activate_proxy(dom, proxy)
        {
            return match activation {
                ProxyActivation::Forwarded(item) => ClickOutcome::Forwarded(item),
                ProxyActivation::Fallback(item) => ClickOutcome::Fallback(item),
                ProxyActivation::Missing => ClickOutcome::Ignored,
            };
        }

        if let Some(summary) = dom.closest(target, classes::SUMMARY)
            && let Some(folder) = dom.parent(summary)
            && let Some(title) = self.sync.title_of(folder).map(str::to_string)
        {
            let open = !dom.is_open(folder);
            dom.set_open(folder, open);
            if self.settings.set_group_expanded(&title, open) {
                self.persist();
            }
            return ClickOutcome::GroupToggled { title, open };
        }

        if self.settings.collapsible_headers && dom.has_class(target, host::GROUP_TITLE) {
            let label = dom.label(target);
            if let Some(collapsed) = features::toggle_section(dom, target, &mut self.settings) {
                self.persist();
                return ClickOutcome::SectionToggled { label, collapsed };
            }
        }

        dom.click(target);
        ClickOutcome::Host
    }

    /// Stops observing and removes everything the engine added.
    pub fn stop<D: Dom>(&mut self, dom: &mut D) {
        self.detector.stop(dom, &mut self.state);
        self.sync.teardown(dom);
        features::revert(dom);
        self.state = EngineState::default();
        info!(passes = self.stats.passes, "organizer stopped");
    }
}
