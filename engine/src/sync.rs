use crate::classes;
use crate::grouping::GroupKind;
use crate::grouping::GroupingPlan;
use navgroup_config::Settings;
use navgroup_dom::Dom;
use navgroup_dom::ElementSpec;
use navgroup_dom::NodeId;
use navgroup_dom::Result;
use navgroup_dom::host;
use std::collections::HashMap;
use tracing::debug;

/// What a proxy forwards to. Only the label is trusted; `original` is the node
/// the proxy was built from and is used when no live item carries the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyBinding {
    pub backing_label: String,
    pub original: NodeId,
    /// Item list the proxy was built in; the live lookup searches it.
    pub container: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyActivation {
    /// A live item with the backing label was clicked.
    Forwarded(NodeId),
    /// No live match; the node seen when the proxy was built was clicked.
    Fallback(NodeId),
    Missing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedPlan {
    pub folders: usize,
    pub proxies: usize,
    pub hidden: usize,
}

/// Owns the folders and proxies the engine has put into the document.
#[derive(Debug, Default)]
pub struct PresentationSync {
    folders: Vec<(NodeId, String)>,
    bindings: HashMap<NodeId, ProxyBinding>,
}

impl PresentationSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every folder (and with it every proxy) and un-hides every item.
    pub fn clear<D: Dom>(&mut self, dom: &mut D) {
        for (folder, _) in self.folders.drain(..) {
            dom.discard(folder);
        }
        let root = dom.root();
        for folder in dom.query_all(root, classes::FOLDER) {
            dom.discard(folder);
        }
        for item in dom.query_all(root, classes::HIDDEN) {
            dom.set_class(item, classes::HIDDEN, false);
        }
        self.bindings.clear();
    }

    pub fn apply<D: Dom>(
        &mut self,
        dom: &mut D,
        plan: &GroupingPlan,
        settings: &Settings,
    ) -> Result<AppliedPlan> {
        for &item in &plan.hidden {
            dom.set_class(item, classes::HIDDEN, true);
        }

        // The anchor may have moved since the snapshot; append if so.
        let anchor = plan
            .anchor
            .filter(|anchor| dom.parent(*anchor) == Some(plan.container));

        let mut applied = AppliedPlan {
            hidden: plan.hidden.len(),
            ..AppliedPlan::default()
        };
        for group in &plan.groups {
            let mut spec = ElementSpec::new("details").class(classes::FOLDER);
            if group.kind == GroupKind::Ungrouped {
                spec = spec.class(classes::SPECIAL);
            }
            let folder = dom.create_element(spec);
            dom.set_open(folder, settings.is_group_expanded(&group.title));
            let summary = dom.create_element(
                ElementSpec::new("summary")
                    .class(classes::SUMMARY)
                    .text(group.header.clone()),
            );
            dom.append_child(folder, summary)?;

            for proxy in &group.proxies {
                let mut spec = ElementSpec::new("div")
                    .class(classes::PROXY)
                    .text(proxy.label.clone())
                    .attribute(classes::BACKING_LABEL_ATTR, proxy.backing_label.clone());
                if proxy.active {
                    spec = spec.class(host::ACTIVE);
                }
                let node = dom.create_element(spec);
                dom.append_child(folder, node)?;
                self.bindings.insert(
                    node,
                    ProxyBinding {
                        backing_label: proxy.backing_label.clone(),
                        original: proxy.source,
                        container: plan.container,
                    },
                );
                applied.proxies += 1;
            }

            dom.insert_before(plan.container, folder, anchor)?;
            self.folders.push((folder, group.title.clone()));
            applied.folders += 1;
        }
        debug!(
            folders = applied.folders,
            proxies = applied.proxies,
            hidden = applied.hidden,
            "applied grouping"
        );
        Ok(applied)
    }

    pub fn binding(&self, proxy: NodeId) -> Option<&ProxyBinding> {
        self.bindings.get(&proxy)
    }

    /// Collapse key of a folder the engine created.
    pub fn title_of(&self, folder: NodeId) -> Option<&str> {
        self.folders
            .iter()
            .find(|(node, _)| *node == folder)
            .map(|(_, title)| title.as_str())
    }

    pub fn folders(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.folders
            .iter()
            .map(|(node, title)| (*node, title.as_str()))
    }

    /// Highlights `proxy` and clicks the item behind it. `None` when `proxy`
    /// is not one of ours.
    pub fn activate_proxy<D: Dom>(&self, dom: &mut D, proxy: NodeId) -> Option<ProxyActivation> {
        let binding = self.bindings.get(&proxy)?;

        let scope = dom
            .parent(proxy)
            .and_then(|folder| dom.parent(folder))
            .unwrap_or_else(|| dom.root());
        for other in dom.query_all(scope, classes::PROXY) {
            if other != proxy {
                dom.set_class(other, host::ACTIVE, false);
            }
        }
        dom.set_class(proxy, host::ACTIVE, true);

        // The host may have replaced the item since this pass; go by label.
        // With duplicate labels the last item wins.
        let lookup = if dom.is_connected(binding.container) {
            binding.container
        } else {
            dom.root()
        };
        let fresh = dom
            .query_all(lookup, host::NAV_ITEM)
            .into_iter()
            .rev()
            .find(|item| {
                !dom.has_class(*item, classes::PROXY)
                    && dom.label(*item) == binding.backing_label
            });
        let activation = match fresh {
            Some(item) => {
                dom.click(item);
                ProxyActivation::Forwarded(item)
            }
            None if dom.contains(binding.original) => {
                dom.click(binding.original);
                ProxyActivation::Fallback(binding.original)
            }
            None => ProxyActivation::Missing,
        };
        debug!(label = %binding.backing_label, ?activation, "proxy activated");
        Some(activation)
    }

    pub fn teardown<D: Dom>(&mut self, dom: &mut D) {
        self.clear(dom);
    }
}
