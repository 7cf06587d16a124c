//! Derives the grouped sidebar from the host's items and the user's rules.
//!
//! [`plan`] is a pure function: the same items, rules and flags always give the
//! same plan, no matter what earlier passes produced. Reading the items off the
//! document ([`snapshot_items`]) is kept separate so the planning step can be
//! exercised without a document.

use navgroup_config::GroupRule;
use navgroup_config::UNGROUPED_TITLE;
use navgroup_dom::Dom;
use navgroup_dom::NodeId;
use navgroup_dom::host;

/// One host nav item as seen at the start of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItemSnapshot {
    pub node: NodeId,
    pub parent: Option<NodeId>,
    pub label: String,
    pub active: bool,
}

/// Host nav items under `scope`, in document order.
pub fn snapshot_items<D: Dom>(dom: &D, scope: NodeId) -> Vec<NavItemSnapshot> {
    dom.query_all(scope, host::NAV_ITEM)
        .into_iter()
        .map(|node| NavItemSnapshot {
            node,
            parent: dom.parent(node),
            label: dom.label(node),
            active: dom.has_class(node, host::ACTIVE),
        })
        .collect()
}

/// Names of installed plugins. Labels in the sidebar may decorate a plugin
/// name, so recognition is by substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownPlugins {
    names: Vec<String>,
}

impl KnownPlugins {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `label` names a plugin closely enough to locate the plugin list.
    pub fn names_plugin(&self, label: &str) -> bool {
        self.names
            .iter()
            .any(|name| label == name || label.contains(name.as_str()))
    }

    /// Whether an item under the plugin list should be grouped at all.
    pub fn recognizes(&self, label: &str) -> bool {
        !label.is_empty()
            && self
                .names
                .iter()
                .any(|name| label.contains(name.as_str()) || name.contains(label))
    }
}

/// The list holding plugin items: parent of the first item naming a plugin.
pub fn find_target_container(items: &[NavItemSnapshot], known: &KnownPlugins) -> Option<NodeId> {
    items
        .iter()
        .find(|item| known.names_plugin(&item.label))
        .and_then(|item| item.parent)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Configured,
    Ungrouped,
}

/// Stand-in entry shown inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub label: String,
    pub backing_label: String,
    /// The host node the item was read from in this pass.
    pub source: NodeId,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGroup {
    /// Collapse key.
    pub title: String,
    /// Text shown in the folder summary.
    pub header: String,
    pub kind: GroupKind,
    pub proxies: Vec<Proxy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingPlan {
    pub container: NodeId,
    /// Folders go right before this node, the first recognized item.
    pub anchor: Option<NodeId>,
    pub groups: Vec<PlannedGroup>,
    pub hidden: Vec<NodeId>,
}

impl GroupingPlan {
    pub fn proxy_count(&self) -> usize {
        self.groups.iter().map(|group| group.proxies.len()).sum()
    }
}

pub fn plan(
    container: NodeId,
    candidates: &[NavItemSnapshot],
    rules: &[GroupRule],
    show_ungrouped: bool,
    known: &KnownPlugins,
) -> GroupingPlan {
    let mut buckets: Vec<Vec<Proxy>> = vec![Vec::new(); rules.len()];
    let mut ungrouped = Vec::new();
    let mut hidden = Vec::new();
    let mut anchor = None;

    for item in candidates {
        if !known.recognizes(&item.label) {
            continue;
        }
        anchor.get_or_insert(item.node);
        hidden.push(item.node);

        match rules.iter().position(|rule| rule.matches(&item.label)) {
            Some(idx) => {
                let label = rules[idx]
                    .alias_for(&item.label)
                    .unwrap_or(item.label.as_str())
                    .to_string();
                buckets[idx].push(Proxy {
                    label,
                    backing_label: item.label.clone(),
                    source: item.node,
                    active: item.active,
                });
            }
            None if show_ungrouped => ungrouped.push(Proxy {
                label: item.label.clone(),
                backing_label: item.label.clone(),
                source: item.node,
                active: item.active,
            }),
            None => {}
        }
    }

    let mut groups: Vec<PlannedGroup> = rules
        .iter()
        .zip(buckets)
        .filter(|(_, proxies)| !proxies.is_empty())
        .map(|(rule, mut proxies)| {
            // Stable: unconfigured items keep discovery order after the rest.
            proxies.sort_by_key(|proxy| {
                rule.position_of(&proxy.backing_label).unwrap_or(usize::MAX)
            });
            PlannedGroup {
                title: rule.title.clone(),
                header: rule.title.clone(),
                kind: GroupKind::Configured,
                proxies,
            }
        })
        .collect();

    if !ungrouped.is_empty() {
        groups.push(PlannedGroup {
            title: UNGROUPED_TITLE.to_string(),
            header: format!("{UNGROUPED_TITLE} ({})", ungrouped.len()),
            kind: GroupKind::Ungrouped,
            proxies: ungrouped,
        });
    }

    GroupingPlan {
        container,
        anchor,
        groups,
        hidden,
    }
}
