//! What the sidebar looks like to the user right now.

use crate::classes;
use navgroup_dom::Dom;
use navgroup_dom::NodeId;
use navgroup_dom::host;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSnapshot {
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSnapshot {
    pub title: String,
    pub collapsed: bool,
    pub has_button: bool,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Item {
        label: String,
        active: bool,
    },
    Group {
        header: String,
        open: bool,
        items: Vec<ProxySnapshot>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxySnapshot {
    pub label: String,
    pub active: bool,
}

fn is_visible_item<D: Dom>(dom: &D, node: NodeId) -> bool {
    dom.has_class(node, host::NAV_ITEM)
        && !dom.has_class(node, classes::HIDDEN)
        && !dom.has_class(node, classes::HIDE_NAV)
}

impl SidebarSnapshot {
    pub fn capture<D: Dom>(dom: &D) -> Self {
        let sections = dom
            .query_all(dom.root(), host::GROUP)
            .into_iter()
            .filter_map(|group| {
                let header = dom.query_first(group, host::GROUP_TITLE)?;
                let items = dom.query_first(group, host::GROUP_ITEMS)?;
                Some(SectionSnapshot {
                    title: dom.label(header),
                    collapsed: dom.has_class(items, host::COLLAPSED),
                    has_button: dom.query_first(header, classes::SECTION_BUTTON).is_some(),
                    entries: capture_entries(dom, items),
                })
            })
            .collect();
        Self { sections }
    }

    pub fn section(&self, title: &str) -> Option<&SectionSnapshot> {
        self.sections.iter().find(|section| section.title == title)
    }
}

fn capture_entries<D: Dom>(dom: &D, items: NodeId) -> Vec<Entry> {
    let mut entries = Vec::new();
    for child in dom.children(items) {
        if dom.has_class(child, classes::FOLDER) {
            let header = dom
                .query_first(child, classes::SUMMARY)
                .map(|summary| dom.label(summary))
                .unwrap_or_default();
            let items = dom
                .children(child)
                .into_iter()
                .filter(|node| dom.has_class(*node, classes::PROXY))
                .map(|proxy| ProxySnapshot {
                    label: dom.label(proxy),
                    active: dom.has_class(proxy, host::ACTIVE),
                })
                .collect();
            entries.push(Entry::Group {
                header,
                open: dom.is_open(child),
                items,
            });
        } else if is_visible_item(dom, child) {
            entries.push(Entry::Item {
                label: dom.label(child),
                active: dom.has_class(child, host::ACTIVE),
            });
        }
    }
    entries
}

impl fmt::Display for SidebarSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            let marker = if section.collapsed { '>' } else { 'v' };
            write!(f, "{marker} {}", section.title)?;
            if section.has_button {
                write!(f, " [manage]")?;
            }
            writeln!(f)?;
            if section.collapsed {
                continue;
            }
            for entry in &section.entries {
                match entry {
                    Entry::Item { label, active } => {
                        writeln!(f, "    {label}{}", active_mark(*active))?;
                    }
                    Entry::Group {
                        header,
                        open,
                        items,
                    } => {
                        let toggle = if *open { "[-]" } else { "[+]" };
                        writeln!(f, "  {toggle} {header}")?;
                        if !open {
                            continue;
                        }
                        for proxy in items {
                            writeln!(f, "      {}{}", proxy.label, active_mark(proxy.active))?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn active_mark(active: bool) -> &'static str {
    if active { " *" } else { "" }
}

/// Resolves what a user would click given visible text: a proxy, a folder
/// summary (with or without its count), a section header, then a visible
/// host item.
pub fn find_by_label<D: Dom>(dom: &D, label: &str) -> Option<NodeId> {
    let root = dom.root();
    let by_text = |class: &str| {
        dom.query_all(root, class)
            .into_iter()
            .find(|node| dom.label(*node) == label)
    };
    by_text(classes::PROXY)
        .or_else(|| {
            dom.query_all(root, classes::SUMMARY)
                .into_iter()
                .find(|summary| {
                    let text = dom.label(*summary);
                    text == label
                        || text
                            .strip_prefix(label)
                            .is_some_and(|rest| rest.starts_with(" ("))
                })
        })
        .or_else(|| by_text(host::GROUP_TITLE))
        .or_else(|| {
            dom.query_all(root, host::NAV_ITEM)
                .into_iter()
                .find(|item| is_visible_item(dom, *item) && dom.label(*item) == label)
        })
}
