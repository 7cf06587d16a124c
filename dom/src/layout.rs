//! Host-shaped sidebars described in TOML.
//!
//! ```toml
//! plugins = ["Calendar", "Dataview"]
//! active = "General"
//!
//! [[section]]
//! title = "Options"
//! items = ["General", "Community plugins"]
//!
//! [[section]]
//! title = "Community plugins"
//! items = ["Calendar", "Dataview"]
//! ```

use crate::dom::Dom;
use crate::error::DomError;
use crate::error::Result;
use crate::host;
use crate::node::ElementSpec;
use crate::node::NodeId;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Names of installed plugins, as the host's plugin registry reports them.
    pub plugins: Vec<String>,
    /// Label of the nav item that starts out selected.
    pub active: Option<String>,
    #[serde(rename = "section")]
    pub sections: Vec<SectionLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLayout {
    pub title: String,
    pub items: Vec<String>,
}

impl Layout {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Builds the sidebar under the document root and returns its wrapper.
    pub fn mount<D: Dom>(&self, dom: &mut D) -> Result<NodeId> {
        let sidebar = dom.create_element(ElementSpec::new("div").class(host::SIDEBAR));
        for section in &self.sections {
            let group = dom.create_element(ElementSpec::new("div").class(host::GROUP));
            let title = dom.create_element(
                ElementSpec::new("div")
                    .class(host::GROUP_TITLE)
                    .text(section.title.clone()),
            );
            let items = dom.create_element(ElementSpec::new("div").class(host::GROUP_ITEMS));
            dom.append_child(group, title)?;
            dom.append_child(group, items)?;
            for label in &section.items {
                let item = nav_item(dom, label, self.active.as_deref() == Some(label.as_str()));
                dom.append_child(items, item)?;
            }
            dom.append_child(sidebar, group)?;
        }
        let root = dom.root();
        dom.append_child(root, sidebar)?;
        debug!(sections = self.sections.len(), "mounted sidebar");
        Ok(sidebar)
    }
}

fn nav_item<D: Dom>(dom: &mut D, label: &str, active: bool) -> NodeId {
    let mut spec = ElementSpec::new("div").class(host::NAV_ITEM).text(label);
    if active {
        spec = spec.class(host::ACTIVE);
    }
    dom.create_element(spec)
}

/// Tears down every mounted sidebar, as closing the settings window does.
pub fn unmount<D: Dom>(dom: &mut D) -> usize {
    let root = dom.root();
    let sidebars = dom.query_all(root, host::SIDEBAR);
    for sidebar in &sidebars {
        dom.remove(*sidebar);
    }
    sidebars.len()
}

/// The item list of the section whose header reads `title`.
pub fn find_section_items<D: Dom>(dom: &D, title: &str) -> Option<NodeId> {
    dom.query_all(dom.root(), host::GROUP_TITLE)
        .into_iter()
        .filter(|header| dom.label(*header) == title)
        .find_map(|header| {
            let group = dom.parent(header)?;
            dom.query_first(group, host::GROUP_ITEMS)
        })
}

/// The first host nav item labelled `label`.
pub fn find_item<D: Dom>(dom: &D, label: &str) -> Option<NodeId> {
    dom.query_all(dom.root(), host::NAV_ITEM)
        .into_iter()
        .find(|item| dom.label(*item) == label)
}

pub fn add_item<D: Dom>(dom: &mut D, section: &str, label: &str) -> Result<NodeId> {
    let items = find_section_items(dom, section)
        .ok_or_else(|| DomError::SectionNotFound(section.to_string()))?;
    let item = nav_item(dom, label, false);
    dom.append_child(items, item)?;
    Ok(item)
}

/// Removes the first nav item labelled `label`. Returns whether one existed.
pub fn remove_item<D: Dom>(dom: &mut D, label: &str) -> bool {
    match find_item(dom, label) {
        Some(item) => {
            dom.remove(item);
            true
        }
        None => false,
    }
}

/// Replaces every nav item of a section with a fresh node carrying the same
/// label and active flag, the way the host re-renders a list. Returns the new
/// nodes in order.
pub fn rerender_section<D: Dom>(dom: &mut D, section: &str) -> Result<Vec<NodeId>> {
    let items = find_section_items(dom, section)
        .ok_or_else(|| DomError::SectionNotFound(section.to_string()))?;
    let old: Vec<NodeId> = dom
        .children(items)
        .into_iter()
        .filter(|child| dom.has_class(*child, host::NAV_ITEM))
        .collect();
    let mut fresh = Vec::with_capacity(old.len());
    for node in old {
        let label = dom.label(node);
        let active = dom.has_class(node, host::ACTIVE);
        dom.remove(node);
        let replacement = nav_item(dom, &label, active);
        dom.append_child(items, replacement)?;
        fresh.push(replacement);
    }
    debug!(section, replaced = fresh.len(), "re-rendered section");
    Ok(fresh)
}
