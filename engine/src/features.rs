//! Section collapse memory and compact header buttons.
//!
//! Both work on the host's section headers by label and share the recheck
//! cadence with grouping, but never touch folders or proxies.

use crate::classes;
use navgroup_config::COMPACT_SECTIONS;
use navgroup_config::Settings;
use navgroup_dom::Dom;
use navgroup_dom::ElementSpec;
use navgroup_dom::NodeId;
use navgroup_dom::Result;
use navgroup_dom::host;
use tracing::debug;

fn section_items<D: Dom>(dom: &D, header: NodeId) -> Option<NodeId> {
    let group = dom.parent(header)?;
    dom.query_first(group, host::GROUP_ITEMS)
}

fn headers<D: Dom>(dom: &D) -> Vec<NodeId> {
    dom.query_all(dom.root(), host::GROUP_TITLE)
}

/// Collapses every header remembered in the settings. Returns how many were
/// collapsed.
pub fn restore_section_states<D: Dom>(dom: &mut D, settings: &Settings) -> usize {
    if !settings.collapsible_headers {
        return 0;
    }
    let mut restored = 0;
    for header in headers(dom) {
        if !settings.is_section_collapsed(&dom.label(header)) {
            continue;
        }
        dom.set_class(header, host::COLLAPSED, true);
        if let Some(items) = section_items(dom, header) {
            dom.set_class(items, host::COLLAPSED, true);
        }
        restored += 1;
    }
    restored
}

/// Re-applies the remembered collapse when the host re-rendered the headers.
/// The first remembered header stands in for all of them.
pub fn restore_on_recheck<D: Dom>(dom: &mut D, settings: &Settings) -> bool {
    if !settings.collapsible_headers {
        return false;
    }
    let Some(first) = settings.collapsed_sections.first() else {
        return false;
    };
    let needs_restore = headers(dom)
        .into_iter()
        .find(|header| dom.label(*header) == *first)
        .is_some_and(|header| !dom.has_class(header, host::COLLAPSED));
    if needs_restore {
        restore_section_states(dom, settings);
    }
    needs_restore
}

/// Flips a section open or closed and records it. Returns the new collapsed
/// state, or `None` when the header has no item list.
pub fn toggle_section<D: Dom>(
    dom: &mut D,
    header: NodeId,
    settings: &mut Settings,
) -> Option<bool> {
    let items = section_items(dom, header)?;
    let collapsed = !dom.has_class(items, host::COLLAPSED);
    dom.set_class(items, host::COLLAPSED, collapsed);
    dom.set_class(header, host::COLLAPSED, collapsed);
    settings.set_section_collapsed(&dom.label(header), collapsed);
    Some(collapsed)
}

pub fn clear_section_collapse<D: Dom>(dom: &mut D) -> usize {
    let collapsed = dom.query_all(dom.root(), host::COLLAPSED);
    for node in &collapsed {
        dom.set_class(*node, host::COLLAPSED, false);
    }
    collapsed.len()
}

fn is_compact_section(label: &str) -> bool {
    COMPACT_SECTIONS.contains(&label)
}

/// Hides the reserved entry points and gives their headers a button, or undoes
/// both when compact mode is off. Returns the number of buttons added.
pub fn apply_compact_mode<D: Dom>(dom: &mut D, settings: &Settings) -> Result<usize> {
    let root = dom.root();
    let entry_points: Vec<NodeId> = dom
        .query_all(root, host::NAV_ITEM)
        .into_iter()
        .filter(|item| is_compact_section(&dom.label(*item)))
        .collect();

    if !settings.compact_mode {
        for item in entry_points {
            dom.set_class(item, classes::HIDE_NAV, false);
        }
        remove_section_buttons(dom);
        return Ok(0);
    }

    for item in entry_points {
        dom.set_class(item, classes::HIDE_NAV, true);
    }
    let mut added = 0;
    for header in headers(dom) {
        let label = dom.label(header);
        let has_button = dom.query_first(header, classes::SECTION_BUTTON).is_some();
        if !is_compact_section(&label) || has_button {
            continue;
        }
        let button = dom.create_element(
            ElementSpec::new("div")
                .class(classes::SECTION_BUTTON)
                .attribute(classes::ARIA_LABEL_ATTR, format!("Manage {label}")),
        );
        dom.append_child(header, button)?;
        added += 1;
    }
    if added > 0 {
        debug!(added, "compact buttons added");
    }
    Ok(added)
}

fn remove_section_buttons<D: Dom>(dom: &mut D) {
    for button in dom.query_all(dom.root(), classes::SECTION_BUTTON) {
        dom.remove(button);
    }
}

/// Clicks the hidden entry point a header button stands for.
pub fn activate_section_button<D: Dom>(dom: &mut D, button: NodeId) -> Option<NodeId> {
    let header = dom.closest(button, host::GROUP_TITLE)?;
    let name = dom.label(header);
    let target = dom
        .query_all(dom.root(), host::NAV_ITEM)
        .into_iter()
        .find(|item| dom.label(*item) == name)?;
    dom.click(target);
    Some(target)
}

/// The button compact mode put into the header labelled `section`.
pub fn find_section_button<D: Dom>(dom: &D, section: &str) -> Option<NodeId> {
    headers(dom)
        .into_iter()
        .filter(|header| dom.label(*header) == section)
        .find_map(|header| dom.query_first(header, classes::SECTION_BUTTON))
}

/// Removes everything the features added to the host's own nodes.
pub fn revert<D: Dom>(dom: &mut D) {
    clear_section_collapse(dom);
    for item in dom.query_all(dom.root(), classes::HIDE_NAV) {
        dom.set_class(item, classes::HIDE_NAV, false);
    }
    remove_section_buttons(dom);
}
