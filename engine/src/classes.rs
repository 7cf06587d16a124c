//! Classes and attributes on nodes the engine creates or marks.

pub const FOLDER: &str = "navgroup-folder";
/// Extra class on the Ungrouped folder.
pub const SPECIAL: &str = "navgroup-special";
pub const SUMMARY: &str = "navgroup-summary";
pub const PROXY: &str = "navgroup-proxy";
/// Host items replaced by a proxy (or dropped when ungrouped items are hidden).
pub const HIDDEN: &str = "navgroup-hidden";
/// Host entry points moved into a section header by compact mode.
pub const HIDE_NAV: &str = "navgroup-hide-nav";
pub const SECTION_BUTTON: &str = "navgroup-section-btn";

pub const BACKING_LABEL_ATTR: &str = "data-backing-label";
pub const ARIA_LABEL_ATTR: &str = "aria-label";
