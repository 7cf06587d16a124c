//! Class names the host uses for its settings sidebar.

/// Wrapper around every section of the sidebar.
pub const SIDEBAR: &str = "vertical-tab-header";
pub const GROUP: &str = "vertical-tab-header-group";
pub const GROUP_TITLE: &str = "vertical-tab-header-group-title";
pub const GROUP_ITEMS: &str = "vertical-tab-header-group-items";
pub const NAV_ITEM: &str = "vertical-tab-nav-item";
pub const ACTIVE: &str = "is-active";
pub const COLLAPSED: &str = "is-collapsed";
