//! User configuration for the sidebar organizer: group rules, collapse memory
//! and the store they persist to.

pub mod edit;
mod error;
mod settings;
mod store;

pub use edit::ChangeImpact;
pub use edit::Direction;
pub use edit::SettingsEdit;
pub use error::ConfigError;
pub use error::Result;
pub use settings::COMPACT_SECTIONS;
pub use settings::GroupRule;
pub use settings::ItemConfig;
pub use settings::Settings;
pub use settings::UNGROUPED_TITLE;
pub use store::JsonFileStore;
pub use store::MemoryStore;
pub use store::SETTINGS_FILENAME;
pub use store::SettingsStore;
pub use store::find_navgroup_home;
pub use store::load_settings;
