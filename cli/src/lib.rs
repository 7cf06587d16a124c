//! `navgroup`: manage sidebar folder rules and try them against a simulated
//! host sidebar.

mod groups_cmd;
mod items_cmd;
pub mod logging;
mod preview_cmd;
mod set_cmd;
mod watch_cmd;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use navgroup_config::ChangeImpact;
use navgroup_config::JsonFileStore;
use navgroup_config::Settings;
use navgroup_config::SettingsEdit;
use navgroup_config::SettingsStore;
use navgroup_config::find_navgroup_home;
use navgroup_dom::layout::Layout;
use std::path::Path;
use std::path::PathBuf;

pub use groups_cmd::GroupsCli;
pub use items_cmd::ItemsCli;
pub use preview_cmd::PreviewArgs;
pub use set_cmd::SetArgs;
pub use watch_cmd::WatchArgs;

#[derive(Debug, Parser)]
#[command(name = "navgroup", version, about = "Group a settings sidebar into folders")]
pub struct Cli {
    /// Also write logs to a daily-rotated file in this directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Group a sidebar described by a layout file once and print it.
    Preview(PreviewArgs),

    /// Manage folder rules.
    Groups(GroupsCli),

    /// Manage the item list of one folder.
    Items(ItemsCli),

    /// Toggle a display option.
    Set(SetArgs),

    /// Keep a simulated sidebar grouped while replaying scripted host changes.
    Watch(WatchArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Preview(args) => preview_cmd::run(args),
        Command::Groups(groups) => groups_cmd::run(groups),
        Command::Items(items) => items_cmd::run(items),
        Command::Set(args) => set_cmd::run(args),
        Command::Watch(args) => watch_cmd::run(args).await,
    }
}

/// Settings file in `$NAVGROUP_HOME` (or `~/.navgroup`).
pub(crate) fn open_store() -> Result<JsonFileStore> {
    let home = find_navgroup_home().context("failed to resolve the navgroup home directory")?;
    Ok(JsonFileStore::in_home(&home))
}

/// Unlike the engine, commands that rewrite the file refuse to start from
/// defaults when the existing file is unreadable.
pub(crate) fn load_for_edit(store: &JsonFileStore) -> Result<Settings> {
    let settings = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    Ok(settings.unwrap_or_default())
}

/// Builds an edit against the stored settings, applies it and saves the result
/// if anything changed.
pub(crate) fn edit_settings(
    build: impl FnOnce(&Settings) -> Result<SettingsEdit>,
) -> Result<(Settings, ChangeImpact)> {
    let store = open_store()?;
    let mut settings = load_for_edit(&store)?;
    let edit = build(&settings)?;
    let impact = edit.apply(&mut settings)?;
    if impact != ChangeImpact::Unchanged {
        store
            .save(&settings)
            .with_context(|| format!("failed to write {}", store.path().display()))?;
    }
    Ok((settings, impact))
}

pub(crate) fn group_index(settings: &Settings, title: &str) -> Result<usize> {
    match settings.group_index(title) {
        Some(index) => Ok(index),
        None => bail!("No group named '{title}' found."),
    }
}

pub(crate) fn read_layout(path: &Path) -> Result<Layout> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    Layout::from_toml_str(&raw).with_context(|| format!("invalid layout {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for navgroup_config::Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::Up => navgroup_config::Direction::Up,
            DirectionArg::Down => navgroup_config::Direction::Down,
        }
    }
}
