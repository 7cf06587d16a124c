use crate::DirectionArg;
use crate::edit_settings;
use crate::group_index;
use crate::load_for_edit;
use crate::open_store;
use crate::read_layout;
use anyhow::Result;
use anyhow::bail;
use navgroup_config::ChangeImpact;
use navgroup_config::SettingsEdit;
use std::path::PathBuf;

/// The ordered item list of one folder. Items listed here lead the folder in
/// this order and may carry a display alias; other matching items follow in
/// sidebar order.
#[derive(Debug, clap::Parser)]
pub struct ItemsCli {
    #[command(subcommand)]
    pub subcommand: ItemsSubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum ItemsSubcommand {
    /// Show a folder's configured items.
    List(ListArgs),

    /// Set or clear the label shown for an item.
    Alias(AliasArgs),

    /// Swap an item with its neighbour.
    Move(MoveArgs),

    /// Sort items by name and drop every alias.
    Reset(GroupArg),

    /// Keep only items an installed plugin still matches and append new
    /// matches, using the plugins of a layout file.
    Sync(SyncArgs),
}

#[derive(Debug, clap::Parser)]
pub struct GroupArg {
    /// Title of the folder.
    pub group: String,
}

#[derive(Debug, clap::Parser)]
pub struct ListArgs {
    pub group: String,

    /// Output the items as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Parser)]
pub struct AliasArgs {
    pub group: String,

    /// Plugin name as the host shows it.
    pub name: String,

    /// New label. Omit to clear the alias.
    pub alias: Option<String>,
}

#[derive(Debug, clap::Parser)]
pub struct MoveArgs {
    pub group: String,

    pub name: String,

    #[arg(value_enum)]
    pub direction: DirectionArg,
}

#[derive(Debug, clap::Parser)]
pub struct SyncArgs {
    pub group: String,

    /// Layout file listing the installed plugins.
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,
}

pub fn run(cli: ItemsCli) -> Result<()> {
    match cli.subcommand {
        ItemsSubcommand::List(args) => run_list(args),
        ItemsSubcommand::Alias(args) => run_alias(args),
        ItemsSubcommand::Move(args) => run_move(args),
        ItemsSubcommand::Reset(args) => run_reset(args),
        ItemsSubcommand::Sync(args) => run_sync(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let settings = load_for_edit(&open_store()?)?;
    let index = group_index(&settings, &args.group)?;
    let items = &settings.groups[index].items;

    if args.json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No items configured for '{}'.", args.group);
        return Ok(());
    }
    for (position, item) in items.iter().enumerate() {
        match item.alias.as_deref() {
            Some(alias) => println!("{}. {} -> {alias}", position + 1, item.name),
            None => println!("{}. {}", position + 1, item.name),
        }
    }
    Ok(())
}

fn run_alias(args: AliasArgs) -> Result<()> {
    let AliasArgs { group, name, alias } = args;
    let cleared = alias.as_deref().is_none_or(str::is_empty);
    let item = name.clone();
    let (_, impact) = edit_settings(|settings| {
        Ok(SettingsEdit::SetItemAlias {
            index: group_index(settings, &group)?,
            name: item,
            alias,
        })
    })?;
    match (impact, cleared) {
        (ChangeImpact::Unchanged, _) => println!("No change for '{name}'."),
        (_, true) => println!("Cleared the alias of '{name}' in '{group}'."),
        (_, false) => println!("Updated the alias of '{name}' in '{group}'."),
    }
    Ok(())
}

fn run_move(args: MoveArgs) -> Result<()> {
    let MoveArgs {
        group,
        name,
        direction,
    } = args;
    let (_, impact) = edit_settings(|settings| {
        let index = group_index(settings, &group)?;
        let Some(item) = settings.groups[index].position_of(&name) else {
            bail!("'{name}' is not configured in '{group}'.");
        };
        Ok(SettingsEdit::MoveItem {
            index,
            item,
            direction: direction.into(),
        })
    })?;
    if impact == ChangeImpact::Unchanged {
        println!("'{name}' cannot move further.");
    } else {
        println!("Moved '{name}' in '{group}'.");
    }
    Ok(())
}

fn run_reset(args: GroupArg) -> Result<()> {
    let group = args.group;
    edit_settings(|settings| {
        Ok(SettingsEdit::ResetItems {
            index: group_index(settings, &group)?,
        })
    })?;
    println!("Reset the items of '{group}'.");
    Ok(())
}

fn run_sync(args: SyncArgs) -> Result<()> {
    let installed = read_layout(&args.layout)?.plugins;
    let group = args.group;
    let (settings, _) = edit_settings(|settings| {
        Ok(SettingsEdit::ReconcileItems {
            index: group_index(settings, &group)?,
            installed,
        })
    })?;
    let count = settings
        .group_index(&group)
        .and_then(|index| settings.group(index))
        .map(|rule| rule.items.len())
        .unwrap_or_default();
    println!("'{group}' now lists {count} item(s).");
    Ok(())
}
