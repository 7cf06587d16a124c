use crate::DirectionArg;
use crate::edit_settings;
use crate::group_index;
use crate::load_for_edit;
use crate::open_store;
use anyhow::Result;
use navgroup_config::ChangeImpact;
use navgroup_config::GroupRule;
use navgroup_config::SettingsEdit;

/// Folder rules, in the order they are matched and shown.
///
/// Subcommands:
/// - `list`: show rules (with `--json`)
/// - `add`: append a rule
/// - `remove`: delete a rule and its collapse state
/// - `move`: swap a rule with its neighbour
/// - `rename`: retitle a rule, keeping its collapse state
/// - `keywords`: replace a rule's comma-separated keywords
#[derive(Debug, clap::Parser)]
pub struct GroupsCli {
    #[command(subcommand)]
    pub subcommand: GroupsSubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum GroupsSubcommand {
    List(ListArgs),
    Add(AddArgs),
    Remove(RemoveArgs),
    Move(MoveArgs),
    Rename(RenameArgs),
    Keywords(KeywordsArgs),
}

#[derive(Debug, clap::Parser)]
pub struct ListArgs {
    /// Output the rules as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Parser)]
pub struct AddArgs {
    /// Title for the folder. Defaults to the first free "New Folder" name.
    pub title: Option<String>,

    /// Comma-separated keywords matched against item labels.
    #[arg(long)]
    pub keywords: Option<String>,
}

#[derive(Debug, clap::Parser)]
pub struct RemoveArgs {
    pub title: String,
}

#[derive(Debug, clap::Parser)]
pub struct MoveArgs {
    pub title: String,

    #[arg(value_enum)]
    pub direction: DirectionArg,
}

#[derive(Debug, clap::Parser)]
pub struct RenameArgs {
    pub title: String,

    pub new_title: String,
}

#[derive(Debug, clap::Parser)]
pub struct KeywordsArgs {
    pub title: String,

    /// Comma-separated keywords, e.g. "cal, task".
    pub keywords: String,
}

pub fn run(cli: GroupsCli) -> Result<()> {
    match cli.subcommand {
        GroupsSubcommand::List(args) => run_list(args),
        GroupsSubcommand::Add(args) => run_add(args),
        GroupsSubcommand::Remove(args) => run_remove(args),
        GroupsSubcommand::Move(args) => run_move(args),
        GroupsSubcommand::Rename(args) => run_rename(args),
        GroupsSubcommand::Keywords(args) => run_keywords(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let settings = load_for_edit(&open_store()?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settings.groups)?);
        return Ok(());
    }

    if settings.groups.is_empty() {
        println!("No groups configured yet. Try `navgroup groups add Tools --keywords tool`.");
        return Ok(());
    }

    let rows: Vec<[String; 3]> = settings
        .groups
        .iter()
        .map(|group| [group.title.clone(), group.keywords.clone(), items_display(group)])
        .collect();
    let mut widths = ["Title".len(), "Keywords".len(), "Items".len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    println!(
        "{:<title_w$}  {:<keywords_w$}  Items",
        "Title",
        "Keywords",
        title_w = widths[0],
        keywords_w = widths[1],
    );
    for [title, keywords, items] in rows {
        let line = format!(
            "{title:<title_w$}  {keywords:<keywords_w$}  {items}",
            title_w = widths[0],
            keywords_w = widths[1],
        );
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn items_display(group: &GroupRule) -> String {
    if group.items.is_empty() {
        return "-".to_string();
    }
    group
        .items
        .iter()
        .map(|item| match item.alias.as_deref() {
            Some(alias) => format!("{} ({alias})", item.name),
            None => item.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_add(args: AddArgs) -> Result<()> {
    let AddArgs { title, keywords } = args;
    let (settings, _) = edit_settings(|_| Ok(SettingsEdit::AddGroup { title }))?;
    let index = settings.groups.len().saturating_sub(1);
    let title = settings
        .groups
        .get(index)
        .map(|group| group.title.clone())
        .unwrap_or_default();

    if let Some(keywords) = keywords {
        edit_settings(|_| Ok(SettingsEdit::SetKeywords { index, keywords }))?;
    }

    println!("Added group '{title}'.");
    Ok(())
}

fn run_remove(args: RemoveArgs) -> Result<()> {
    let title = args.title;
    edit_settings(|settings| {
        Ok(SettingsEdit::RemoveGroup {
            index: group_index(settings, &title)?,
        })
    })?;
    println!("Removed group '{title}'.");
    Ok(())
}

fn run_move(args: MoveArgs) -> Result<()> {
    let MoveArgs { title, direction } = args;
    let (_, impact) = edit_settings(|settings| {
        Ok(SettingsEdit::MoveGroup {
            index: group_index(settings, &title)?,
            direction: direction.into(),
        })
    })?;
    match (impact, direction) {
        (ChangeImpact::Unchanged, DirectionArg::Up) => {
            println!("Group '{title}' is already first.");
        }
        (ChangeImpact::Unchanged, DirectionArg::Down) => {
            println!("Group '{title}' is already last.");
        }
        (_, DirectionArg::Up) => println!("Moved group '{title}' up."),
        (_, DirectionArg::Down) => println!("Moved group '{title}' down."),
    }
    Ok(())
}

fn run_rename(args: RenameArgs) -> Result<()> {
    let RenameArgs { title, new_title } = args;
    let new_title_for_edit = new_title.clone();
    edit_settings(|settings| {
        Ok(SettingsEdit::RenameGroup {
            index: group_index(settings, &title)?,
            title: new_title_for_edit,
        })
    })?;
    println!("Renamed group '{title}' to '{new_title}'.");
    Ok(())
}

fn run_keywords(args: KeywordsArgs) -> Result<()> {
    let KeywordsArgs { title, keywords } = args;
    edit_settings(|settings| {
        Ok(SettingsEdit::SetKeywords {
            index: group_index(settings, &title)?,
            keywords,
        })
    })?;
    println!("Updated keywords for '{title}'.");
    Ok(())
}
