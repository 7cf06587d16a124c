use crate::edit_settings;
use anyhow::Result;
use navgroup_config::ChangeImpact;
use navgroup_config::SettingsEdit;

#[derive(Debug, clap::Parser)]
pub struct SetArgs {
    #[arg(value_enum)]
    pub option: DisplayOption,

    #[arg(value_enum)]
    pub value: Switch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayOption {
    /// Put plugins no rule matches into a trailing "Ungrouped" folder.
    ShowUngrouped,
    /// Let section headers collapse their lists on click.
    CollapsibleHeaders,
    /// Replace the "Core plugins" and "Community plugins" entries with header
    /// buttons.
    CompactMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl DisplayOption {
    fn name(self) -> &'static str {
        match self {
            DisplayOption::ShowUngrouped => "show-ungrouped",
            DisplayOption::CollapsibleHeaders => "collapsible-headers",
            DisplayOption::CompactMode => "compact-mode",
        }
    }

    fn edit(self, enabled: bool) -> SettingsEdit {
        match self {
            DisplayOption::ShowUngrouped => SettingsEdit::SetShowUngrouped { enabled },
            DisplayOption::CollapsibleHeaders => SettingsEdit::SetCollapsibleHeaders { enabled },
            DisplayOption::CompactMode => SettingsEdit::SetCompactMode { enabled },
        }
    }
}

pub fn run(args: SetArgs) -> Result<()> {
    let enabled = args.value == Switch::On;
    let state = if enabled { "on" } else { "off" };
    let name = args.option.name();
    let (_, impact) = edit_settings(|_| Ok(args.option.edit(enabled)))?;
    if impact == ChangeImpact::Unchanged {
        println!("{name} is already {state}.");
    } else {
        println!("{name} is now {state}.");
    }
    Ok(())
}
