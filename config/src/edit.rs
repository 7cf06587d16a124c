//! Mutations the settings collaborator performs on [`Settings`].
//!
//! Every edit reports how far its effect reaches so the caller knows whether
//! to persist only or to persist and regroup.

use crate::error::ConfigError;
use crate::error::Result;
use crate::settings::GroupRule;
use crate::settings::ItemConfig;
use crate::settings::Settings;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_GROUP_TITLE: &str = "New Folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeImpact {
    /// Nothing changed; no need to save.
    Unchanged,
    /// Cosmetic state only (collapse memory).
    PersistOnly,
    /// Grouping inputs changed; the sidebar must be rebuilt.
    Resync,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingsEdit {
    /// Appends a group with empty keywords. Without a title the first free
    /// `New Folder`, `New Folder 2`, ... is used.
    AddGroup {
        title: Option<String>,
    },
    RemoveGroup {
        index: usize,
    },
    MoveGroup {
        index: usize,
        direction: Direction,
    },
    /// Renames a group and carries its collapse state over to the new title.
    RenameGroup {
        index: usize,
        title: String,
    },
    SetKeywords {
        index: usize,
        keywords: String,
    },
    /// Sets or clears an item's alias, adding the item to the group's list
    /// when it is not configured yet.
    SetItemAlias {
        index: usize,
        name: String,
        alias: Option<String>,
    },
    MoveItem {
        index: usize,
        item: usize,
        direction: Direction,
    },
    /// Drops configured items that no installed plugin matches anymore and
    /// appends newly matching plugins after the configured ones.
    ReconcileItems {
        index: usize,
        installed: Vec<String>,
    },
    /// Sorts the group's items by name and clears every alias.
    ResetItems {
        index: usize,
    },
    ReplaceItems {
        index: usize,
        items: Vec<ItemConfig>,
    },
    SetShowUngrouped {
        enabled: bool,
    },
    SetCollapsibleHeaders {
        enabled: bool,
    },
    SetCompactMode {
        enabled: bool,
    },
    SetGroupExpanded {
        title: String,
        expanded: bool,
    },
    SetSectionCollapsed {
        label: String,
        collapsed: bool,
    },
}

impl SettingsEdit {
    pub fn apply(self, settings: &mut Settings) -> Result<ChangeImpact> {
        let impact = match self {
            SettingsEdit::AddGroup { title } => {
                let title = match title {
                    Some(title) => {
                        validate_title(settings, &title, None)?;
                        title
                    }
                    None => next_default_title(settings),
                };
                debug!(%title, "adding group");
                settings.groups.push(GroupRule::new(title, ""));
                ChangeImpact::Resync
            }
            SettingsEdit::RemoveGroup { index } => {
                group_mut(settings, index)?;
                let removed = settings.groups.remove(index);
                settings.collapsed_groups.remove(&removed.title);
                ChangeImpact::Resync
            }
            SettingsEdit::MoveGroup { index, direction } => {
                group_mut(settings, index)?;
                if swap_neighbor(&mut settings.groups, index, direction) {
                    ChangeImpact::Resync
                } else {
                    ChangeImpact::Unchanged
                }
            }
            SettingsEdit::RenameGroup { index, title } => {
                let current = group_mut(settings, index)?.title.clone();
                if current == title {
                    return Ok(ChangeImpact::Unchanged);
                }
                validate_title(settings, &title, Some(index))?;
                if let Some(expanded) = settings.collapsed_groups.remove(&current) {
                    settings.collapsed_groups.insert(title.clone(), expanded);
                }
                group_mut(settings, index)?.title = title;
                ChangeImpact::Resync
            }
            SettingsEdit::SetKeywords { index, keywords } => {
                let group = group_mut(settings, index)?;
                if group.keywords == keywords {
                    ChangeImpact::Unchanged
                } else {
                    group.keywords = keywords;
                    ChangeImpact::Resync
                }
            }
            SettingsEdit::SetItemAlias { index, name, alias } => {
                let group = group_mut(settings, index)?;
                let alias = alias.filter(|alias| !alias.is_empty());
                match group.items.iter_mut().find(|item| item.name == name) {
                    Some(item) if item.alias == alias => ChangeImpact::Unchanged,
                    Some(item) => {
                        item.alias = alias;
                        ChangeImpact::Resync
                    }
                    None => {
                        group.items.push(ItemConfig { name, alias });
                        ChangeImpact::Resync
                    }
                }
            }
            SettingsEdit::MoveItem {
                index,
                item,
                direction,
            } => {
                let group = group_mut(settings, index)?;
                if item >= group.items.len() {
                    return Err(ConfigError::ItemNotFound {
                        title: group.title.clone(),
                        index: item,
                    });
                }
                if swap_neighbor(&mut group.items, item, direction) {
                    ChangeImpact::Resync
                } else {
                    ChangeImpact::Unchanged
                }
            }
            SettingsEdit::ReconcileItems { index, installed } => {
                let group = group_mut(settings, index)?;
                let items = reconciled_items(group, &installed);
                replace_items(group, items)
            }
            SettingsEdit::ResetItems { index } => {
                let group = group_mut(settings, index)?;
                let mut items: Vec<ItemConfig> = group
                    .items
                    .iter()
                    .map(|item| ItemConfig::new(item.name.clone()))
                    .collect();
                items.sort_by_cached_key(|item| (item.name.to_lowercase(), item.name.clone()));
                replace_items(group, items)
            }
            SettingsEdit::ReplaceItems { index, items } => {
                let group = group_mut(settings, index)?;
                replace_items(group, items)
            }
            SettingsEdit::SetShowUngrouped { enabled } => {
                toggle(&mut settings.show_ungrouped, enabled, ChangeImpact::Resync)
            }
            SettingsEdit::SetCollapsibleHeaders { enabled } => toggle(
                &mut settings.collapsible_headers,
                enabled,
                ChangeImpact::Resync,
            ),
            SettingsEdit::SetCompactMode { enabled } => {
                toggle(&mut settings.compact_mode, enabled, ChangeImpact::Resync)
            }
            SettingsEdit::SetGroupExpanded { title, expanded } => {
                if settings.set_group_expanded(&title, expanded) {
                    ChangeImpact::PersistOnly
                } else {
                    ChangeImpact::Unchanged
                }
            }
            SettingsEdit::SetSectionCollapsed { label, collapsed } => {
                if settings.set_section_collapsed(&label, collapsed) {
                    ChangeImpact::PersistOnly
                } else {
                    ChangeImpact::Unchanged
                }
            }
        };
        Ok(impact)
    }
}

/// The item list a group would have after reconciling with `installed`.
pub fn reconciled_items(group: &GroupRule, installed: &[String]) -> Vec<ItemConfig> {
    let matching: Vec<&String> = installed
        .iter()
        .filter(|name| group.matches(name))
        .collect();
    let mut items: Vec<ItemConfig> = group
        .items
        .iter()
        .filter(|item| matching.iter().any(|name| **name == item.name))
        .cloned()
        .collect();
    for name in matching {
        if !items.iter().any(|item| &item.name == name) {
            items.push(ItemConfig::new(name.clone()));
        }
    }
    items
}

fn group_mut(settings: &mut Settings, index: usize) -> Result<&mut GroupRule> {
    settings
        .groups
        .get_mut(index)
        .ok_or(ConfigError::GroupNotFound(index))
}

fn validate_title(settings: &Settings, title: &str, renaming: Option<usize>) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ConfigError::EmptyTitle);
    }
    let taken = settings
        .groups
        .iter()
        .enumerate()
        .any(|(idx, group)| Some(idx) != renaming && group.title == title);
    if taken {
        return Err(ConfigError::DuplicateTitle(title.to_string()));
    }
    Ok(())
}

fn next_default_title(settings: &Settings) -> String {
    let mut title = DEFAULT_GROUP_TITLE.to_string();
    let mut n = 2;
    while settings.group_index(&title).is_some() {
        title = format!("{DEFAULT_GROUP_TITLE} {n}");
        n += 1;
    }
    title
}

fn swap_neighbor<T>(items: &mut [T], index: usize, direction: Direction) -> bool {
    let other = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1).filter(|next| *next < items.len()),
    };
    match other {
        Some(other) => {
            items.swap(index, other);
            true
        }
        None => false,
    }
}

fn replace_items(group: &mut GroupRule, items: Vec<ItemConfig>) -> ChangeImpact {
    if group.items == items {
        ChangeImpact::Unchanged
    } else {
        group.items = items;
        ChangeImpact::Resync
    }
}

fn toggle(flag: &mut bool, enabled: bool, impact: ChangeImpact) -> ChangeImpact {
    if *flag == enabled {
        ChangeImpact::Unchanged
    } else {
        *flag = enabled;
        impact
    }
}
