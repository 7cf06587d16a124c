use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Collapse key and header of the container for items that match no rule.
pub const UNGROUPED_TITLE: &str = "Ungrouped";

/// Section headers compact mode moves into header buttons.
pub const COMPACT_SECTIONS: [&str; 2] = ["Core plugins", "Community plugins"];

/// Persisted plugin settings.
///
/// Unknown keys are ignored and missing ones take their default, so a blob
/// written by an older build loads as that blob merged over [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub show_ungrouped: bool,
    pub collapsible_headers: bool,
    pub compact_mode: bool,
    pub groups: Vec<GroupRule>,
    /// Labels of collapsed section headers, in the order they were collapsed.
    pub collapsed_sections: Vec<String>,
    /// Open state per group title. Absent means open.
    pub collapsed_groups: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_ungrouped: true,
            collapsible_headers: true,
            compact_mode: false,
            groups: Vec::new(),
            collapsed_sections: Vec::new(),
            collapsed_groups: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn group(&self, index: usize) -> Option<&GroupRule> {
        self.groups.get(index)
    }

    pub fn group_index(&self, title: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.title == title)
    }

    pub fn is_group_expanded(&self, title: &str) -> bool {
        self.collapsed_groups.get(title).copied().unwrap_or(true)
    }

    pub fn set_group_expanded(&mut self, title: &str, expanded: bool) -> bool {
        let previous = self.collapsed_groups.insert(title.to_string(), expanded);
        previous != Some(expanded)
    }

    pub fn is_section_collapsed(&self, label: &str) -> bool {
        self.collapsed_sections.iter().any(|section| section == label)
    }

    /// Returns whether the remembered set changed.
    pub fn set_section_collapsed(&mut self, label: &str, collapsed: bool) -> bool {
        let present = self.is_section_collapsed(label);
        match (collapsed, present) {
            (true, false) => {
                self.collapsed_sections.push(label.to_string());
                true
            }
            (false, true) => {
                self.collapsed_sections.retain(|section| section != label);
                true
            }
            _ => false,
        }
    }
}

/// A user folder: which items it claims and how it shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupRule {
    pub title: String,
    /// Comma separated keywords as typed, e.g. `"cal, task"`.
    pub keywords: String,
    pub items: Vec<ItemConfig>,
}

impl GroupRule {
    pub fn new(title: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            keywords: keywords.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = names.into_iter().map(ItemConfig::new).collect();
        self
    }

    /// Lowercased non-empty keywords.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.keyword_list()
            .iter()
            .any(|keyword| label.contains(keyword.as_str()))
    }

    pub fn item(&self, name: &str) -> Option<&ItemConfig> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn alias_for(&self, name: &str) -> Option<&str> {
        self.item(name)
            .and_then(|item| item.alias.as_deref())
            .filter(|alias| !alias.is_empty())
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ItemConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }
}
