use arc_common::ActionId;
use serde::{Deserialize, Serialize};

use crate::keymap::Combo;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutCategory {
    Actions,
    Everyday,
    Navigation,
}

impl ShortcutCategory {
    pub const ALL: [ShortcutCategory; 3] = [
        ShortcutCategory::Actions,
        ShortcutCategory::Everyday,
        ShortcutCategory::Navigation,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ShortcutCategory::Actions => "actions",
            ShortcutCategory::Everyday => "everyday",
            ShortcutCategory::Navigation => "navigation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShortcutCategory::Actions => "Actions",
            ShortcutCategory::Everyday => "Everyday Use",
            ShortcutCategory::Navigation => "Quick Navigation",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Category entry as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl From<ShortcutCategory> for Category {
    fn from(category: ShortcutCategory) -> Self {
        Self {
            id: category.id().to_string(),
            label: category.label().to_string(),
        }
    }
}

/// One entry of the shortcut table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutDefinition {
    pub id: String,
    pub label: String,
    pub description: String,
    pub category: ShortcutCategory,
    pub action: ActionId,
    pub combos: Vec<Combo>,
    /// Zero-based tab position for `goToTab`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<usize>,
    /// Zero-based window position for `focusSpace`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_index: Option<usize>,
    /// Host command binding, when the shortcut also exists as one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl ShortcutDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        category: ShortcutCategory,
        action: ActionId,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            category,
            action,
            combos: Vec::new(),
            tab_index: None,
            space_index: None,
            command_id: None,
        }
    }

    pub fn combo(mut self, combo: Combo) -> Self {
        self.combos.push(combo);
        self
    }

    pub fn command(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = Some(command_id.into());
        self
    }

    pub fn tab(mut self, index: usize) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn space(mut self, index: usize) -> Self {
        self.space_index = Some(index);
        self
    }

    /// Combos that apply on `platform`, in definition order.
    pub fn combos_for(&self, platform: Platform) -> impl Iterator<Item = &Combo> {
        self.combos.iter().filter(move |c| c.applies_to(platform))
    }
}
