use arc_common::TabInfo;
use arc_config::{Settings, SettingsDefaults};
use arc_platform::{ShortcutCategory, ShortcutDefinition};
use serde_json::Value;

use super::types::{OverlayCommand, OverlayMode};

/// Overlay contents: query, filters, highlight and the entries they apply to.
pub struct OverlayState {
    mode: OverlayMode,
    query: String,
    category: Option<ShortcutCategory>,
    highlight: usize,
    shortcuts: Vec<ShortcutDefinition>,
    tabs: Vec<TabInfo>,
    defaults: SettingsDefaults,
    settings: Settings,
}

impl OverlayState {
    /// `stored` is the raw settings document, if any.
    pub fn new(shortcuts: Vec<ShortcutDefinition>, stored: Option<&Value>) -> Self {
        let defaults = SettingsDefaults::new(shortcuts.iter().map(|s| s.id.clone()));
        let settings = defaults.merge(stored);
        Self {
            mode: OverlayMode::default(),
            query: String::new(),
            category: None,
            highlight: 0,
            shortcuts,
            tabs: Vec::new(),
            defaults,
            settings,
        }
    }

    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<ShortcutCategory> {
        self.category
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_mode(&mut self, mode: OverlayMode) {
        self.mode = mode;
        self.query.clear();
        self.highlight = 0;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.highlight = 0;
    }

    pub fn append_char(&mut self, c: char) {
        self.query.push(c);
        self.highlight = 0;
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.highlight = 0;
    }

    /// Only narrows the shortcuts list.
    pub fn set_category(&mut self, category: Option<ShortcutCategory>) {
        self.category = category;
        self.highlight = 0;
    }

    pub fn set_tabs(&mut self, tabs: Vec<TabInfo>) {
        self.tabs = tabs;
        self.clamp_highlight();
    }

    /// Re-derive enablement from a newly stored settings document.
    pub fn apply_stored(&mut self, stored: Option<&Value>) {
        self.settings = self.defaults.merge(stored);
    }

    pub fn is_enabled(&self, shortcut: &ShortcutDefinition) -> bool {
        self.settings.is_enabled(&shortcut.id)
    }

    pub fn visible_shortcuts(&self) -> Vec<&ShortcutDefinition> {
        let needle = self.query.trim().to_lowercase();
        self.shortcuts
            .iter()
            .filter(|s| self.category.map_or(true, |c| s.category == c))
            .filter(|s| {
                needle.is_empty()
                    || s.label.to_lowercase().contains(&needle)
                    || s.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn visible_tabs(&self) -> Vec<&TabInfo> {
        let needle = self.query.trim().to_lowercase();
        self.tabs
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.title.to_lowercase().contains(&needle)
                    || t.url.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        match self.mode {
            OverlayMode::Shortcuts => self.visible_shortcuts().len(),
            OverlayMode::Tabs => self.visible_tabs().len(),
        }
    }

    pub fn move_down(&mut self) {
        if self.highlight + 1 < self.visible_len() {
            self.highlight += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.highlight = self.highlight.saturating_sub(1);
    }

    /// The command for the highlighted entry. A disabled shortcut gives
    /// nothing.
    pub fn confirm(&self) -> Option<OverlayCommand> {
        match self.mode {
            OverlayMode::Shortcuts => {
                let shortcut = *self.visible_shortcuts().get(self.highlight)?;
                self.is_enabled(shortcut)
                    .then(|| OverlayCommand::Perform(shortcut.clone()))
            }
            OverlayMode::Tabs => match self.visible_tabs().get(self.highlight) {
                Some(tab) => Some(OverlayCommand::ActivateTab(tab.id)),
                None => {
                    let query = self.query.trim();
                    (!query.is_empty()).then(|| OverlayCommand::OpenQuery(query.to_string()))
                }
            },
        }
    }

    fn clamp_highlight(&mut self) {
        self.highlight = self.highlight.min(self.visible_len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_common::{TabId, WindowId};
    use arc_platform::builtin_shortcuts;
    use serde_json::json;

    fn state() -> OverlayState {
        OverlayState::new(builtin_shortcuts().to_vec(), None)
    }

    fn tab(id: u32, title: &str, url: &str) -> TabInfo {
        TabInfo {
            id: TabId(id),
            window_id: WindowId(1),
            title: title.into(),
            url: url.into(),
            fav_icon_url: None,
            active: false,
            pinned: false,
            last_accessed: 0,
        }
    }

    #[test]
    fn empty_query_shows_everything() {
        let s = state();
        assert_eq!(s.visible_shortcuts().len(), builtin_shortcuts().len());
        assert_eq!(s.highlight(), 0);
    }

    #[test]
    fn filter_is_case_insensitive_over_label_and_description() {
        let mut s = state();
        s.set_query("ZOOM");
        let visible = s.visible_shortcuts();
        assert!(!visible.is_empty());
        for shortcut in visible {
            let hay = format!("{} {}", shortcut.label, shortcut.description).to_lowercase();
            assert!(hay.contains("zoom"), "{}", shortcut.id);
        }
    }

    #[test]
    fn category_narrows_shortcuts() {
        let mut s = state();
        s.set_category(Some(ShortcutCategory::Navigation));
        assert!(s
            .visible_shortcuts()
            .iter()
            .all(|sc| sc.category == ShortcutCategory::Navigation));
    }

    #[test]
    fn highlight_is_clamped() {
        let mut s = state();
        s.move_up();
        assert_eq!(s.highlight(), 0);
        s.set_query("zoom in");
        let len = s.visible_len();
        for _ in 0..len + 5 {
            s.move_down();
        }
        assert_eq!(s.highlight(), len - 1);
    }

    #[test]
    fn query_change_resets_highlight() {
        let mut s = state();
        s.move_down();
        s.move_down();
        s.append_char('z');
        assert_eq!(s.highlight(), 0);
    }

    #[test]
    fn confirm_skips_disabled_shortcut() {
        let mut s = OverlayState::new(
            builtin_shortcuts().to_vec(),
            Some(&json!({ "arcMode": true, "features": { "zoomIn": false } })),
        );
        s.set_query("zoom in");
        assert_eq!(s.visible_shortcuts()[0].id, "zoomIn");
        assert_eq!(s.confirm(), None);

        s.apply_stored(Some(&json!({ "arcMode": true, "features": {} })));
        assert!(matches!(s.confirm(), Some(OverlayCommand::Perform(def)) if def.id == "zoomIn"));
    }

    #[test]
    fn tabs_mode_filters_title_and_url() {
        let mut s = state();
        s.set_mode(OverlayMode::Tabs);
        s.set_tabs(vec![
            tab(1, "Rust docs", "https://docs.rs"),
            tab(2, "Crates", "https://crates.io"),
        ]);
        s.set_query("crates.io");
        assert_eq!(s.confirm(), Some(OverlayCommand::ActivateTab(TabId(2))));
        s.set_query("DOCS");
        assert_eq!(s.confirm(), Some(OverlayCommand::ActivateTab(TabId(1))));
    }

    #[test]
    fn unmatched_tab_query_opens_it() {
        let mut s = state();
        s.set_mode(OverlayMode::Tabs);
        s.set_tabs(vec![tab(1, "Rust docs", "https://docs.rs")]);
        s.set_query("  tokio  ");
        assert_eq!(s.confirm(), Some(OverlayCommand::OpenQuery("tokio".into())));
        s.set_query("   ");
        assert_eq!(s.visible_tabs().len(), 1);
    }

    #[test]
    fn switching_mode_resets_query_and_highlight() {
        let mut s = state();
        s.set_query("tab");
        s.move_down();
        s.set_mode(OverlayMode::Tabs);
        assert_eq!(s.query(), "");
        assert_eq!(s.highlight(), 0);
    }

    #[test]
    fn shrinking_tab_list_clamps_highlight() {
        let mut s = state();
        s.set_mode(OverlayMode::Tabs);
        s.set_tabs(vec![tab(1, "a", "a"), tab(2, "b", "b"), tab(3, "c", "c")]);
        s.move_down();
        s.move_down();
        s.set_tabs(vec![tab(1, "a", "a")]);
        assert_eq!(s.highlight(), 0);
    }
}
