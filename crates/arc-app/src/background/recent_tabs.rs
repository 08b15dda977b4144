use std::collections::HashMap;
use std::sync::Mutex;

use arc_common::{TabId, WindowId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentPair {
    pub current: Option<TabId>,
    pub previous: Option<TabId>,
}

/// Per-window record of the current and previously active tab.
#[derive(Debug, Default)]
pub struct RecentTabs {
    windows: Mutex<HashMap<WindowId, RecentPair>>,
}

impl RecentTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_activated(&self, window: WindowId, tab: TabId) {
        let mut windows = self.lock();
        let pair = windows.entry(window).or_default();
        if pair.current == Some(tab) {
            return;
        }
        pair.previous = pair.current;
        pair.current = Some(tab);
    }

    pub fn on_removed(&self, window: WindowId, tab: TabId) {
        let mut windows = self.lock();
        if let Some(pair) = windows.get_mut(&window) {
            if pair.current == Some(tab) {
                pair.current = None;
            }
            if pair.previous == Some(tab) {
                pair.previous = None;
            }
        }
    }

    /// Swap current and previous; returns the tab to activate.
    pub fn toggle(&self, window: WindowId) -> Option<TabId> {
        let mut windows = self.lock();
        let pair = windows.get_mut(&window)?;
        let previous = pair.previous?;
        pair.previous = pair.current;
        pair.current = Some(previous);
        Some(previous)
    }

    pub fn get(&self, window: WindowId) -> RecentPair {
        self.lock().get(&window).copied().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<WindowId, RecentPair>> {
        self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: WindowId = WindowId(1);

    #[test]
    fn activation_shifts_current_to_previous() {
        let recent = RecentTabs::new();
        recent.on_activated(W, TabId(1));
        recent.on_activated(W, TabId(2));
        assert_eq!(
            recent.get(W),
            RecentPair {
                current: Some(TabId(2)),
                previous: Some(TabId(1)),
            }
        );
    }

    #[test]
    fn reactivating_current_changes_nothing() {
        let recent = RecentTabs::new();
        recent.on_activated(W, TabId(1));
        recent.on_activated(W, TabId(2));
        recent.on_activated(W, TabId(2));
        assert_eq!(recent.get(W).previous, Some(TabId(1)));
    }

    #[test]
    fn toggle_swaps_and_is_reversible() {
        let recent = RecentTabs::new();
        recent.on_activated(W, TabId(1));
        recent.on_activated(W, TabId(2));
        assert_eq!(recent.toggle(W), Some(TabId(1)));
        assert_eq!(recent.toggle(W), Some(TabId(2)));
    }

    #[test]
    fn toggle_without_previous_is_none() {
        let recent = RecentTabs::new();
        assert_eq!(recent.toggle(W), None);
        recent.on_activated(W, TabId(1));
        assert_eq!(recent.toggle(W), None);
    }

    #[test]
    fn removal_clears_matching_entries() {
        let recent = RecentTabs::new();
        recent.on_activated(W, TabId(1));
        recent.on_activated(W, TabId(2));
        recent.on_removed(W, TabId(1));
        assert_eq!(recent.get(W).previous, None);
        assert_eq!(recent.toggle(W), None);
    }

    #[test]
    fn windows_are_independent() {
        let recent = RecentTabs::new();
        recent.on_activated(W, TabId(1));
        recent.on_activated(WindowId(2), TabId(5));
        recent.on_activated(W, TabId(3));
        assert_eq!(recent.get(WindowId(2)).previous, None);
        assert_eq!(recent.get(W).previous, Some(TabId(1)));
    }
}
