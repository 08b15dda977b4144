use arc_common::{ActionError, Notification, WindowKind, WindowInfo};
use tracing::debug;

use super::Background;
use crate::host::{TabQuery, TabUpdate};

/// `(index + direction) mod len`, normalized to a non-negative index.
/// `len` must be non-zero.
pub fn cycle_index(index: usize, len: usize, direction: isize) -> usize {
    (index as isize + direction).rem_euclid(len as isize) as usize
}

impl Background {
    pub(super) async fn activate_tab_index(&self, index: usize) -> Result<(), ActionError> {
        let tabs = self.host.query_tabs(TabQuery::current_window()).await?;
        match tabs.get(index) {
            Some(tab) => {
                self.host.update_tab(tab.id, TabUpdate::activate()).await?;
            }
            None => debug!(index, count = tabs.len(), "no tab at index"),
        }
        Ok(())
    }

    pub(super) async fn activate_last_tab(&self) -> Result<(), ActionError> {
        let tabs = self.host.query_tabs(TabQuery::current_window()).await?;
        if let Some(tab) = tabs.last() {
            self.host.update_tab(tab.id, TabUpdate::activate()).await?;
        }
        Ok(())
    }

    pub(super) async fn cycle_tabs(&self, direction: isize) -> Result<(), ActionError> {
        let tabs = self.host.query_tabs(TabQuery::current_window()).await?;
        let Some(active) = tabs.iter().position(|t| t.active) else {
            return Ok(());
        };
        let next = cycle_index(active, tabs.len(), direction);
        self.host.update_tab(tabs[next].id, TabUpdate::activate()).await?;
        Ok(())
    }

    async fn normal_windows(&self) -> Result<Vec<WindowInfo>, ActionError> {
        let mut windows = self.host.list_windows(Some(WindowKind::Normal)).await?;
        windows.sort_by_key(|w| w.id);
        Ok(windows)
    }

    pub(super) async fn cycle_windows(&self, direction: isize) -> Result<(), ActionError> {
        let windows = self.normal_windows().await?;
        if windows.len() < 2 {
            return Ok(());
        }
        let Some(focused) = windows.iter().position(|w| w.focused) else {
            return Ok(());
        };
        let next = cycle_index(focused, windows.len(), direction);
        self.host.focus_window(windows[next].id).await
    }

    /// Focus the normal window at `index` by id order; past the end means
    /// the last one.
    pub(super) async fn focus_space(&self, index: usize) -> Result<(), ActionError> {
        let windows = self.normal_windows().await?;
        let Some(target) = windows.get(index).or(windows.last()) else {
            return Ok(());
        };
        self.host.focus_window(target.id).await
    }

    pub(super) async fn toggle_recent(&self) -> Result<(), ActionError> {
        let Some(active) = self.active_tab().await? else {
            return Ok(());
        };
        match self.recent.toggle(active.window_id) {
            Some(previous) => {
                self.host.update_tab(previous, TabUpdate::activate()).await?;
                Ok(())
            }
            None => self.host.notify(Notification::nothing_to_toggle()).await,
        }
    }

    pub(super) async fn clear_unpinned(&self) -> Result<(), ActionError> {
        let ids: Vec<_> = self
            .host
            .query_tabs(TabQuery::current_window().pinned(false))
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        self.host.remove_tabs(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_backwards_from_first() {
        assert_eq!(cycle_index(0, 3, -1), 2);
    }

    #[test]
    fn wraps_forwards_from_last() {
        assert_eq!(cycle_index(2, 3, 1), 0);
    }

    #[test]
    fn steps_inside_range() {
        assert_eq!(cycle_index(1, 3, 1), 2);
        assert_eq!(cycle_index(1, 3, -1), 0);
    }

    #[test]
    fn single_element_stays_put() {
        assert_eq!(cycle_index(0, 1, 1), 0);
        assert_eq!(cycle_index(0, 1, -1), 0);
    }
}
