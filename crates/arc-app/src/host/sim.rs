use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};

use arc_bridge::TabMessage;
use arc_common::{
    ActionError, EventBus, HostEvent, Notification, NotificationQueue, TabId, TabInfo, WindowId,
    WindowInfo, WindowKind,
};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::{CreateTab, CreateWindow, HostActionService, TabQuery, TabUpdate, WindowScope};

pub const NEW_TAB_URL: &str = "chrome://newtab";

fn title_for(url: &str) -> String {
    match url {
        NEW_TAB_URL => "New Tab".to_string(),
        "chrome://history" => "History".to_string(),
        other => other.to_string(),
    }
}

struct SimTab {
    info: TabInfo,
    history: Vec<String>,
    cursor: usize,
    zoom: f64,
    reloads: u32,
}

impl SimTab {
    fn navigate_to(&mut self, index: usize) {
        self.cursor = index;
        self.info.url = self.history[index].clone();
        self.info.title = title_for(&self.info.url);
    }
}

#[derive(Default)]
struct HostState {
    windows: Vec<WindowInfo>,
    tabs: Vec<SimTab>,
    last_focused: Option<WindowId>,
    closed: Vec<TabInfo>,
    next_id: u32,
    clock: u64,
}

impl HostState {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn tab(&self, id: TabId) -> Result<&SimTab, ActionError> {
        self.tabs
            .iter()
            .find(|t| t.info.id == id)
            .ok_or(ActionError::TabNotFound(id.0))
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut SimTab, ActionError> {
        self.tabs
            .iter_mut()
            .find(|t| t.info.id == id)
            .ok_or(ActionError::TabNotFound(id.0))
    }

    fn has_window(&self, id: WindowId) -> bool {
        self.windows.iter().any(|w| w.id == id)
    }

    fn add_tab(&mut self, window_id: WindowId, title: String, url: String) -> TabId {
        let id = TabId(self.next_id());
        let last_accessed = self.tick();
        self.tabs.push(SimTab {
            info: TabInfo {
                id,
                window_id,
                title,
                url: url.clone(),
                fav_icon_url: None,
                active: false,
                pinned: false,
                last_accessed,
            },
            history: vec![url],
            cursor: 0,
            zoom: 1.0,
            reloads: 0,
        });
        id
    }

    fn add_window(&mut self, kind: WindowKind, incognito: bool) -> WindowId {
        let id = WindowId(self.next_id());
        self.windows.push(WindowInfo {
            id,
            focused: false,
            kind,
            incognito,
        });
        id
    }

    fn activate(&mut self, id: TabId) -> Result<WindowId, ActionError> {
        let window = self.tab(id)?.info.window_id;
        let now = self.tick();
        for tab in self.tabs.iter_mut().filter(|t| t.info.window_id == window) {
            tab.info.active = tab.info.id == id;
            if tab.info.active {
                tab.info.last_accessed = now;
            }
        }
        Ok(window)
    }

    fn focus(&mut self, id: WindowId) -> Result<(), ActionError> {
        if !self.has_window(id) {
            return Err(ActionError::WindowNotFound(id.0));
        }
        for window in &mut self.windows {
            window.focused = window.id == id;
        }
        self.last_focused = Some(id);
        Ok(())
    }

    fn window_tabs(&self, window: WindowId) -> impl Iterator<Item = &SimTab> {
        self.tabs.iter().filter(move |t| t.info.window_id == window)
    }
}

/// An in-memory browser: windows, tab strips, per-tab history and zoom,
/// a closed-tab stack and a notification tray.
///
/// Lifecycle changes are published as [`HostEvent`]s and page-local
/// relays as `(TabId, TabMessage)` pairs, the way a real host reports them.
pub struct SimulatedHost {
    state: Mutex<HostState>,
    notifications: Mutex<NotificationQueue>,
    events: EventBus,
    tab_messages: broadcast::Sender<(TabId, TabMessage)>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        let (tab_messages, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(HostState::default()),
            notifications: Mutex::new(NotificationQueue::new(32)),
            events: EventBus::default(),
            tab_messages,
        }
    }

    /// Open a focused normal window holding `pages` as `(title, url)`,
    /// with the first one active.
    pub fn open_window(&self, pages: &[(&str, &str)]) -> WindowId {
        let mut state = self.lock();
        let window = state.add_window(WindowKind::Normal, false);
        let ids: Vec<TabId> = pages
            .iter()
            .map(|(title, url)| state.add_tab(window, title.to_string(), url.to_string()))
            .collect();
        if let Some(&first) = ids.first() {
            if state.activate(first).is_ok() {
                self.events.publish(HostEvent::TabActivated {
                    tab_id: first,
                    window_id: window,
                });
            }
        }
        if state.focus(window).is_ok() {
            self.events.publish(HostEvent::WindowFocused(window));
        }
        window
    }

    /// Follow a link in `tab`, dropping any forward history.
    pub fn navigate(&self, tab: TabId, url: &str) -> Result<(), ActionError> {
        let mut state = self.lock();
        let tab = state.tab_mut(tab)?;
        tab.history.truncate(tab.cursor + 1);
        tab.history.push(url.to_string());
        let last = tab.history.len() - 1;
        tab.navigate_to(last);
        Ok(())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_tab_messages(&self) -> broadcast::Receiver<(TabId, TabMessage)> {
        self.tab_messages.subscribe()
    }

    pub fn tabs(&self) -> Vec<TabInfo> {
        self.lock().tabs.iter().map(|t| t.info.clone()).collect()
    }

    pub fn windows(&self) -> Vec<WindowInfo> {
        self.lock().windows.clone()
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.lock().last_focused
    }

    /// Active tab of the last focused window.
    pub fn active_tab(&self) -> Option<TabInfo> {
        let state = self.lock();
        let window = state.last_focused?;
        let active = state
            .window_tabs(window)
            .find(|t| t.info.active)
            .map(|t| t.info.clone());
        active
    }

    pub fn zoom(&self, tab: TabId) -> Option<f64> {
        self.lock().tab(tab).ok().map(|t| t.zoom)
    }

    pub fn reload_count(&self, tab: TabId) -> u32 {
        self.lock().tab(tab).map(|t| t.reloads).unwrap_or(0)
    }

    pub fn closed_count(&self) -> usize {
        self.lock().closed.len()
    }

    /// Bodies of the notifications still on screen, oldest first.
    pub fn notification_bodies(&self) -> Vec<String> {
        let mut queue = self
            .notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.visible().iter().map(|n| n.body.clone()).collect()
    }

    /// Human-readable dump of every window and tab.
    pub fn summary(&self) -> String {
        let state = self.lock();
        let mut out = String::new();
        for window in &state.windows {
            let _ = writeln!(
                out,
                "window {} ({}{}{})",
                window.id,
                match window.kind {
                    WindowKind::Normal => "normal",
                    WindowKind::Popup => "popup",
                },
                if window.incognito { ", incognito" } else { "" },
                if window.focused { ", focused" } else { "" },
            );
            for tab in state.window_tabs(window.id) {
                let _ = writeln!(
                    out,
                    "  {} [{}] {}  {}{}  zoom {:.2}",
                    if tab.info.active { '*' } else { ' ' },
                    tab.info.id,
                    tab.info.title,
                    tab.info.url,
                    if tab.info.pinned { "  (pinned)" } else { "" },
                    tab.zoom,
                );
            }
        }
        out
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish_activated(&self, tab_id: TabId, window_id: WindowId) {
        self.events
            .publish(HostEvent::TabActivated { tab_id, window_id });
    }
}

#[async_trait]
impl HostActionService for SimulatedHost {
    async fn create_tab(&self, props: CreateTab) -> Result<TabInfo, ActionError> {
        let mut state = self.lock();
        let window = state
            .last_focused
            .ok_or_else(|| ActionError::Execution("no window to open a tab in".into()))?;
        let url = props.url.unwrap_or_else(|| NEW_TAB_URL.to_string());
        let id = state.add_tab(window, title_for(&url), url);
        state.activate(id)?;
        self.publish_activated(id, window);
        debug!(tab = %id, window = %window, "tab created");
        Ok(state.tab(id)?.info.clone())
    }

    async fn remove_tabs(&self, ids: &[TabId]) -> Result<(), ActionError> {
        let mut state = self.lock();
        for &id in ids {
            state.tab(id)?;
        }
        for &id in ids {
            let window = state.tab(id)?.info.window_id;
            let position = state
                .window_tabs(window)
                .position(|t| t.info.id == id)
                .unwrap_or(0);
            let index = state
                .tabs
                .iter()
                .position(|t| t.info.id == id)
                .ok_or(ActionError::TabNotFound(id.0))?;
            let removed = state.tabs.remove(index);
            self.events.publish(HostEvent::TabRemoved {
                tab_id: id,
                window_id: window,
            });

            let remaining: Vec<TabId> = state.window_tabs(window).map(|t| t.info.id).collect();
            if remaining.is_empty() {
                state.windows.retain(|w| w.id != window);
                if state.last_focused == Some(window) {
                    state.last_focused = None;
                    if let Some(next) = state.windows.first().map(|w| w.id) {
                        state.focus(next)?;
                        self.events.publish(HostEvent::WindowFocused(next));
                    }
                }
            } else if removed.info.active {
                let next = remaining[position.min(remaining.len() - 1)];
                state.activate(next)?;
                self.publish_activated(next, window);
            }
            state.closed.push(removed.info);
        }
        Ok(())
    }

    async fn get_tab(&self, id: TabId) -> Result<TabInfo, ActionError> {
        Ok(self.lock().tab(id)?.info.clone())
    }

    async fn update_tab(&self, id: TabId, update: TabUpdate) -> Result<TabInfo, ActionError> {
        let mut state = self.lock();
        if let Some(pinned) = update.pinned {
            state.tab_mut(id)?.info.pinned = pinned;
        }
        if update.active == Some(true) {
            let window = state.activate(id)?;
            self.publish_activated(id, window);
        }
        Ok(state.tab(id)?.info.clone())
    }

    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<TabInfo>, ActionError> {
        let state = self.lock();
        let window = match query.window {
            Some(WindowScope::Current | WindowScope::LastFocused) => match state.last_focused {
                Some(window) => Some(window),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        Ok(state
            .tabs
            .iter()
            .map(|t| &t.info)
            .filter(|t| window.map_or(true, |w| t.window_id == w))
            .filter(|t| query.active.map_or(true, |a| t.active == a))
            .filter(|t| query.pinned.map_or(true, |p| t.pinned == p))
            .cloned()
            .collect())
    }

    async fn get_zoom(&self, id: TabId) -> Result<f64, ActionError> {
        Ok(self.lock().tab(id)?.zoom)
    }

    async fn set_zoom(&self, id: TabId, factor: f64) -> Result<(), ActionError> {
        self.lock().tab_mut(id)?.zoom = factor;
        Ok(())
    }

    async fn go_back(&self, id: TabId) -> Result<(), ActionError> {
        let mut state = self.lock();
        let tab = state.tab_mut(id)?;
        if tab.cursor > 0 {
            let target = tab.cursor - 1;
            tab.navigate_to(target);
        }
        Ok(())
    }

    async fn go_forward(&self, id: TabId) -> Result<(), ActionError> {
        let mut state = self.lock();
        let tab = state.tab_mut(id)?;
        if tab.cursor + 1 < tab.history.len() {
            let target = tab.cursor + 1;
            tab.navigate_to(target);
        }
        Ok(())
    }

    async fn reload(&self, id: TabId) -> Result<(), ActionError> {
        self.lock().tab_mut(id)?.reloads += 1;
        Ok(())
    }

    async fn create_window(&self, props: CreateWindow) -> Result<WindowInfo, ActionError> {
        let mut state = self.lock();
        let window = state.add_window(props.kind, props.incognito);
        let url = props.url.unwrap_or_else(|| NEW_TAB_URL.to_string());
        let tab = state.add_tab(window, title_for(&url), url);
        state.activate(tab)?;
        self.publish_activated(tab, window);
        if props.focused {
            state.focus(window)?;
            self.events.publish(HostEvent::WindowFocused(window));
        }
        debug!(window = %window, kind = ?props.kind, size = ?props.size, "window created");
        state
            .windows
            .iter()
            .find(|w| w.id == window)
            .cloned()
            .ok_or(ActionError::WindowNotFound(window.0))
    }

    async fn focus_window(&self, id: WindowId) -> Result<(), ActionError> {
        self.lock().focus(id)?;
        self.events.publish(HostEvent::WindowFocused(id));
        Ok(())
    }

    async fn list_windows(&self, kind: Option<WindowKind>) -> Result<Vec<WindowInfo>, ActionError> {
        Ok(self
            .lock()
            .windows
            .iter()
            .filter(|w| kind.map_or(true, |k| w.kind == k))
            .cloned()
            .collect())
    }

    async fn restore_session(&self) -> Result<(), ActionError> {
        let mut state = self.lock();
        let Some(closed) = state.closed.pop() else {
            debug!("nothing to restore");
            return Ok(());
        };
        let window = if state.has_window(closed.window_id) {
            closed.window_id
        } else if let Some(window) = state.last_focused {
            window
        } else {
            let window = state.add_window(WindowKind::Normal, false);
            state.focus(window)?;
            self.events.publish(HostEvent::WindowFocused(window));
            window
        };
        let id = state.add_tab(window, closed.title, closed.url);
        state.tab_mut(id)?.info.pinned = closed.pinned;
        state.activate(id)?;
        self.publish_activated(id, window);
        Ok(())
    }

    async fn notify(&self, notification: Notification) -> Result<(), ActionError> {
        debug!(body = %notification.body, "notification shown");
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
        Ok(())
    }

    async fn relay_to_tab(&self, id: TabId, message: TabMessage) -> Result<(), ActionError> {
        self.lock().tab(id)?;
        self.tab_messages
            .send((id, message))
            .map(|_| ())
            .map_err(|_| ActionError::Execution(format!("no page listening in tab {id}")))
    }
}
