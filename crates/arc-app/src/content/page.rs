//! Actions that run inside the page rather than in the privileged process.

use std::sync::Mutex;

use arc_common::{ActionError, ActionId, Notification, NotificationQueue};
use async_trait::async_trait;
use tracing::{debug, warn};

pub const COPIED_TOAST: &str = "Copied!";

/// What the content side can do to the page it lives in.
#[async_trait]
pub trait PageContext: Send + Sync {
    fn url(&self) -> String;

    fn title(&self) -> String;

    /// Open the host's find-in-page UI.
    async fn open_find(&self) -> Result<(), ActionError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), ActionError>;

    fn show_toast(&self, toast: Notification);
}

/// `[title](url)`, using the URL as the title when there is none.
pub fn markdown_link(title: &str, url: &str) -> String {
    let label = if title.is_empty() { url } else { title };
    format!("[{label}]({url})")
}

/// Run `find`, `copyUrl` or `copyUrlMarkdown`. Other ids are ignored.
pub async fn run_local_action(page: &dyn PageContext, action: &ActionId) {
    match action {
        ActionId::Find => {
            if let Err(e) = page.open_find().await {
                warn!(error = %e, "find in page failed");
            }
        }
        ActionId::CopyUrl => copy(page, page.url()).await,
        ActionId::CopyUrlMarkdown => copy(page, markdown_link(&page.title(), &page.url())).await,
        other => debug!(action = %other, "not a page action"),
    }
}

async fn copy(page: &dyn PageContext, text: String) {
    if text.is_empty() {
        return;
    }
    match page.write_clipboard(&text).await {
        Ok(()) => page.show_toast(Notification::toast(COPIED_TOAST)),
        Err(e) => warn!(error = %e, "copy failed"),
    }
}

#[derive(Debug)]
struct PageState {
    url: String,
    title: String,
    clipboard: Option<String>,
    find_opened: usize,
    toasts: NotificationQueue,
    clipboard_denied: bool,
}

/// A page with a clipboard, a find bar and a toast area, all in memory.
#[derive(Debug)]
pub struct SimulatedPage {
    state: Mutex<PageState>,
}

impl SimulatedPage {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(PageState {
                url: url.into(),
                title: title.into(),
                clipboard: None,
                find_opened: 0,
                toasts: NotificationQueue::new(4),
                clipboard_denied: false,
            }),
        }
    }

    /// Point the page at another document.
    pub fn load(&self, title: &str, url: &str) {
        let mut state = self.lock();
        state.title = title.to_string();
        state.url = url.to_string();
    }

    pub fn deny_clipboard(&self, denied: bool) {
        self.lock().clipboard_denied = denied;
    }

    pub fn clipboard(&self) -> Option<String> {
        self.lock().clipboard.clone()
    }

    pub fn find_opened(&self) -> usize {
        self.lock().find_opened
    }

    pub fn last_toast(&self) -> Option<String> {
        self.lock().toasts.latest().map(|t| t.body.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PageContext for SimulatedPage {
    fn url(&self) -> String {
        self.lock().url.clone()
    }

    fn title(&self) -> String {
        self.lock().title.clone()
    }

    async fn open_find(&self) -> Result<(), ActionError> {
        self.lock().find_opened += 1;
        Ok(())
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), ActionError> {
        let mut state = self.lock();
        if state.clipboard_denied {
            return Err(ActionError::Execution("clipboard write denied".into()));
        }
        state.clipboard = Some(text.to_string());
        Ok(())
    }

    fn show_toast(&self, toast: Notification) {
        self.lock().toasts.push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_falls_back_to_url() {
        assert_eq!(markdown_link("Docs", "https://docs.rs"), "[Docs](https://docs.rs)");
        assert_eq!(markdown_link("", "https://docs.rs"), "[https://docs.rs](https://docs.rs)");
    }

    #[tokio::test]
    async fn copy_url_writes_clipboard_and_toasts() {
        let page = SimulatedPage::new("Docs", "https://docs.rs");
        run_local_action(&page, &ActionId::CopyUrl).await;
        assert_eq!(page.clipboard().as_deref(), Some("https://docs.rs"));
        assert_eq!(page.last_toast().as_deref(), Some(COPIED_TOAST));
    }

    #[tokio::test]
    async fn copy_markdown_uses_title() {
        let page = SimulatedPage::new("Docs", "https://docs.rs");
        run_local_action(&page, &ActionId::CopyUrlMarkdown).await;
        assert_eq!(page.clipboard().as_deref(), Some("[Docs](https://docs.rs)"));
    }

    #[tokio::test]
    async fn denied_clipboard_shows_no_toast() {
        let page = SimulatedPage::new("Docs", "https://docs.rs");
        page.deny_clipboard(true);
        run_local_action(&page, &ActionId::CopyUrl).await;
        assert_eq!(page.clipboard(), None);
        assert_eq!(page.last_toast(), None);
    }

    #[tokio::test]
    async fn empty_url_copies_nothing() {
        let page = SimulatedPage::new("", "");
        run_local_action(&page, &ActionId::CopyUrl).await;
        assert_eq!(page.clipboard(), None);
    }

    #[tokio::test]
    async fn find_opens_find_bar() {
        let page = SimulatedPage::new("Docs", "https://docs.rs");
        run_local_action(&page, &ActionId::Find).await;
        run_local_action(&page, &ActionId::NewTab).await;
        assert_eq!(page.find_opened(), 1);
    }
}
