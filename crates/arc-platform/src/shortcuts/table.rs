use std::sync::LazyLock;

use arc_common::{ActionId, UnsupportedReason};

use crate::keymap::Combo;
use crate::platform::Platform;

use super::types::{ShortcutCategory as Cat, ShortcutDefinition as Def};

const MAC: &[Platform] = &[Platform::Mac];
const NON_MAC: &[Platform] = &[Platform::Windows, Platform::Linux];

fn mac(keys: &[&str]) -> Combo {
    Combo::new(keys.iter().copied()).on(MAC)
}

fn non_mac(keys: &[&str]) -> Combo {
    Combo::new(keys.iter().copied()).on(NON_MAC)
}

fn all(keys: &[&str]) -> Combo {
    Combo::new(keys.iter().copied())
}

/// `Meta+<key>` on mac, `Control+<key>` elsewhere.
fn primary(def: Def, key: &str) -> Def {
    def.combo(mac(&["Meta", key])).combo(non_mac(&["Control", key]))
}

/// `Meta+<mods>+<key>` on mac, `Control+<mods>+<key>` elsewhere.
fn primary_with(def: Def, mods: &[&str], key: &str) -> Def {
    let mut mac_keys = vec!["Meta"];
    mac_keys.extend_from_slice(mods);
    mac_keys.push(key);
    let mut other_keys = vec!["Control"];
    other_keys.extend_from_slice(mods);
    other_keys.push(key);
    def.combo(mac(&mac_keys)).combo(non_mac(&other_keys))
}

static BUILTIN: LazyLock<Vec<Def>> = LazyLock::new(build);

/// The shipped shortcut table, in definition order.
pub fn builtin_shortcuts() -> &'static [Def] {
    &BUILTIN
}

fn build() -> Vec<Def> {
    let mut table = vec![
        // -- Actions --
        primary(
            Def::new("viewHistory", "View history", "Command+Y / Ctrl+Y", Cat::Actions, ActionId::OpenHistory)
                .command("arc-view-history"),
            "y",
        ),
        Def::new("zoomIn", "Zoom in webpage", "Command+Plus / Ctrl+Plus", Cat::Actions, ActionId::ZoomIn)
            .combo(mac(&["Meta", "="]))
            .combo(mac(&["Meta", "Shift", "+"]))
            .combo(non_mac(&["Control", "="]))
            .combo(non_mac(&["Control", "Shift", "+"])),
        primary(
            Def::new("zoomOut", "Zoom out webpage", "Command+Minus / Ctrl+Minus", Cat::Actions, ActionId::ZoomOut),
            "-",
        ),
        primary(
            Def::new("resetZoom", "Reset zoom", "Command+0 / Ctrl+0", Cat::Actions, ActionId::ResetZoom),
            "0",
        ),
        primary(
            Def::new("reload", "Reload webpage", "Command+R / Ctrl+R", Cat::Actions, ActionId::Reload)
                .command("arc-reload"),
            "r",
        ),
        primary(
            Def::new("find", "Find in webpage", "Command+F / Ctrl+F", Cat::Actions, ActionId::Find),
            "f",
        ),
        // -- Everyday --
        primary(
            Def::new("newTab", "New tab", "Command+T / Ctrl+T", Cat::Everyday, ActionId::NewTab)
                .command("arc-new-tab"),
            "t",
        ),
        primary(
            Def::new("newWindow", "New window", "Command+N / Ctrl+N", Cat::Everyday, ActionId::NewWindow)
                .command("arc-new-window"),
            "n",
        ),
        primary_with(
            Def::new(
                "newIncognito",
                "New incognito window",
                "Command+Shift+N / Ctrl+Shift+N",
                Cat::Everyday,
                ActionId::NewIncognito,
            )
            .command("arc-new-incognito-window"),
            &["Shift"],
            "n",
        ),
        primary_with(
            Def::new(
                "littleArc",
                "Open Little Arc",
                "Command+Option+N / Ctrl+Alt+N",
                Cat::Everyday,
                ActionId::LittleArc,
            ),
            &["Alt"],
            "n",
        ),
        primary(
            Def::new("closeTab", "Close current tab", "Command+W / Ctrl+W", Cat::Everyday, ActionId::CloseTab)
                .command("arc-close-tab"),
            "w",
        ),
        primary_with(
            Def::new(
                "reopenTab",
                "Re-open last closed tab",
                "Command+Shift+T / Ctrl+Shift+T",
                Cat::Everyday,
                ActionId::ReopenTab,
            )
            .command("arc-reopen-tab"),
            &["Shift"],
            "t",
        ),
        primary(
            Def::new("pinTab", "Pin / Unpin current tab", "Command+D / Ctrl+D", Cat::Everyday, ActionId::PinTab)
                .command("arc-pin-tab"),
            "d",
        ),
        primary_with(
            Def::new(
                "copyUrl",
                "Copy current tab URL",
                "Command+Shift+C / Ctrl+Shift+C",
                Cat::Everyday,
                ActionId::CopyUrl,
            )
            .command("arc-copy-url"),
            &["Shift"],
            "c",
        ),
        primary_with(
            Def::new(
                "copyUrlMarkdown",
                "Copy URL as Markdown",
                "Command+Shift+Option+C / Ctrl+Shift+Alt+C",
                Cat::Everyday,
                ActionId::CopyUrlMarkdown,
            )
            .command("arc-copy-url-markdown"),
            &["Shift", "Alt"],
            "c",
        ),
        primary(
            Def::new(
                "changeUrl",
                "Change current tab URL",
                "Command+L / Ctrl+L",
                Cat::Everyday,
                ActionId::Unsupported(UnsupportedReason::ChangeUrl),
            ),
            "l",
        ),
        primary(
            Def::new(
                "toggleSidebar",
                "Show / Hide sidebar",
                "Command+S / Ctrl+S",
                Cat::Everyday,
                ActionId::Unsupported(UnsupportedReason::Sidebar),
            ),
            "s",
        ),
        primary_with(
            Def::new(
                "clearUnpinned",
                "Clear unpinned tabs",
                "Command+Shift+K / Ctrl+Shift+K",
                Cat::Everyday,
                ActionId::ClearUnpinned,
            ),
            &["Shift"],
            "k",
        ),
    ];

    // -- Navigation --
    for n in 1..=9usize {
        let key = n.to_string();
        table.push(primary(
            Def::new(
                format!("tab-{n}"),
                format!("Go to tab {n}"),
                format!("Command+{n} / Ctrl+{n}"),
                Cat::Navigation,
                ActionId::GoToTab,
            )
            .command(format!("arc-go-tab-{n}"))
            .tab(n - 1),
            &key,
        ));
    }

    table.push(primary(
        Def::new("go-last-tab", "Go to last tab", "Command+9 / Ctrl+9", Cat::Navigation, ActionId::GoToLastTab)
            .command("arc-go-last-tab"),
        "9",
    ));

    for n in 1..=3usize {
        let key = n.to_string();
        table.push(
            Def::new(
                format!("focusSpace{n}"),
                format!("Focus on Space {n}"),
                format!("Control+{n}"),
                Cat::Navigation,
                ActionId::FocusSpace,
            )
            .space(n - 1)
            .combo(mac(&["Control", key.as_str()])),
        );
    }

    table.extend([
        Def::new(
            "toggleRecent",
            "Toggle between recent tabs",
            "Control+Tab",
            Cat::Navigation,
            ActionId::ToggleRecent,
        )
        .command("arc-toggle-recent-tabs")
        .combo(all(&["Control", "Tab"])),
        primary_with(
            Def::new(
                "switchTabsUp",
                "Switch between tabs (Up)",
                "Command+Option+Up",
                Cat::Navigation,
                ActionId::PreviousTab,
            ),
            &["Alt"],
            "ArrowUp",
        ),
        primary_with(
            Def::new(
                "switchTabsDown",
                "Switch between tabs (Down)",
                "Command+Option+Down",
                Cat::Navigation,
                ActionId::NextTab,
            ),
            &["Alt"],
            "ArrowDown",
        ),
        primary_with(
            Def::new(
                "switchSpacesLeft",
                "Switch between spaces (Left)",
                "Command+Option+Left",
                Cat::Navigation,
                ActionId::PreviousWindow,
            ),
            &["Alt"],
            "ArrowLeft",
        ),
        primary_with(
            Def::new(
                "switchSpacesRight",
                "Switch between spaces (Right)",
                "Command+Option+Right",
                Cat::Navigation,
                ActionId::NextWindow,
            ),
            &["Alt"],
            "ArrowRight",
        ),
        Def::new(
            "historyForward",
            "Go forward on tab history",
            "Command+] / Alt+Right",
            Cat::Navigation,
            ActionId::HistoryForward,
        )
        .command("arc-history-forward")
        .combo(mac(&["Meta", "]"]))
        .combo(all(&["Alt", "ArrowRight"])),
        Def::new(
            "historyBack",
            "Go back on tab history",
            "Command+[ / Alt+Left",
            Cat::Navigation,
            ActionId::HistoryBack,
        )
        .command("arc-history-back")
        .combo(mac(&["Meta", "["]))
        .combo(all(&["Alt", "ArrowLeft"])),
        Def::new(
            "addSplitView",
            "Add Split View",
            "Control+Shift+Plus",
            Cat::Navigation,
            ActionId::Unsupported(UnsupportedReason::SplitAdd),
        )
        .combo(all(&["Control", "Shift", "+"])),
        Def::new(
            "closeSplitView",
            "Close Split View",
            "Control+Shift+Minus",
            Cat::Navigation,
            ActionId::Unsupported(UnsupportedReason::SplitClose),
        )
        .combo(all(&["Control", "Shift", "-"])),
        Def::new(
            "focusSplit",
            "Switch Split View focus",
            "Control+Shift+1/2/...",
            Cat::Navigation,
            ActionId::Unsupported(UnsupportedReason::SplitFocus),
        )
        .combo(all(&["Control", "Shift", "1"]))
        .combo(all(&["Control", "Shift", "2"]))
        .combo(all(&["Control", "Shift", "3"])),
    ]);

    table
}
