//! Keyboard capture and shortcut resolution.

mod key_event;
mod registry;

pub use key_event::{event_to_combo_key, is_overlay_toggle, overlay_toggle_key, KeyEvent};
pub use registry::ShortcutRegistry;
