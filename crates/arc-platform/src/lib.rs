pub mod input;
pub mod keymap;
pub mod platform;
pub mod shortcuts;

pub use input::{event_to_combo_key, is_overlay_toggle, overlay_toggle_key, KeyEvent, ShortcutRegistry};
pub use keymap::{combo_to_display, normalize_combo, parse_combo, Combo, Modifier};
pub use platform::{current_platform, detect_platform, resolve_platform, Platform};
pub use shortcuts::{builtin_shortcuts, Category, ShortcutCategory, ShortcutDefinition};
