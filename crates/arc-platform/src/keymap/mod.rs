//! Combo tokens: canonical normalization, parsing and display.

mod display;
mod normalize;
mod parse;
mod types;

pub use display::combo_to_display;
pub use normalize::{normalize_combo, split_combo_key};
pub use parse::parse_combo;
pub use types::{Combo, Modifier};
