//! Command overlay: searchable shortcut and tab lists.

mod controller;
mod state;
pub mod types;

pub use controller::OverlayController;
pub use types::OverlayStatus;
