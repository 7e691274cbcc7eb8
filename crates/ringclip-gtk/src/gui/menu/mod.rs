use radial::ItemId;

pub mod model;
pub mod view;

pub use model::MenuView;
pub use view::draw;

pub const TICK_MS: u64 = 16;
pub const LABEL_CHARS: usize = 10;
pub const LABEL_FONT_SIZE: f64 = 11.0;
pub const BADGE_FONT_SIZE: f64 = 12.0;
pub const BADGE_DISTANCE: f64 = 0.95; // past the ring, relative to item size
pub const BAND_WIDTH: f64 = 0.9; // zone band thickness relative to item size
pub const GHOST_ALPHA: f64 = 0.6;
pub const INDICATOR_WIDTH: f64 = 4.0;

/// Glyph drawn on a pinned control slot.
pub fn control_glyph(id: &ItemId) -> &str {
    match id.as_str() {
        "menu" => "☰",
        "add" => "+",
        "prev" => "‹",
        "next" => "›",
        "config" => "⚙",
        other => other,
    }
}
