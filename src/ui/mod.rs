pub mod field;
pub mod render;
pub mod terminal;

pub use field::{compute_field_grid, glyph_at, AGENT, EMPTY, OBSTACLE};
pub use render::{draw_ui, hud_line};
pub use terminal::{setup_or_restore, FramePacer};
