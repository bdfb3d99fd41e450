use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A part as placed on a sheet.
///
/// `width`/`height` are the as-placed dimensions (swapped when
/// `rotation` is set); `original_width`/`original_height` always carry
/// the catalog values. `sheet` is a dense 0-based sheet index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: usize,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub rotation: bool,
    pub sheet: usize,
    pub original_width: i64,
    pub original_height: i64,
}

impl Placement {
    /// The sheet region occupied by this placement.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
