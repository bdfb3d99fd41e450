//! Free-space computation for a single sheet.
//!
//! Two interchangeable algorithms, selected by sheet size: a recursive
//! spatial partition tree for large sheets (cheap to maintain, coarse),
//! and a per-unit-cell occupancy bitmap with a histogram sweep for all
//! other sheets (exhaustive, enumerates overlapping candidates). Results
//! feed area statistics and relocation candidate lists, never placement
//! correctness.

mod bitmap;
mod space_tree;

pub use bitmap::OccupancyBitmap;
pub use space_tree::SpaceNode;

use crate::geometry::Rect;

/// Sheets with either dimension above this use the spatial partition tree;
/// the bitmap would be too large to sweep per unit cell.
pub const LARGE_SHEET_THRESHOLD: i64 = 3000;

/// Minimum-usable-size policy for leftover material, tolerant to a 90
/// degree rotation of the scrap piece.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrapFilter {
    pub min_width: i64,
    pub min_height: i64,
}

impl ScrapFilter {
    pub fn new(min_width: i64, min_height: i64) -> Self {
        ScrapFilter {
            min_width,
            min_height,
        }
    }

    /// `true` iff a `w x h` piece meets the minimum size in either
    /// orientation.
    #[inline(always)]
    pub fn admits(&self, w: i64, h: i64) -> bool {
        (w >= self.min_width && h >= self.min_height)
            || (w >= self.min_height && h >= self.min_width)
    }
}

/// Free-space tracker for one sheet, dispatching to the algorithm
/// appropriate for its size. Both variants support incremental
/// registration of placed rectangles.
#[derive(Clone, Debug)]
pub enum SheetFreeSpace {
    Tree(SpaceNode),
    Bitmap(OccupancyBitmap),
}

impl SheetFreeSpace {
    pub fn for_sheet(sheet_width: i64, sheet_height: i64) -> Self {
        if sheet_width > LARGE_SHEET_THRESHOLD || sheet_height > LARGE_SHEET_THRESHOLD {
            SheetFreeSpace::Tree(SpaceNode::new_root(sheet_width, sheet_height))
        } else {
            SheetFreeSpace::Bitmap(OccupancyBitmap::new(sheet_width, sheet_height))
        }
    }

    /// Marks the region of a placed rectangle as occupied.
    pub fn register(&mut self, rect: &Rect) {
        match self {
            SheetFreeSpace::Tree(root) => root.register(rect),
            SheetFreeSpace::Bitmap(bitmap) => bitmap.paint(rect),
        }
    }

    /// All free rectangles admitted by `filter`.
    pub fn free_rects(&self, filter: ScrapFilter) -> Vec<Rect> {
        match self {
            SheetFreeSpace::Tree(root) => {
                let mut out = Vec::new();
                root.collect_free(filter, &mut out);
                out
            }
            SheetFreeSpace::Bitmap(bitmap) => bitmap.free_rects(filter),
        }
    }
}

/// One-shot free-space computation for a sheet with the given placed
/// rectangles.
pub fn free_rects_of_sheet(
    sheet_width: i64,
    sheet_height: i64,
    placed: &[Rect],
    filter: ScrapFilter,
) -> Vec<Rect> {
    let mut space = SheetFreeSpace::for_sheet(sheet_width, sheet_height);
    for rect in placed {
        space.register(rect);
    }
    space.free_rects(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_rotation_tolerant() {
        let filter = ScrapFilter::new(30, 10);
        assert!(filter.admits(30, 10));
        assert!(filter.admits(10, 30));
        assert!(!filter.admits(20, 20));
        assert!(ScrapFilter::default().admits(1, 1));
    }

    #[test]
    fn dispatch_follows_sheet_size() {
        assert!(matches!(
            SheetFreeSpace::for_sheet(3001, 100),
            SheetFreeSpace::Tree(_)
        ));
        assert!(matches!(
            SheetFreeSpace::for_sheet(100, 4000),
            SheetFreeSpace::Tree(_)
        ));
        assert!(matches!(
            SheetFreeSpace::for_sheet(3000, 3000),
            SheetFreeSpace::Bitmap(_)
        ));
    }

    #[test]
    fn empty_sheet_reports_free_area() {
        let free = free_rects_of_sheet(100, 80, &[], ScrapFilter::default());
        // bitmap mode: the full sheet must be among the candidates
        assert!(free.contains(&Rect::new(0, 0, 100, 80)));

        let free = free_rects_of_sheet(4000, 80, &[], ScrapFilter::default());
        // tree mode: an empty root is a single free leaf
        assert_eq!(free, vec![Rect::new(0, 0, 4000, 80)]);
    }
}
