use ndarray::Array2;

use crate::freespace::ScrapFilter;
use crate::geometry::Rect;

/// Per-unit-cell occupancy grid of one sheet, row-major `(y, x)`.
#[derive(Clone, Debug)]
pub struct OccupancyBitmap {
    cells: Array2<bool>,
    sheet_width: i64,
    sheet_height: i64,
}

impl OccupancyBitmap {
    pub fn new(sheet_width: i64, sheet_height: i64) -> Self {
        OccupancyBitmap {
            cells: Array2::from_elem((sheet_height as usize, sheet_width as usize), false),
            sheet_width,
            sheet_height,
        }
    }

    /// Marks all cells of a placed rectangle as occupied, clamped to the
    /// sheet bounds.
    pub fn paint(&mut self, rect: &Rect) {
        let x_min = rect.x.max(0) as usize;
        let y_min = rect.y.max(0) as usize;
        let x_max = rect.right().min(self.sheet_width) as usize;
        let y_max = rect.bottom().min(self.sheet_height) as usize;
        for y in y_min..y_max {
            for x in x_min..x_max {
                self.cells[(y, x)] = true;
            }
        }
    }

    /// Enumerates free rectangles via a row-by-row histogram sweep.
    ///
    /// For every row, per-column run heights of consecutive free cells
    /// are maintained; every maximal nonzero run contributes a candidate
    /// for each sub-width, anchored at the run start. Candidates overlap
    /// by design, which is acceptable for the statistics and relocation
    /// consumers of this list.
    pub fn free_rects(&self, filter: ScrapFilter) -> Vec<Rect> {
        let width = self.sheet_width as usize;
        let height = self.sheet_height as usize;

        let mut rects = Vec::new();
        let mut run_heights = vec![0i64; width];

        for y in 0..height {
            for x in 0..width {
                run_heights[x] = match self.cells[(y, x)] {
                    true => 0,
                    false => run_heights[x] + 1,
                };
            }

            for x1 in 0..width {
                if run_heights[x1] == 0 {
                    continue;
                }
                let mut min_height = run_heights[x1];
                let mut x2 = x1;
                while x2 < width && run_heights[x2] > 0 {
                    min_height = min_height.min(run_heights[x2]);
                    let w = (x2 - x1 + 1) as i64;
                    if filter.admits(w, min_height) {
                        rects.push(Rect::new(
                            x1 as i64,
                            y as i64 - min_height + 1,
                            w,
                            min_height,
                        ));
                    }
                    x2 += 1;
                }
            }
        }

        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sheet_contains_full_rect_candidate() {
        let bitmap = OccupancyBitmap::new(20, 10);
        let rects = bitmap.free_rects(ScrapFilter::default());
        assert!(rects.contains(&Rect::new(0, 0, 20, 10)));
    }

    #[test]
    fn fully_painted_sheet_has_no_free_rects() {
        let mut bitmap = OccupancyBitmap::new(20, 10);
        bitmap.paint(&Rect::new(0, 0, 20, 10));
        assert!(bitmap.free_rects(ScrapFilter::default()).is_empty());
    }

    #[test]
    fn candidates_stay_clear_of_painted_region() {
        let mut bitmap = OccupancyBitmap::new(20, 10);
        bitmap.paint(&Rect::new(0, 0, 10, 10));
        let occupied = Rect::new(0, 0, 10, 10);
        let rects = bitmap.free_rects(ScrapFilter::default());
        assert!(!rects.is_empty());
        assert!(rects.iter().all(|r| !r.intersects(&occupied)));
        // the full remaining half must be found
        assert!(rects.contains(&Rect::new(10, 0, 10, 10)));
    }

    #[test]
    fn filter_admits_swapped_candidates() {
        let mut bitmap = OccupancyBitmap::new(20, 10);
        bitmap.paint(&Rect::new(0, 0, 20, 4));
        // remaining strip is 20x6; a 6x15 minimum only matches rotated
        let rects = bitmap.free_rects(ScrapFilter::new(6, 15));
        assert!(!rects.is_empty());
        assert!(rects.iter().all(|r| r.width >= 15 && r.height == 6));
    }

    #[test]
    fn paint_is_clamped_to_bounds() {
        let mut bitmap = OccupancyBitmap::new(10, 10);
        bitmap.paint(&Rect::new(5, 5, 100, 100));
        let rects = bitmap.free_rects(ScrapFilter::default());
        assert!(rects.contains(&Rect::new(0, 0, 10, 5)));
        assert!(rects.contains(&Rect::new(0, 0, 5, 10)));
    }
}
