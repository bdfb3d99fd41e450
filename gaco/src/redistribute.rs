//! Post-search consolidation: migrates parts from later sheets into the
//! free space of earlier sheets, dropping sheets that empty out.

use std::cmp::Reverse;

use cutstock_rs::entities::{PartCatalog, Placement};
use cutstock_rs::freespace::{ScrapFilter, SheetFreeSpace};
use cutstock_rs::geometry::Rect;
use itertools::Itertools;
use log::info;

/// Layouts with fewer placements than this are left untouched.
const MIN_PLACEMENTS: usize = 10;
/// Upper bound on earlier sheets tracked as relocation targets.
const MAX_SHEETS_ANALYZED: usize = 50;
/// Number of free rectangles cached per target sheet, largest first.
const TOP_FREE_RECTS: usize = 20;
/// Free rectangles narrower than this in either dimension are skipped.
const MIN_RELOCATE_DIM: i64 = 10;
/// Maximum number of full passes over the sheets.
const MAX_PASSES: usize = 5;

/// Moves parts from high-numbered sheets into earlier sheets' free space.
///
/// Runs up to [`MAX_PASSES`] passes, each scanning sheets from the highest
/// index down to 1. A part relocates to the first cached free rectangle of
/// the lowest-numbered earlier sheet it fits, rotated if only that
/// orientation fits. A sheet that empties out is dropped and all higher
/// sheet indices shift down. A pass without a single move ends the loop.
pub fn redistribute(
    catalog: &PartCatalog,
    mut placements: Vec<Placement>,
    filter: ScrapFilter,
) -> Vec<Placement> {
    if placements.len() < MIN_PLACEMENTS {
        return placements;
    }
    let mut max_sheet = placements.iter().map(|p| p.sheet).max().unwrap_or(0);
    if max_sheet == 0 {
        return placements;
    }

    // per-sheet lists of indices into `placements`
    let mut sheet_details: Vec<Vec<usize>> = vec![Vec::new(); max_sheet + 1];
    for (idx, p) in placements.iter().enumerate() {
        sheet_details[p.sheet].push(idx);
    }

    let sheets_analyzed = max_sheet.min(MAX_SHEETS_ANALYZED);
    let mut trackers: Vec<SheetFreeSpace> = Vec::with_capacity(sheets_analyzed);
    let mut free_by_sheet: Vec<Vec<Rect>> = Vec::with_capacity(sheets_analyzed);
    for sheet in 0..sheets_analyzed {
        let mut tracker = SheetFreeSpace::for_sheet(catalog.sheet_width, catalog.sheet_height);
        for &idx in &sheet_details[sheet] {
            tracker.register(&placements[idx].rect());
        }
        free_by_sheet.push(top_free_rects(&tracker, filter));
        trackers.push(tracker);
    }

    let initial_sheets = max_sheet + 1;
    let mut moved = true;
    let mut passes = 0;
    while moved && passes < MAX_PASSES {
        moved = false;
        passes += 1;

        let mut sheet = max_sheet;
        while sheet > 0 {
            for idx in sheet_details[sheet].clone() {
                let (w, h) = (placements[idx].width, placements[idx].height);

                'targets: for target in 0..sheet.min(trackers.len()) {
                    for space_idx in 0..free_by_sheet[target].len() {
                        let space = free_by_sheet[target][space_idx];
                        if space.width < MIN_RELOCATE_DIM || space.height < MIN_RELOCATE_DIM {
                            continue;
                        }
                        let rotated = if w <= space.width && h <= space.height {
                            false
                        } else if h <= space.width && w <= space.height {
                            true
                        } else {
                            continue;
                        };

                        let p = &mut placements[idx];
                        if rotated {
                            std::mem::swap(&mut p.width, &mut p.height);
                            p.rotation = !p.rotation;
                        }
                        p.sheet = target;
                        p.x = space.x;
                        p.y = space.y;

                        sheet_details[sheet].retain(|&i| i != idx);
                        sheet_details[target].push(idx);

                        let rect = placements[idx].rect();
                        trackers[target].register(&rect);
                        free_by_sheet[target] = top_free_rects(&trackers[target], filter);

                        moved = true;
                        break 'targets;
                    }
                }
            }

            if sheet_details[sheet].is_empty() {
                for upper in sheet + 1..=max_sheet {
                    for &idx in &sheet_details[upper] {
                        placements[idx].sheet -= 1;
                    }
                }
                sheet_details.remove(sheet);
                if sheet < trackers.len() {
                    trackers.remove(sheet);
                    free_by_sheet.remove(sheet);
                }
                max_sheet -= 1;
            }
            sheet -= 1;
        }
    }

    if max_sheet + 1 < initial_sheets {
        info!(
            "[REDIST] consolidated {} sheets down to {}",
            initial_sheets,
            max_sheet + 1
        );
    }
    placements
}

fn top_free_rects(tracker: &SheetFreeSpace, filter: ScrapFilter) -> Vec<Rect> {
    tracker
        .free_rects(filter)
        .into_iter()
        .sorted_by_cached_key(|r| Reverse(r.area()))
        .take(TOP_FREE_RECTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutstock_rs::util::assertions;

    fn placement(id: usize, x: i64, y: i64, w: i64, h: i64, sheet: usize) -> Placement {
        Placement {
            id,
            x,
            y,
            width: w,
            height: h,
            rotation: false,
            sheet,
            original_width: w,
            original_height: h,
        }
    }

    fn catalog(n: usize) -> PartCatalog {
        PartCatalog::new(100, 100, &vec![(50, 20); n]).unwrap()
    }

    /// Left half of each of two sheets filled with 50x20 strips.
    fn two_half_filled_sheets() -> Vec<Placement> {
        (0..10)
            .map(|i| placement(i, 0, (i as i64 % 5) * 20, 50, 20, i / 5))
            .collect()
    }

    #[test]
    fn small_layouts_are_left_untouched() {
        let placements = vec![
            placement(0, 0, 0, 50, 20, 0),
            placement(1, 0, 0, 50, 20, 1),
        ];
        let result = redistribute(&catalog(2), placements.clone(), ScrapFilter::default());
        assert_eq!(result, placements);
    }

    #[test]
    fn single_sheet_layouts_are_left_untouched() {
        let placements: Vec<_> = (0..10)
            .map(|i| placement(i, 0, 0, 50, 20, 0))
            .collect();
        let result = redistribute(&catalog(10), placements.clone(), ScrapFilter::default());
        assert_eq!(result, placements);
    }

    #[test]
    fn consolidates_two_half_filled_sheets_into_one() {
        let placements = two_half_filled_sheets();
        let result = redistribute(&catalog(10), placements, ScrapFilter::default());

        assert_eq!(result.len(), 10);
        assert!(result.iter().all(|p| p.sheet == 0));
        assert!(assertions::no_overlaps(&result));
    }

    #[test]
    fn never_increases_sheet_count_and_conserves_parts() {
        let placements = two_half_filled_sheets();
        let sheets_before = placements.iter().map(|p| p.sheet).max().unwrap() + 1;
        let result = redistribute(&catalog(10), placements, ScrapFilter::default());

        let sheets_after = result.iter().map(|p| p.sheet).max().unwrap() + 1;
        assert!(sheets_after <= sheets_before);
        let mut ids: Vec<_> = result.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn rotates_parts_that_only_fit_sideways() {
        // sheet 0 leaves a 100x30 strip at the bottom; the 20x90 part on
        // sheet 1 fits it only after rotation
        let mut placements: Vec<_> = (0..9)
            .map(|i| placement(i, (i as i64 % 3) * 34, (i as i64 / 3) * 24, 30, 22, 0))
            .collect();
        placements.push(placement(9, 0, 0, 20, 90, 1));
        let result = redistribute(
            &PartCatalog::new(
                100,
                100,
                &[
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (30, 22),
                    (20, 90),
                ],
            )
            .unwrap(),
            placements,
            ScrapFilter::default(),
        );

        let moved = result.iter().find(|p| p.id == 9).unwrap();
        assert_eq!(moved.sheet, 0);
        assert!(moved.rotation);
        assert_eq!((moved.width, moved.height), (90, 20));
        assert!(assertions::no_overlaps(&result));
    }
}
