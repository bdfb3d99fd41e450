//! Greedy guillotine decoder: turns an ordering of part ids into an
//! actual layout.
//!
//! Deterministic, single pass, no backtracking. The per-rectangle greedy
//! choice is deliberately local, the genetic search compensates by
//! exploring orderings.

use anyhow::{Result, ensure};

use crate::entities::{Part, PartCatalog, Placement};
use crate::freespace::ScrapFilter;
use crate::geometry::Rect;
use crate::util::assertions;

/// Decodes `genes` (a permutation of part ids, in placement priority
/// order) into a complete layout.
///
/// A new sheet is opened only when no remaining part fits any free
/// rectangle of the current sheet. Per sheet, free rectangles are scanned
/// in descending-area order; the first rectangle any part fits receives
/// the part with the lowest combined score, the rectangle is guillotine
/// split, and the scan restarts.
pub fn decode(catalog: &PartCatalog, genes: &[usize], filter: ScrapFilter) -> Result<Vec<Placement>> {
    debug_assert!(assertions::is_permutation(genes, catalog.n_parts()));

    let mut unplaced: Vec<&Part> = genes.iter().map(|&id| &catalog.parts[id]).collect();
    let mut placements = Vec::with_capacity(unplaced.len());
    let mut sheet_index = 0;

    while !unplaced.is_empty() {
        let mut spaces = vec![Rect::new(0, 0, catalog.sheet_width, catalog.sheet_height)];
        let placed_before = placements.len();

        let mut placed_in_sheet = true;
        while placed_in_sheet {
            placed_in_sheet = false;
            spaces.sort_by_key(|s| std::cmp::Reverse(s.area()));

            if let Some((space_idx, unplaced_idx, rotated)) = find_best_fit(&spaces, &unplaced) {
                let space = spaces[space_idx];
                let part = unplaced.remove(unplaced_idx);
                let (w, h) = part.dims(rotated);
                placements.push(Placement {
                    id: part.id,
                    x: space.x,
                    y: space.y,
                    width: w,
                    height: h,
                    rotation: rotated,
                    sheet: sheet_index,
                    original_width: part.width,
                    original_height: part.height,
                });
                split_space(&mut spaces, space_idx, w, h, filter);
                placed_in_sheet = true;
            }
        }

        // catalog validation guarantees every part fits an empty sheet
        ensure!(
            placements.len() > placed_before,
            "no part fits an empty {}x{} sheet, layout aborted",
            catalog.sheet_width,
            catalog.sheet_height
        );
        sheet_index += 1;
    }

    debug_assert!(assertions::no_overlaps(&placements));
    Ok(placements)
}

/// Scans the free rectangles in order and returns, for the first one any
/// part fits, `(space index, unplaced index, rotated)` of the part with
/// the strictly lowest combined score. The unrotated orientation wins
/// score ties, as does the earlier part in the ordering.
fn find_best_fit(spaces: &[Rect], unplaced: &[&Part]) -> Option<(usize, usize, bool)> {
    for (space_idx, space) in spaces.iter().enumerate() {
        let mut best: Option<(f64, usize, bool)> = None;
        for (idx, part) in unplaced.iter().enumerate() {
            for rotated in [false, true] {
                let (w, h) = part.dims(rotated);
                if w <= space.width && h <= space.height {
                    let area_loss = ((space.width - w) * (space.height - h)) as f64;
                    let fit_score = (space.width - w).min(space.height - h) as f64;
                    let corner_preference = if space.x == 0 || space.y == 0 { 0.9 } else { 1.0 };
                    let combined = area_loss * corner_preference + fit_score * 0.1;
                    if best.is_none_or(|(score, _, _)| combined < score) {
                        best = Some((combined, idx, rotated));
                    }
                }
            }
        }
        if let Some((_, idx, rotated)) = best {
            return Some((space_idx, idx, rotated));
        }
    }
    None
}

/// Replaces the used free rectangle with the remainders of a guillotine
/// cut around the placed `w x h` part, then merges and re-sorts the list.
///
/// The horizontal cut leaves a right strip of the part's height plus a
/// full-width bottom strip; the vertical cut leaves a part-width bottom
/// strip plus a full-height right strip. The cut producing more remainders
/// admitted by `filter` wins; ties go to the cut with the smaller
/// sub-minimum remainder area, horizontal when those are equal too.
fn split_space(spaces: &mut Vec<Rect>, used: usize, w: i64, h: i64, filter: ScrapFilter) {
    let space = spaces.remove(used);
    let rem_w = space.width - w;
    let rem_h = space.height - h;

    let h_right_useful = filter.admits(rem_w, h);
    let h_bottom_useful = filter.admits(space.width, rem_h);
    let mut horizontal_useful = 0;
    if rem_w > 0 && h_right_useful {
        horizontal_useful += 1;
    }
    if rem_h > 0 && h_bottom_useful {
        horizontal_useful += 1;
    }

    let v_right_useful = filter.admits(rem_w, space.height);
    let v_bottom_useful = filter.admits(w, rem_h);
    let mut vertical_useful = 0;
    if rem_h > 0 && v_bottom_useful {
        vertical_useful += 1;
    }
    if rem_w > 0 && v_right_useful {
        vertical_useful += 1;
    }

    let use_horizontal = if horizontal_useful == vertical_useful {
        let mut waste_h = 0;
        if rem_w > 0 && !h_right_useful {
            waste_h += rem_w * h;
        }
        if rem_h > 0 && !h_bottom_useful {
            waste_h += rem_h * space.width;
        }
        let mut waste_v = 0;
        if rem_h > 0 && !v_bottom_useful {
            waste_v += rem_h * w;
        }
        if rem_w > 0 && !v_right_useful {
            waste_v += rem_w * space.height;
        }
        waste_h <= waste_v
    } else {
        horizontal_useful > vertical_useful
    };

    if use_horizontal {
        if rem_w > 0 {
            spaces.push(Rect::new(space.x + w, space.y, rem_w, h));
        }
        if rem_h > 0 {
            spaces.push(Rect::new(space.x, space.y + h, space.width, rem_h));
        }
    } else {
        if rem_h > 0 {
            spaces.push(Rect::new(space.x, space.y + h, w, rem_h));
        }
        if rem_w > 0 {
            spaces.push(Rect::new(space.x + w, space.y, rem_w, space.height));
        }
    }

    merge_spaces(spaces);
    spaces.sort_by_key(|s| s.y * 10_000 + s.x);
}

/// Repeatedly drops contained rectangles and merges edge-adjacent pairs
/// with a matching dimension, until a full sweep changes nothing.
fn merge_spaces(spaces: &mut Vec<Rect>) {
    let mut merged = true;
    while merged && spaces.len() > 1 {
        merged = false;
        'sweep: for i in 0..spaces.len() {
            for j in i + 1..spaces.len() {
                if spaces[i].contains(&spaces[j]) {
                    spaces.remove(j);
                    merged = true;
                    break 'sweep;
                }
                if spaces[j].contains(&spaces[i]) {
                    spaces.remove(i);
                    merged = true;
                    break 'sweep;
                }
                if let Some(joined) = Rect::try_merge(spaces[i], spaces[j]) {
                    spaces[i] = joined;
                    spaces.remove(j);
                    merged = true;
                    break 'sweep;
                }
            }
        }
    }
}
