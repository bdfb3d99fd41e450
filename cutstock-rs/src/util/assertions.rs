//! Checks on layouts and orderings that are too expensive to run in
//! release builds. Used by `debug_assert!` in the engine and directly by
//! tests.

use crate::entities::{PartCatalog, Placement};

/// `true` iff `genes` contains every id in `0..n` exactly once.
pub fn is_permutation(genes: &[usize], n: usize) -> bool {
    if genes.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &id in genes {
        if id >= n || seen[id] {
            return false;
        }
        seen[id] = true;
    }
    true
}

/// `true` iff no two placements on the same sheet overlap.
pub fn no_overlaps(placements: &[Placement]) -> bool {
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.sheet == b.sheet && a.rect().intersects(&b.rect()) {
                return false;
            }
        }
    }
    true
}

/// `true` iff every placement lies fully within the sheet bounds and its
/// dimensions match its part's, up to a rotation consistent with the flag.
pub fn placements_match_catalog(placements: &[Placement], catalog: &PartCatalog) -> bool {
    placements.iter().all(|p| {
        let part = match catalog.parts.get(p.id) {
            Some(part) => part,
            None => return false,
        };
        let dims_ok = (p.width, p.height) == part.dims(p.rotation);
        let originals_ok = p.original_width == part.width && p.original_height == part.height;
        let in_bounds = p.x >= 0
            && p.y >= 0
            && p.x + p.width <= catalog.sheet_width
            && p.y + p.height <= catalog.sheet_height;
        dims_ok && originals_ok && in_bounds
    })
}
