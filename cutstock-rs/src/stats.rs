//! Area and scrap statistics of a finished layout.

use itertools::Itertools;
use log::trace;

use crate::entities::{PartCatalog, Placement};
use crate::freespace::{ScrapFilter, free_rects_of_sheet};

/// Aggregated metrics of one layout. All areas in sheet units squared,
/// `efficiency` in percent.
#[derive(Clone, Debug, PartialEq)]
pub struct CutStats {
    pub sheets_count: usize,
    pub total_area: i64,
    pub used_area: i64,
    pub waste_area: i64,
    pub efficiency: f64,
    pub usable_scrap: i64,
}

/// Computes the statistics of `placements` on the catalog's sheet size.
///
/// `usable_scrap` sums the free rectangles of every sheet that pass the
/// minimum-size filter. In bitmap mode those candidates overlap, so the
/// sum is clamped to never exceed `waste_area`.
pub fn collect_stats(
    catalog: &PartCatalog,
    placements: &[Placement],
    filter: ScrapFilter,
) -> CutStats {
    if placements.is_empty() {
        return CutStats {
            sheets_count: 0,
            total_area: 0,
            used_area: 0,
            waste_area: 0,
            efficiency: 0.0,
            usable_scrap: 0,
        };
    }

    let used_area: i64 = placements.iter().map(|p| p.width * p.height).sum();
    let max_sheet = placements.iter().map(|p| p.sheet).max().unwrap_or(0);
    let sheets_count = max_sheet + 1;

    let by_sheet = placements
        .iter()
        .map(|p| (p.sheet, p.rect()))
        .into_group_map();

    let mut usable_scrap: i64 = (0..sheets_count)
        .map(|sheet| {
            let placed = by_sheet.get(&sheet).map_or(&[][..], Vec::as_slice);
            let scrap =
                free_rects_of_sheet(catalog.sheet_width, catalog.sheet_height, placed, filter)
                    .iter()
                    .map(|r| r.area())
                    .sum::<i64>();
            trace!("sheet {sheet}: {scrap} usable scrap area");
            scrap
        })
        .sum();

    let total_area = sheets_count as i64 * catalog.sheet_area();
    let waste_area = total_area - used_area;
    let efficiency = if total_area > 0 {
        used_area as f64 / total_area as f64 * 100.0
    } else {
        0.0
    };
    usable_scrap = usable_scrap.min(waste_area);

    CutStats {
        sheets_count,
        total_area,
        used_area,
        waste_area,
        efficiency,
        usable_scrap,
    }
}
