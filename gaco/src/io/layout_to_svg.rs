use cutstock_rs::entities::{PartCatalog, Placement};
use svg::Document;
use svg::node::element::{Group, Rectangle, Title};

const PART_FILLS: [&str; 8] = [
    "#8BC34A", "#03A9F4", "#FFC107", "#E91E63", "#9C27B0", "#FF5722", "#009688", "#CDDC39",
];

/// Renders one sheet of a layout: the sheet outline plus every placement
/// on it, each titled with its part id and as-placed dimensions.
pub fn sheet_to_svg(catalog: &PartCatalog, placements: &[Placement], sheet: usize) -> Document {
    let (sheet_w, sheet_h) = (catalog.sheet_width, catalog.sheet_height);
    let stroke_width = (sheet_w.min(sheet_h) as f64 * 0.002).max(0.5);
    let margin = sheet_w.max(sheet_h) as f64 * 0.025;

    let sheet_group = Group::new()
        .set("id", format!("sheet_{sheet}"))
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", sheet_w)
                .set("height", sheet_h)
                .set("fill", "#FAFAFA")
                .set("stroke", "black")
                .set("stroke-width", 2.0 * stroke_width),
        )
        .add(Title::new(format!("sheet {sheet}, {sheet_w}x{sheet_h}")));

    let mut parts_group = Group::new().set("id", "parts");
    for p in placements.iter().filter(|p| p.sheet == sheet) {
        let title = Title::new(format!(
            "part, id: {}, {}x{}{}",
            p.id,
            p.width,
            p.height,
            if p.rotation { ", rotated" } else { "" }
        ));
        parts_group = parts_group.add(
            Rectangle::new()
                .set("x", p.x)
                .set("y", p.y)
                .set("width", p.width)
                .set("height", p.height)
                .set("fill", PART_FILLS[p.id % PART_FILLS.len()])
                .set("fill-opacity", "0.85")
                .set("stroke", "black")
                .set("stroke-width", stroke_width)
                .add(title),
        );
    }

    Document::new()
        .set(
            "viewBox",
            (
                -margin,
                -margin,
                sheet_w as f64 + 2.0 * margin,
                sheet_h as f64 + 2.0 * margin,
            ),
        )
        .add(sheet_group)
        .add(parts_group)
}
