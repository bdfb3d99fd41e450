use crate::freespace::ScrapFilter;
use crate::geometry::Rect;

/// Nodes smaller than this in either dimension are marked occupied
/// outright instead of being split further, bounding the tree depth.
const MIN_NODE_DIM: i64 = 10;

/// A node of the spatial partition tree tracking occupied/free regions
/// of one sheet.
///
/// Strictly a tree: children are owned top-down, no cross-links. A node
/// is either fully occupied (`occupied`, no children), an undivided free
/// leaf, or split into 4 quadrants.
#[derive(Clone, Debug)]
pub struct SpaceNode {
    pub bbox: Rect,
    pub occupied: bool,
    pub children: Option<Box<[SpaceNode; 4]>>,
}

impl SpaceNode {
    fn new(bbox: Rect) -> Self {
        SpaceNode {
            bbox,
            occupied: false,
            children: None,
        }
    }

    /// Root node spanning the full sheet.
    pub fn new_root(sheet_width: i64, sheet_height: i64) -> Self {
        SpaceNode::new(Rect::new(0, 0, sheet_width, sheet_height))
    }

    /// Marks the region of a placed rectangle as occupied, splitting and
    /// collapsing nodes as needed.
    pub fn register(&mut self, rect: &Rect) {
        if self.occupied || !self.bbox.intersects(rect) {
            return;
        }

        if rect.contains(&self.bbox) {
            self.occupied = true;
            self.children = None;
            return;
        }

        if self.bbox.width < MIN_NODE_DIM || self.bbox.height < MIN_NODE_DIM {
            // too small to be worth splitting, occupy conservatively
            self.occupied = true;
            self.children = None;
            return;
        }

        if self.children.is_none() {
            let (split_x, split_y) = self.split_point(rect);
            let Rect {
                x,
                y,
                width,
                height,
            } = self.bbox;
            self.children = Some(Box::new([
                SpaceNode::new(Rect::new(x, y, split_x, split_y)),
                SpaceNode::new(Rect::new(x + split_x, y, width - split_x, split_y)),
                SpaceNode::new(Rect::new(x, y + split_y, split_x, height - split_y)),
                SpaceNode::new(Rect::new(
                    x + split_x,
                    y + split_y,
                    width - split_x,
                    height - split_y,
                )),
            ]));
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.register(rect);
            }
            if children.iter().all(|c| c.occupied) {
                self.occupied = true;
                self.children = None;
            }
        }
    }

    /// Split offsets relative to the node origin: at the rectangle's
    /// crossing boundary when it intersects the node, a half-split
    /// otherwise, clamped so each quadrant keeps at least 1 unit.
    fn split_point(&self, rect: &Rect) -> (i64, i64) {
        let bbox = &self.bbox;

        let mut split_x = bbox.width / 2;
        if rect.x > bbox.x && rect.x < bbox.right() {
            split_x = rect.x - bbox.x;
        } else if rect.right() > bbox.x && rect.right() < bbox.right() {
            split_x = rect.right() - bbox.x;
        }

        let mut split_y = bbox.height / 2;
        if rect.y > bbox.y && rect.y < bbox.bottom() {
            split_y = rect.y - bbox.y;
        } else if rect.bottom() > bbox.y && rect.bottom() < bbox.bottom() {
            split_y = rect.bottom() - bbox.y;
        }

        (
            split_x.clamp(1, bbox.width - 1),
            split_y.clamp(1, bbox.height - 1),
        )
    }

    /// Appends every unoccupied, childless leaf admitted by `filter`.
    pub fn collect_free(&self, filter: ScrapFilter, out: &mut Vec<Rect>) {
        if self.occupied {
            return;
        }
        match &self.children {
            None => {
                if filter.admits(self.bbox.width, self.bbox.height) {
                    out.push(self.bbox);
                }
            }
            Some(children) => {
                for child in children.iter() {
                    child.collect_free(filter, out);
                }
            }
        }
    }

    #[cfg(test)]
    fn free_area(&self, filter: ScrapFilter) -> i64 {
        let mut rects = Vec::new();
        self.collect_free(filter, &mut rects);
        rects.iter().map(Rect::area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_rect_occupies_root() {
        let mut root = SpaceNode::new_root(4000, 4000);
        root.register(&Rect::new(0, 0, 4000, 4000));
        assert!(root.occupied);
        assert!(root.children.is_none());
        assert_eq!(root.free_area(ScrapFilter::default()), 0);
    }

    #[test]
    fn partial_rect_splits_at_its_boundary() {
        let mut root = SpaceNode::new_root(4000, 4000);
        root.register(&Rect::new(0, 0, 1000, 4000));

        let mut free = Vec::new();
        root.collect_free(ScrapFilter::default(), &mut free);
        // everything right of x=1000 stays free
        assert!(free.iter().all(|r| r.x >= 1000));
        assert_eq!(free.iter().map(Rect::area).sum::<i64>(), 3000 * 4000);
    }

    #[test]
    fn fully_painted_quadrants_collapse() {
        let mut root = SpaceNode::new_root(4000, 4000);
        root.register(&Rect::new(0, 0, 2000, 4000));
        root.register(&Rect::new(2000, 0, 2000, 4000));
        assert!(root.occupied);
        assert!(root.children.is_none());
    }

    #[test]
    fn tiny_nodes_occupy_without_splitting() {
        let mut root = SpaceNode::new_root(4000, 4000);
        // leaves a free sliver of 5x4000 on the right
        root.register(&Rect::new(0, 0, 3995, 4000));
        assert_eq!(root.free_area(ScrapFilter::default()), 5 * 4000);

        // partially crossing the narrow node occupies it in full
        root.register(&Rect::new(3990, 0, 10, 1000));
        assert_eq!(root.free_area(ScrapFilter::default()), 5 * 2000);
    }

    #[test]
    fn filter_applies_to_leaves() {
        let mut root = SpaceNode::new_root(4000, 4000);
        root.register(&Rect::new(0, 0, 1000, 4000));
        let mut free = Vec::new();
        root.collect_free(ScrapFilter::new(5000, 1), &mut free);
        assert!(free.is_empty());
    }
}
