/// Axis-aligned rectangle with integer coordinates, anchored at its
/// top-left corner. Doubles as the free-rectangle record of the engine.
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[inline(always)]
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    #[inline(always)]
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    #[inline(always)]
    pub fn area(&self) -> i64 {
        self.width * self.height
    }

    /// `true` iff the interiors of `self` and `other` overlap.
    /// Touching edges do not count as an intersection.
    #[inline(always)]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// `true` iff `other` lies entirely within `self` (edges included).
    #[inline(always)]
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Merges two edge-adjacent rectangles that share a matching dimension:
    /// same y and height with abutting x-ranges, or same x and width with
    /// abutting y-ranges. Returns `None` for any other pair.
    pub fn try_merge(a: Rect, b: Rect) -> Option<Rect> {
        if a.y == b.y && a.height == b.height {
            if a.right() == b.x {
                return Some(Rect::new(a.x, a.y, a.width + b.width, a.height));
            }
            if b.right() == a.x {
                return Some(Rect::new(b.x, b.y, b.width + a.width, b.height));
            }
        }
        if a.x == b.x && a.width == b.width {
            if a.bottom() == b.y {
                return Some(Rect::new(a.x, a.y, a.width, a.height + b.height));
            }
            if b.bottom() == a.y {
                return Some(Rect::new(b.x, b.y, b.width, b.height + a.height));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
    }

    #[test]
    fn containment_includes_edges() {
        let outer = Rect::new(0, 0, 10, 10);
        assert!(outer.contains(&Rect::new(0, 0, 10, 10)));
        assert!(outer.contains(&Rect::new(2, 3, 4, 5)));
        assert!(!outer.contains(&Rect::new(5, 5, 10, 2)));
    }

    #[test]
    fn merge_requires_matching_dimension_and_adjacency() {
        let a = Rect::new(0, 0, 5, 10);
        let b = Rect::new(5, 0, 3, 10);
        assert_eq!(Rect::try_merge(a, b), Some(Rect::new(0, 0, 8, 10)));
        assert_eq!(Rect::try_merge(b, a), Some(Rect::new(0, 0, 8, 10)));

        let c = Rect::new(0, 10, 5, 4);
        assert_eq!(Rect::try_merge(a, c), Some(Rect::new(0, 0, 5, 14)));

        // same height but a gap in between
        let d = Rect::new(9, 0, 2, 10);
        assert_eq!(Rect::try_merge(a, d), None);
        // adjacent but mismatched height
        let e = Rect::new(5, 0, 3, 9);
        assert_eq!(Rect::try_merge(a, e), None);
    }
}
