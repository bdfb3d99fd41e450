use anyhow::{Result, ensure};

/// A rectangular part to be cut from stock sheets.
/// Immutable after catalog construction; `id` is assigned by input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub id: usize,
    pub width: i64,
    pub height: i64,
    pub area: i64,
}

impl Part {
    /// Perimeter of the part, `2 * (w + h)`.
    pub fn perimeter(&self) -> i64 {
        2 * (self.width + self.height)
    }

    /// `true` iff the part fits a `w x h` region in the given orientation.
    #[inline(always)]
    pub fn fits(&self, w: i64, h: i64, rotated: bool) -> bool {
        let (pw, ph) = self.dims(rotated);
        pw <= w && ph <= h
    }

    /// As-placed dimensions for the given orientation.
    #[inline(always)]
    pub fn dims(&self, rotated: bool) -> (i64, i64) {
        match rotated {
            false => (self.width, self.height),
            true => (self.height, self.width),
        }
    }
}

/// Validated, indexed list of parts together with the stock sheet size.
#[derive(Clone, Debug)]
pub struct PartCatalog {
    pub sheet_width: i64,
    pub sheet_height: i64,
    pub parts: Vec<Part>,
}

impl PartCatalog {
    /// Builds a catalog from the sheet size and `(width, height)` pairs.
    ///
    /// Fails with a descriptive error if the list is empty, any dimension
    /// is non-positive, or a part does not fit the sheet in either
    /// orientation. No search is attempted on a catalog that failed to
    /// validate.
    pub fn new(sheet_width: i64, sheet_height: i64, details: &[(i64, i64)]) -> Result<Self> {
        ensure!(
            sheet_width > 0 && sheet_height > 0,
            "sheet dimensions must be positive, got {sheet_width}x{sheet_height}"
        );
        ensure!(!details.is_empty(), "no parts to cut");

        let mut parts = Vec::with_capacity(details.len());
        for (id, &(w, h)) in details.iter().enumerate() {
            ensure!(
                w > 0 && h > 0,
                "part dimensions must be positive, got {w}x{h} (part {id})"
            );
            // oversized in both orientations -> can never be placed
            ensure!(
                !((w > sheet_width && w > sheet_height) || (h > sheet_width && h > sheet_height)),
                "part {w}x{h} is too large for sheet {sheet_width}x{sheet_height}"
            );
            parts.push(Part {
                id,
                width: w,
                height: h,
                area: w * h,
            });
        }

        Ok(PartCatalog {
            sheet_width,
            sheet_height,
            parts,
        })
    }

    pub fn sheet_area(&self) -> i64 {
        self.sheet_width * self.sheet_height
    }

    pub fn n_parts(&self) -> usize {
        self.parts.len()
    }
}
