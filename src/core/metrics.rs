//! Glyph cell metrics and row/column geometry.

/// Largest glyph dimension accepted from a measurement probe
const MAX_CELL_SIZE: i32 = 100;

/// Size of one character cell, in surface units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphCell {
    pub width: u16,
    pub height: u16,
}

impl Default for GlyphCell {
    fn default() -> Self {
        Self { width: 1, height: 1 }
    }
}

impl GlyphCell {
    /// Build a cell from raw probe values.
    ///
    /// Any axis that is zero, negative or above 100 falls back to 1 so that
    /// row and column computation never divides by zero.
    pub fn sanitize(width: i32, height: i32) -> Self {
        Self {
            width: sanitize_axis(width),
            height: sanitize_axis(height),
        }
    }
}

fn sanitize_axis(value: i32) -> u16 {
    if value <= 0 || value > MAX_CELL_SIZE {
        1
    } else {
        value as u16
    }
}

/// Resolved layout of the console, computed once at mount and on resize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    /// Glyph cell size
    pub cell: GlyphCell,
    /// Width taken by a vertical scrollbar
    pub scrollbar_width: u16,
    /// Padding on each side
    pub padding: u16,
    /// Visible text rows
    pub rows: u16,
    /// Visible text columns
    pub cols: u16,
    size: (u16, u16),
}

impl Geometry {
    pub fn new(cell: GlyphCell, scrollbar_width: u16, padding: u16) -> Self {
        Self {
            cell,
            scrollbar_width,
            padding,
            ..Self::default()
        }
    }

    /// Recompute rows and columns for a new outer size.
    ///
    /// Returns `true` if the outer size changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if self.size == (width, height) {
            return false;
        }
        self.size = (width, height);
        let pad = self.padding.saturating_mul(2);
        self.rows = height.saturating_sub(pad) / self.cell.height.max(1);
        self.cols = width.saturating_sub(pad) / self.cell.width.max(1);
        true
    }

    /// Outer size used by the last resize, scrollbar included
    pub fn outer_size(&self) -> (u16, u16) {
        self.size
    }

    /// Width covered by whole text columns
    pub fn content_width(&self) -> u16 {
        self.cols.saturating_mul(self.cell.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_out_of_range() {
        assert_eq!(GlyphCell::sanitize(0, 0), GlyphCell { width: 1, height: 1 });
        assert_eq!(GlyphCell::sanitize(-3, 101), GlyphCell { width: 1, height: 1 });
        assert_eq!(GlyphCell::sanitize(8, 16), GlyphCell { width: 8, height: 16 });
        assert_eq!(GlyphCell::sanitize(100, 1), GlyphCell { width: 100, height: 1 });
    }

    #[test]
    fn test_resize_computes_rows_and_cols() {
        let mut g = Geometry::new(GlyphCell::sanitize(8, 16), 15, 2);
        assert!(g.resize(804, 484));
        assert_eq!(g.cols, 100);
        assert_eq!(g.rows, 30);
        assert_eq!(g.content_width(), 800);
        assert!(!g.resize(804, 484));
    }

    #[test]
    fn test_resize_smaller_than_padding() {
        let mut g = Geometry::new(GlyphCell::default(), 0, 5);
        g.resize(4, 4);
        assert_eq!((g.cols, g.rows), (0, 0));
    }
}
