//! Integer rectangles in pixel coordinates.
//!
//! Rectangles use half-open pixel edges: `xmin`/`ymin` are the first covered
//! column/row and `xmax`/`ymax` the first column/row past the rectangle, so
//! `width = xmax - xmin`.

use crate::error::TileError;

/// Axis-aligned rectangle with `xmin < xmax` and `ymin < ymax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

impl Rect {
    /// Build a rectangle, rejecting empty or inverted extents.
    pub fn new(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Result<Self, TileError> {
        if xmin >= xmax || ymin >= ymax {
            return Err(TileError::DegenerateBox {
                xmin,
                ymin,
                xmax,
                ymax,
            });
        }
        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Rectangle from an origin and a positive size.
    pub(crate) fn from_origin_size(x: i64, y: i64, width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            xmin: x,
            ymin: y,
            xmax: x + i64::from(width),
            ymax: y + i64::from(height),
        }
    }

    pub fn xmin(&self) -> i64 {
        self.xmin
    }

    pub fn ymin(&self) -> i64 {
        self.ymin
    }

    pub fn xmax(&self) -> i64 {
        self.xmax
    }

    pub fn ymax(&self) -> i64 {
        self.ymax
    }

    pub fn width(&self) -> i64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i64 {
        self.ymax - self.ymin
    }

    /// Signed side lengths `(dx, dy)` of the overlap with `other`.
    ///
    /// A negative value means the rectangles are separated along that axis,
    /// zero means they only share an edge.
    pub fn overlap_extent(&self, other: &Rect) -> (i64, i64) {
        let dx = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        let dy = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        (dx, dy)
    }

    /// Intersection of two rectangles, `None` unless it has positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let (dx, dy) = self.overlap_extent(other);
        if dx <= 0 || dy <= 0 {
            return None;
        }
        Some(Rect {
            xmin: self.xmin.max(other.xmin),
            ymin: self.ymin.max(other.ymin),
            xmax: self.xmax.min(other.xmax),
            ymax: self.ymax.min(other.ymax),
        })
    }

    /// Shift the rectangle so that `(origin_x, origin_y)` becomes `(0, 0)`.
    pub fn relative_to(&self, origin_x: i64, origin_y: i64) -> Rect {
        Rect {
            xmin: self.xmin - origin_x,
            ymin: self.ymin - origin_y,
            xmax: self.xmax - origin_x,
            ymax: self.ymax - origin_y,
        }
    }
}
