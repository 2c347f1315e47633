//! Grid planning: which fixed-size tiles fit inside an image.

use crate::error::TileError;
use crate::geometry::Rect;

/// Tile extent in pixels, both sides positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    width: u32,
    height: u32,
}

impl TileSize {
    pub fn new(width: u32, height: u32) -> Result<Self, TileError> {
        if width == 0 || height == 0 {
            return Err(TileError::InvalidTileSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// One cell of the tile grid, in full-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpec {
    pub row: u32,
    pub col: u32,
    /// Row-major position in the grid, `row * cols + col`.
    pub index: u32,
    pub rect: Rect,
}

impl TileSpec {
    /// Left pixel column of the tile in the source image.
    pub fn x(&self) -> u32 {
        self.rect.xmin() as u32
    }

    /// Top pixel row of the tile in the source image.
    pub fn y(&self) -> u32 {
        self.rect.ymin() as u32
    }

    pub fn width(&self) -> u32 {
        self.rect.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.rect.height() as u32
    }
}

/// Grid dimensions for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
}

impl TileGrid {
    /// Number of whole tiles along each axis; remainder strips are ignored.
    pub fn for_image(image_height: u32, image_width: u32, tile: TileSize) -> Self {
        Self {
            rows: image_height / tile.height,
            cols: image_width / tile.width,
        }
    }

    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lay out the non-overlapping tiles of an image in row-major order.
///
/// Partial tiles along the bottom and right edges are not emitted; an image
/// smaller than one tile yields no tiles.
pub fn plan_tiles(image_height: u32, image_width: u32, tile: TileSize) -> Vec<TileSpec> {
    let grid = TileGrid::for_image(image_height, image_width, tile);
    let mut tiles = Vec::with_capacity(grid.len());

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let x = i64::from(col) * i64::from(tile.width);
            let y = i64::from(row) * i64::from(tile.height);
            tiles.push(TileSpec {
                row,
                col,
                index: row * grid.cols + col,
                rect: Rect::from_origin_size(x, y, tile.width, tile.height),
            });
        }
    }

    tiles
}

/// Output stem of a tile: `{stem}_{index:03}`.
pub fn tile_name(stem: &str, index: u32) -> String {
    format!("{}_{:03}", stem, index)
}
