use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::geometry::Rect;
use crate::tiling::TileSize;

// Image formats the tiler can decode
pub const IMG_FORMATS: &[&str] = &["bmp", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

// Extension of Pascal VOC annotation files
pub const ANNOTATION_EXTENSION: &str = "xml";

// Extension of written tile images
pub const TILE_IMAGE_EXTENSION: &str = "jpg";

// Precomputed HashSet of image extensions for fast lookup
pub static IMAGE_EXTENSIONS_SET: OnceLock<HashSet<String>> = OnceLock::new();

/// Get the image extensions set
pub fn get_image_extensions_set() -> &'static HashSet<String> {
    IMAGE_EXTENSIONS_SET.get_or_init(|| IMG_FORMATS.iter().map(|ext| ext.to_lowercase()).collect())
}

/// Per-object annotation fields carried verbatim from source to tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMeta {
    pub name: String,
    pub pose: Option<String>,
    pub truncated: Option<String>,
    pub difficult: Option<String>,
    pub occluded: Option<String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An annotated object in full-image coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBox {
    pub rect: Rect,
    pub meta: ObjectMeta,
}

/// An annotated object clipped to a tile, in tile-local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedBox {
    pub rect: Rect,
    pub meta: ObjectMeta,
}

/// Minimum extent a clipped box must keep to stay in a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Threshold {
    pub width: u32,
    pub height: u32,
    pub area: u64,
}

impl Threshold {
    /// All three limits must hold for an overlap of `dx` by `dy` pixels.
    pub fn accepts(&self, dx: i64, dy: i64) -> bool {
        dx >= i64::from(self.width)
            && dy >= i64::from(self.height)
            && i128::from(dx) * i128::from(dy) >= i128::from(self.area)
    }
}

/// Run-wide tiling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilingConfig {
    pub tile: TileSize,
    pub threshold: Threshold,
}

/// An image together with the VOC annotation describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub stem: String,
    pub image_path: PathBuf,
    pub annotation_path: PathBuf,
}

// Struct to hold the paths to the output directories of one input directory
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
}

// What tiling a single image produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageOutcome {
    pub tiles_written: usize,
    pub boxes_kept: usize,
    pub boxes_dropped: usize,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub images_processed: usize,
    pub images_without_tiles: usize,
    pub images_failed: usize,
    pub unpaired_files: usize,
    pub tiles_written: usize,
    pub boxes_kept: usize,
    pub boxes_dropped: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_image(&mut self, outcome: &ImageOutcome) {
        self.images_processed += 1;
        if outcome.tiles_written == 0 {
            self.images_without_tiles += 1;
        }
        self.tiles_written += outcome.tiles_written;
        self.boxes_kept += outcome.boxes_kept;
        self.boxes_dropped += outcome.boxes_dropped;
    }

    pub fn increment_failed(&mut self) {
        self.images_failed += 1;
    }

    pub fn add_unpaired(&mut self, count: usize) {
        self.unpaired_files += count;
    }

    pub fn merge(&mut self, other: &ProcessingStats) {
        self.images_processed += other.images_processed;
        self.images_without_tiles += other.images_without_tiles;
        self.images_failed += other.images_failed;
        self.unpaired_files += other.unpaired_files;
        self.tiles_written += other.tiles_written;
        self.boxes_kept += other.boxes_kept;
        self.boxes_dropped += other.boxes_dropped;
    }

    pub fn print_summary(&self) {
        info!("=== Processing Summary ===");
        info!("Images processed: {}", self.images_processed);
        info!("Tiles written: {}", self.tiles_written);
        info!("Boxes kept in tiles: {}", self.boxes_kept);
        info!(
            "Objects lost (outside every tile or below threshold): {}",
            self.boxes_dropped
        );

        if self.images_without_tiles > 0 {
            warn!(
                "Images smaller than one tile (no output): {}",
                self.images_without_tiles
            );
        }
        if self.unpaired_files > 0 {
            warn!(
                "Skipped files without a matching image or annotation: {}",
                self.unpaired_files
            );
        }
        if self.images_failed > 0 {
            warn!("Failed images: {}", self.images_failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_requires_all_limits() {
        let threshold = Threshold {
            width: 10,
            height: 10,
            area: 200,
        };

        assert!(threshold.accepts(20, 10));
        // dimensions pass, area fails
        assert!(!threshold.accepts(10, 10));
        // area passes, width fails
        assert!(!threshold.accepts(9, 500));
        assert!(!threshold.accepts(500, 9));
    }

    #[test]
    fn test_zero_threshold_accepts_any_overlap() {
        assert!(Threshold::default().accepts(1, 1));
        assert!(Threshold::default().accepts(0, 0));
    }

    #[test]
    fn test_stats_record_and_merge() {
        let mut a = ProcessingStats::new();
        a.record_image(&ImageOutcome {
            tiles_written: 4,
            boxes_kept: 3,
            boxes_dropped: 5,
        });
        a.record_image(&ImageOutcome::default());
        a.increment_failed();

        let mut b = ProcessingStats::new();
        b.add_unpaired(2);
        b.merge(&a);

        assert_eq!(b.images_processed, 2);
        assert_eq!(b.images_without_tiles, 1);
        assert_eq!(b.images_failed, 1);
        assert_eq!(b.unpaired_files, 2);
        assert_eq!(b.tiles_written, 4);
        assert_eq!(b.boxes_kept, 3);
        assert_eq!(b.boxes_dropped, 5);
    }

    #[test]
    fn test_image_extensions_set() {
        let set = get_image_extensions_set();
        assert!(set.contains("jpg"));
        assert!(set.contains("png"));
        assert!(!set.contains("xml"));
    }
}
