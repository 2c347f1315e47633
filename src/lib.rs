//! Pascal VOC image tiler
//!
//! This library cuts large VOC-annotated images into a grid of fixed-size tiles
//! and re-projects every bounding box into the tiles it overlaps, dropping the
//! parts that become too small to be useful detections.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod io;
pub mod reproject;
pub mod tiling;
pub mod types;
pub mod utils;
pub mod voc;
pub mod writer;

// Re-export commonly used types and functions
pub use config::{AnnotationFormat, Args};
pub use dataset::process_dataset;
pub use error::TileError;
pub use geometry::Rect;
pub use reproject::{project_boxes, tile_annotations, TileOutput};
pub use tiling::{plan_tiles, tile_name, TileSize, TileSpec};
pub use types::{ObjectMeta, ProcessingStats, ProjectedBox, SourceBox, Threshold, TilingConfig};
pub use writer::{annotation_writer, AnnotationWriter, JsonAnnotationWriter, VocAnnotationWriter};
