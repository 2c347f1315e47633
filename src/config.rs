use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::TileError;
use crate::tiling::TileSize;
use crate::types::{Threshold, TilingConfig};

/// Command-line arguments for splitting VOC-annotated images into tiles.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Base directory of the dataset
    #[arg(short = 'd', long = "input_dir")]
    pub input_dir: String,

    /// Directories under input_dir to process; the base directory itself when empty
    #[arg(use_value_delimiter = true)]
    pub input_paths: Vec<String>,

    /// Root directory for tile images
    #[arg(long = "images_output", default_value = "processed_images")]
    pub images_output: String,

    /// Root directory for tile annotations
    #[arg(long = "annotations_output", default_value = "processed_annotations")]
    pub annotations_output: String,

    /// Width of every tile in pixels
    #[arg(long = "tile_width", default_value_t = 576, value_parser = validate_tile_side)]
    pub tile_width: u32,

    /// Height of every tile in pixels
    #[arg(long = "tile_height", default_value_t = 532, value_parser = validate_tile_side)]
    pub tile_height: u32,

    /// Minimum width a clipped box must keep
    #[arg(long = "min_width", default_value_t = 10)]
    pub min_width: u32,

    /// Minimum height a clipped box must keep
    #[arg(long = "min_height", default_value_t = 10)]
    pub min_height: u32,

    /// Minimum area a clipped box must keep
    #[arg(long = "min_area", default_value_t = 200)]
    pub min_area: u64,

    /// Output format for tile annotations: 'json' or 'xml'
    #[arg(
        long = "annotations_format",
        visible_alias = "format",
        value_enum,
        default_value = "xml"
    )]
    pub annotations_format: AnnotationFormat,
}

// Serialization of the per-tile annotation files
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum AnnotationFormat {
    Json,
    Xml,
}

impl Args {
    /// Tile size and box threshold for the whole run.
    pub fn tiling_config(&self) -> Result<TilingConfig, TileError> {
        Ok(TilingConfig {
            tile: TileSize::new(self.tile_width, self.tile_height)?,
            threshold: Threshold {
                width: self.min_width,
                height: self.min_height,
                area: self.min_area,
            },
        })
    }

    /// Input directories to process, in the order given.
    pub fn input_dirs(&self) -> Vec<PathBuf> {
        let base = PathBuf::from(&self.input_dir);
        if self.input_paths.is_empty() {
            vec![base]
        } else {
            self.input_paths.iter().map(|path| base.join(path)).collect()
        }
    }
}

// Validate that a tile side is a positive integer
fn validate_tile_side(s: &str) -> Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("tile side must be a positive integer".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tile_side() {
        assert_eq!(validate_tile_side("576"), Ok(576));
        assert!(validate_tile_side("0").is_err());
        assert!(validate_tile_side("-3").is_err());
        assert!(validate_tile_side("wide").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["voc2tiles", "-d", "dataset"]);
        let config = args.tiling_config().unwrap();

        assert_eq!(config.tile, TileSize::new(576, 532).unwrap());
        assert_eq!(
            config.threshold,
            Threshold {
                width: 10,
                height: 10,
                area: 200
            }
        );
        assert_eq!(args.annotations_format, AnnotationFormat::Xml);
        assert_eq!(args.input_dirs(), vec![PathBuf::from("dataset")]);
    }

    #[test]
    fn test_input_paths_and_format() {
        let args = Args::parse_from([
            "voc2tiles",
            "-d",
            "dataset",
            "--format",
            "json",
            "--tile_width",
            "256",
            "river_a,river_b",
        ]);

        assert_eq!(args.annotations_format, AnnotationFormat::Json);
        assert_eq!(args.tile_width, 256);
        assert_eq!(
            args.input_dirs(),
            vec![
                PathBuf::from("dataset").join("river_a"),
                PathBuf::from("dataset").join("river_b")
            ]
        );
    }

    #[test]
    fn test_zero_tile_rejected_by_parser() {
        let result = Args::try_parse_from(["voc2tiles", "-d", "dataset", "--tile_height", "0"]);
        assert!(result.is_err());
    }
}
