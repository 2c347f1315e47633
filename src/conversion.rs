use image::GenericImageView;
use indicatif::ProgressBar;
use log::{debug, error};
use rayon::prelude::*;
use std::path::Path;

use crate::error::TileError;
use crate::reproject::{count_lost_boxes, tile_annotations};
use crate::tiling::tile_name;
use crate::types::{
    ImageOutcome, ImagePair, OutputDirs, ProcessingStats, TilingConfig, TILE_IMAGE_EXTENSION,
};
use crate::utils::{directory_label, to_jpeg_compatible};
use crate::voc::read_voc_boxes;
use crate::writer::{AnnotationWriter, TileAnnotation};

/// Tile a batch of images in parallel and collect their statistics
pub fn process_pairs_in_parallel(
    pairs: &[ImagePair],
    output_dirs: &OutputDirs,
    config: &TilingConfig,
    writer: &dyn AnnotationWriter,
    pb: &ProgressBar,
) -> ProcessingStats {
    let results: Vec<Result<ImageOutcome, TileError>> = pairs
        .par_iter()
        .map(|pair| {
            let result = process_image(pair, output_dirs, config, writer);
            pb.inc(1);
            result
        })
        .collect();

    let mut stats = ProcessingStats::new();
    for (pair, result) in pairs.iter().zip(results) {
        match result {
            Ok(outcome) => stats.record_image(&outcome),
            Err(e) => {
                error!(
                    "Failed to tile {} ({}): {}",
                    pair.image_path.display(),
                    pair.annotation_path.display(),
                    e
                );
                stats.increment_failed();
            }
        }
    }
    stats
}

/// Cut one image into tiles and write each tile with its annotation
pub fn process_image(
    pair: &ImagePair,
    output_dirs: &OutputDirs,
    config: &TilingConfig,
    writer: &dyn AnnotationWriter,
) -> Result<ImageOutcome, TileError> {
    // Annotation first: a malformed file should not cost an image decode
    let boxes = read_voc_boxes(&pair.annotation_path)?;
    let image = image::open(&pair.image_path)?;
    let (width, height) = image.dimensions();

    let tiles = tile_annotations(height, width, &boxes, config);
    if tiles.is_empty() {
        debug!(
            "{} ({}x{}) is smaller than one tile, nothing to write",
            pair.image_path.display(),
            width,
            height
        );
    }

    let folder = directory_label(&output_dirs.images_dir);
    let mut outcome = ImageOutcome::default();

    for output in &tiles {
        let name = tile_name(&pair.stem, output.tile.index);
        let image_name = format!("{}.{}", name, TILE_IMAGE_EXTENSION);
        debug!("Saving {}...", name);

        let crop = to_jpeg_compatible(image.crop_imm(
            output.tile.x(),
            output.tile.y(),
            output.tile.width(),
            output.tile.height(),
        ));
        crop.save(output_dirs.images_dir.join(&image_name))?;

        let annotation = TileAnnotation {
            folder: &folder,
            filename: &image_name,
            width: output.tile.width(),
            height: output.tile.height(),
            depth: crop.color().channel_count(),
            boxes: &output.boxes,
        };
        let annotation_path = annotation_output_path(&output_dirs.annotations_dir, &name, writer);
        writer.write_to_path(&annotation, &annotation_path)?;

        outcome.tiles_written += 1;
        outcome.boxes_kept += output.boxes.len();
    }

    let planned: Vec<_> = tiles.iter().map(|output| output.tile).collect();
    outcome.boxes_dropped = count_lost_boxes(&planned, &boxes, &config.threshold);

    Ok(outcome)
}

fn annotation_output_path(
    dir: &Path,
    name: &str,
    writer: &dyn AnnotationWriter,
) -> std::path::PathBuf {
    dir.join(format!("{}.{}", name, writer.extension()))
}
