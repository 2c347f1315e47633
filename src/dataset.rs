use log::info;
use std::path::Path;

use crate::config::Args;
use crate::conversion::process_pairs_in_parallel;
use crate::error::TileError;
use crate::io::{discover_image_pairs, setup_output_directories};
use crate::types::{ProcessingStats, TilingConfig};
use crate::utils::{create_progress_bar, directory_label};
use crate::writer::{annotation_writer, AnnotationWriter};

/// Main dataset processing pipeline: tile every configured input directory
pub fn process_dataset(args: &Args) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    let config = args.tiling_config()?;
    let writer = annotation_writer(args.annotations_format);

    let input_dirs = args.input_dirs();
    if let Some(missing) = input_dirs.iter().find(|dir| !dir.is_dir()) {
        return Err(format!("Input directory does not exist: {}", missing.display()).into());
    }

    info!(
        "Tiling into {}x{} crops (min box {}x{}, min area {}), {:?} annotations",
        config.tile.width(),
        config.tile.height(),
        config.threshold.width,
        config.threshold.height,
        config.threshold.area,
        args.annotations_format
    );

    let mut stats = ProcessingStats::new();
    for input_dir in &input_dirs {
        let dir_stats = process_directory(input_dir, args, &config, writer.as_ref())?;
        stats.merge(&dir_stats);
    }

    stats.print_summary();
    info!("Tiling process completed successfully.");
    Ok(stats)
}

/// Tile all annotated images of a single input directory
pub fn process_directory(
    input_dir: &Path,
    args: &Args,
    config: &TilingConfig,
    writer: &dyn AnnotationWriter,
) -> Result<ProcessingStats, TileError> {
    info!("Loading from {}...", input_dir.display());

    let discovered = discover_image_pairs(input_dir);
    info!(
        "Found {} annotated images in {}.",
        discovered.pairs.len(),
        input_dir.display()
    );

    let output_dirs = setup_output_directories(args, input_dir)?;

    let pb = create_progress_bar(discovered.pairs.len() as u64, &directory_label(input_dir));
    let mut stats = process_pairs_in_parallel(&discovered.pairs, &output_dirs, config, writer, &pb);
    pb.finish_with_message("Tiling complete");

    stats.add_unpaired(discovered.unpaired);
    Ok(stats)
}
