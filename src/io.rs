use glob::glob;
use log::warn;
use std::collections::{BTreeMap, HashSet};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::types::{get_image_extensions_set, ImagePair, OutputDirs, ANNOTATION_EXTENSION};
use crate::utils::{create_output_directory, directory_label, is_same_directory, sanitized_stem};

/// Images and annotations found in one input directory
#[derive(Debug, Default)]
pub struct DiscoveredPairs {
    pub pairs: Vec<ImagePair>,
    pub unpaired: usize,
}

// Non-recursive listing of the regular files in `dir`
fn list_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    match glob(&pattern) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            warn!("Invalid glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Pair every image in `dir` with the VOC annotation sharing its file stem
pub fn discover_image_pairs(dir: &Path) -> DiscoveredPairs {
    let image_extensions = get_image_extensions_set();
    let mut annotations: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut images: Vec<PathBuf> = Vec::new();

    for path in list_files(dir) {
        match lowercase_extension(&path) {
            Some(ext) if ext == ANNOTATION_EXTENSION => {
                if let Some(stem) = path.file_stem() {
                    annotations.insert(stem.to_string_lossy().into_owned(), path);
                }
            }
            Some(ext) if image_extensions.contains(&ext) => images.push(path),
            _ => {}
        }
    }
    images.sort();

    let mut discovered = DiscoveredPairs::default();
    let mut output_stems: HashSet<String> = HashSet::new();
    for image_path in images {
        let raw_stem = match image_path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        match annotations.remove(&raw_stem) {
            Some(annotation_path) => {
                let stem = sanitized_stem(&image_path).unwrap_or(raw_stem);
                // Distinct names can sanitize to the same tile prefix
                if !output_stems.insert(stem.clone()) {
                    warn!(
                        "Skipping {}: its tiles would overwrite another image's tiles named {}_NNN",
                        image_path.display(),
                        stem
                    );
                    discovered.unpaired += 1;
                    continue;
                }
                discovered.pairs.push(ImagePair {
                    stem,
                    image_path,
                    annotation_path,
                });
            }
            None => {
                warn!("No annotation found for image {}", image_path.display());
                discovered.unpaired += 1;
            }
        }
    }

    for annotation_path in annotations.values() {
        warn!(
            "No image found for annotation {}",
            annotation_path.display()
        );
        discovered.unpaired += 1;
    }

    discovered
}

// Tiles written next to their sources would be picked up as inputs on the next run
fn ensure_not_input(output_dir: &Path, input_dir: &Path) -> std::io::Result<()> {
    if is_same_directory(output_dir, input_dir) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "Output directory {} is the input directory {}",
                output_dir.display(),
                input_dir.display()
            ),
        ));
    }
    Ok(())
}

/// Set up the tile output directories for one input directory.
///
/// Missing directories are created; existing ones are reused without
/// deleting anything. An output directory that resolves to the input
/// directory itself is rejected.
pub fn setup_output_directories(args: &Args, input_dir: &Path) -> std::io::Result<OutputDirs> {
    let label = directory_label(input_dir);
    let images_path = Path::new(&args.images_output).join(&label);
    let annotations_path = Path::new(&args.annotations_output).join(&label);
    ensure_not_input(&images_path, input_dir)?;
    ensure_not_input(&annotations_path, input_dir)?;

    let images_dir = create_output_directory(&images_path)?;

    // Both roots may point at the same directory
    let annotations_dir = if annotations_path == images_dir {
        images_dir.clone()
    } else {
        create_output_directory(&annotations_path)?
    };

    Ok(OutputDirs {
        images_dir,
        annotations_dir,
    })
}
