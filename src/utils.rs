use image::{ColorType, DynamicImage};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create an output directory if it is missing and return its path.
///
/// Existing directories and their contents are left in place.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_dir() {
        log::debug!("Writing into existing directory {:?}", path);
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Whether `a` and `b` name the same existing directory
pub fn is_same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// File stem of `path`, made safe for use in output file names
pub fn sanitized_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| sanitize_filename::sanitize(stem.to_string_lossy()))
}

/// Last component of a directory path, used to name its output folder
pub fn directory_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

/// Convert a crop into something the JPEG encoder accepts: 8-bit gray stays
/// gray, everything else becomes 8-bit RGB.
pub fn to_jpeg_compatible(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image,
        ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            DynamicImage::ImageLuma8(image.to_luma8())
        }
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}
