/// Error types for tiling and annotation I/O.
use std::fmt;

#[derive(Debug)]
pub enum TileError {
    /// Tile width or height of zero.
    InvalidTileSize { width: u32, height: u32 },
    /// A rectangle with `xmin >= xmax` or `ymin >= ymax`.
    DegenerateBox {
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
    },
    /// Missing or non-numeric annotation fields.
    MalformedAnnotation(String),
    Image(image::ImageError),
    Io(std::io::Error),
    Xml(quick_xml::DeError),
    Json(serde_json::Error),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::InvalidTileSize { width, height } => {
                write!(f, "Invalid tile size {width}x{height}: both sides must be positive")
            }
            TileError::DegenerateBox {
                xmin,
                ymin,
                xmax,
                ymax,
            } => write!(
                f,
                "Degenerate box ({xmin}, {ymin}, {xmax}, {ymax}): min corner must be below max corner"
            ),
            TileError::MalformedAnnotation(msg) => write!(f, "Malformed annotation: {msg}"),
            TileError::Image(err) => write!(f, "Image error: {err}"),
            TileError::Io(err) => write!(f, "IO error: {err}"),
            TileError::Xml(err) => write!(f, "XML error: {err}"),
            TileError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileError::Image(err) => Some(err),
            TileError::Io(err) => Some(err),
            TileError::Xml(err) => Some(err),
            TileError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TileError {
    fn from(err: std::io::Error) -> Self {
        TileError::Io(err)
    }
}

impl From<image::ImageError> for TileError {
    fn from(err: image::ImageError) -> Self {
        TileError::Image(err)
    }
}

impl From<quick_xml::DeError> for TileError {
    fn from(err: quick_xml::DeError) -> Self {
        TileError::Xml(err)
    }
}

impl From<serde_json::Error> for TileError {
    fn from(err: serde_json::Error) -> Self {
        TileError::Json(err)
    }
}
