//! Serialization of per-tile annotations.
//!
//! The tiling core never sees a file format. The pipeline picks one
//! [`AnnotationWriter`] per run from [`AnnotationFormat`] and hands it every
//! tile.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::AnnotationFormat;
use crate::error::TileError;
use crate::types::ProjectedBox;

/// Everything a writer needs to describe one written tile.
#[derive(Debug, Clone, Copy)]
pub struct TileAnnotation<'a> {
    /// Name of the directory holding the tile image.
    pub folder: &'a str,
    /// File name of the tile image.
    pub filename: &'a str,
    pub width: u32,
    pub height: u32,
    /// Channel count of the written tile image.
    pub depth: u8,
    pub boxes: &'a [ProjectedBox],
}

pub trait AnnotationWriter: Send + Sync {
    /// File extension of written annotations, without the dot.
    fn extension(&self) -> &'static str;

    fn write(&self, annotation: &TileAnnotation<'_>, out: &mut dyn Write) -> Result<(), TileError>;

    fn write_to_path(&self, annotation: &TileAnnotation<'_>, path: &Path) -> Result<(), TileError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(annotation, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Pick the writer for a configured format.
pub fn annotation_writer(format: AnnotationFormat) -> Box<dyn AnnotationWriter> {
    match format {
        AnnotationFormat::Json => Box::new(JsonAnnotationWriter),
        AnnotationFormat::Xml => Box::new(VocAnnotationWriter),
    }
}

#[derive(Debug, Serialize)]
struct BndBox {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

#[derive(Debug, Serialize)]
struct ObjectRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pose: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncated: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    difficult: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    occluded: Option<&'a str>,
    bndbox: BndBox,
}

impl<'a> From<&'a ProjectedBox> for ObjectRecord<'a> {
    fn from(projected: &'a ProjectedBox) -> Self {
        let meta = &projected.meta;
        Self {
            name: &meta.name,
            pose: meta.pose.as_deref(),
            truncated: meta.truncated.as_deref(),
            difficult: meta.difficult.as_deref(),
            occluded: meta.occluded.as_deref(),
            bndbox: BndBox {
                xmin: projected.rect.xmin(),
                ymin: projected.rect.ymin(),
                xmax: projected.rect.xmax(),
                ymax: projected.rect.ymax(),
            },
        }
    }
}

/// JSON array of objects, one per kept box.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAnnotationWriter;

impl AnnotationWriter for JsonAnnotationWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, annotation: &TileAnnotation<'_>, out: &mut dyn Write) -> Result<(), TileError> {
        let records: Vec<ObjectRecord> = annotation.boxes.iter().map(ObjectRecord::from).collect();
        serde_json::to_writer(out, &records)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct VocSize {
    width: u32,
    height: u32,
    depth: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename = "annotation")]
struct VocTileDocument<'a> {
    folder: &'a str,
    filename: &'a str,
    size: VocSize,
    segmented: u8,
    #[serde(rename = "object")]
    objects: Vec<ObjectRecord<'a>>,
}

/// Pascal VOC XML document describing the tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct VocAnnotationWriter;

impl AnnotationWriter for VocAnnotationWriter {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn write(&self, annotation: &TileAnnotation<'_>, out: &mut dyn Write) -> Result<(), TileError> {
        let document = VocTileDocument {
            folder: annotation.folder,
            filename: annotation.filename,
            size: VocSize {
                width: annotation.width,
                height: annotation.height,
                depth: annotation.depth,
            },
            segmented: 0,
            objects: annotation.boxes.iter().map(ObjectRecord::from).collect(),
        };

        let mut xml = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 4);
        document.serialize(serializer)?;

        out.write_all(xml.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
