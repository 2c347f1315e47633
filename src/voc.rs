//! Pascal VOC annotation reading.
//!
//! Only the parts of the document the tiler needs are deserialized: every
//! `<object>` with its label fields and `<bndbox>`. Other elements such as
//! `<source>` or `<size>` are ignored.

use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::TileError;
use crate::geometry::Rect;
use crate::types::{ObjectMeta, SourceBox};

#[derive(Debug, Deserialize)]
#[serde(rename = "annotation")]
struct VocDocument {
    #[serde(rename = "object", default)]
    objects: Vec<VocObject>,
}

#[derive(Debug, Deserialize)]
struct VocObject {
    name: Option<String>,
    pose: Option<String>,
    truncated: Option<String>,
    difficult: Option<String>,
    occluded: Option<String>,
    bndbox: Option<VocBndBox>,
}

#[derive(Debug, Deserialize)]
struct VocBndBox {
    xmin: Option<String>,
    ymin: Option<String>,
    xmax: Option<String>,
    ymax: Option<String>,
}

/// Read the boxes of a VOC annotation file.
pub fn read_voc_boxes(path: &Path) -> Result<Vec<SourceBox>, TileError> {
    let content = fs::read_to_string(path)?;
    let boxes = parse_voc_boxes(&content)?;
    debug!("Read {} objects from {}", boxes.len(), path.display());
    Ok(boxes)
}

/// Parse the boxes of a VOC annotation document, in document order.
pub fn parse_voc_boxes(xml: &str) -> Result<Vec<SourceBox>, TileError> {
    let document: VocDocument = quick_xml::de::from_str(xml)?;
    document
        .objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| object.into_source_box(index))
        .collect()
}

impl VocObject {
    fn into_source_box(self, index: usize) -> Result<SourceBox, TileError> {
        let name = self.name.ok_or_else(|| {
            TileError::MalformedAnnotation(format!("object #{index} has no <name>"))
        })?;
        let bndbox = self.bndbox.ok_or_else(|| {
            TileError::MalformedAnnotation(format!("object #{index} ({name}) has no <bndbox>"))
        })?;

        let rect = Rect::new(
            parse_coordinate(bndbox.xmin.as_deref(), "xmin", index)?,
            parse_coordinate(bndbox.ymin.as_deref(), "ymin", index)?,
            parse_coordinate(bndbox.xmax.as_deref(), "xmax", index)?,
            parse_coordinate(bndbox.ymax.as_deref(), "ymax", index)?,
        )?;

        Ok(SourceBox {
            rect,
            meta: ObjectMeta {
                name,
                pose: self.pose,
                truncated: self.truncated,
                difficult: self.difficult,
                occluded: self.occluded,
            },
        })
    }
}

// Integers, or decimals with no fractional part ("12.0")
fn parse_coordinate(value: Option<&str>, field: &str, index: usize) -> Result<i64, TileError> {
    let text = value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            TileError::MalformedAnnotation(format!("object #{index} is missing <{field}>"))
        })?;

    // Some labelling tools write "500.0"; only an all-zero fraction is accepted
    let integer = match text.split_once('.') {
        Some((integer, fraction))
            if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') =>
        {
            integer
        }
        Some(_) => "",
        None => text,
    };
    integer.parse::<i64>().map_err(|_| {
        TileError::MalformedAnnotation(format!(
            "object #{index} has non-integer <{field}>: {text:?}"
        ))
    })
}
