//! Clip annotated boxes to tiles and move them into tile-local coordinates.

use crate::tiling::{plan_tiles, TileSpec};
use crate::types::{ProjectedBox, SourceBox, Threshold, TilingConfig};

/// Boxes belonging to one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileOutput {
    pub tile: TileSpec,
    pub boxes: Vec<ProjectedBox>,
}

/// Project a single box onto a tile.
///
/// Returns `None` when the box misses the tile, only touches its edge, or the
/// clipped part is below any of the threshold limits.
pub fn project_box(tile: &TileSpec, source: &SourceBox, threshold: &Threshold) -> Option<ProjectedBox> {
    let (dx, dy) = tile.rect.overlap_extent(&source.rect);
    if dx <= 0 || dy <= 0 {
        return None;
    }
    if !threshold.accepts(dx, dy) {
        return None;
    }

    let clipped = tile.rect.intersection(&source.rect)?;
    Some(ProjectedBox {
        rect: clipped.relative_to(tile.rect.xmin(), tile.rect.ymin()),
        meta: source.meta.clone(),
    })
}

/// Project every box onto a tile, keeping input order.
pub fn project_boxes(tile: &TileSpec, boxes: &[SourceBox], threshold: &Threshold) -> Vec<ProjectedBox> {
    boxes
        .iter()
        .filter_map(|source| project_box(tile, source, threshold))
        .collect()
}

/// Plan the tile grid of an image and project its boxes onto every tile.
pub fn tile_annotations(
    image_height: u32,
    image_width: u32,
    boxes: &[SourceBox],
    config: &TilingConfig,
) -> Vec<TileOutput> {
    plan_tiles(image_height, image_width, config.tile)
        .into_iter()
        .map(|tile| TileOutput {
            boxes: project_boxes(&tile, boxes, &config.threshold),
            tile,
        })
        .collect()
}

/// Number of boxes that survive in no tile at all.
pub fn count_lost_boxes(tiles: &[TileSpec], boxes: &[SourceBox], threshold: &Threshold) -> usize {
    boxes
        .iter()
        .filter(|source| {
            tiles
                .iter()
                .all(|tile| project_box(tile, source, threshold).is_none())
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::tiling::TileSize;
    use crate::types::ObjectMeta;

    fn source(name: &str, xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> SourceBox {
        SourceBox {
            rect: Rect::new(xmin, ymin, xmax, ymax).unwrap(),
            meta: ObjectMeta::named(name),
        }
    }

    fn default_config() -> TilingConfig {
        TilingConfig {
            tile: TileSize::new(576, 532).unwrap(),
            threshold: Threshold {
                width: 10,
                height: 10,
                area: 200,
            },
        }
    }

    #[test]
    fn test_area_threshold_drops_small_square() {
        let tile = plan_tiles(10, 10, TileSize::new(10, 10).unwrap())[0];
        let boxes = vec![source("bottle", 0, 0, 10, 10)];
        let threshold = Threshold {
            width: 10,
            height: 10,
            area: 200,
        };

        assert!(project_boxes(&tile, &boxes, &threshold).is_empty());
    }

    #[test]
    fn test_thin_sliver_dropped_despite_area() {
        let tile = plan_tiles(532, 576, TileSize::new(576, 532).unwrap())[0];
        // 400 px wide but only 5 px of it inside the tile vertically
        let boxes = vec![source("bottle", 20, 527, 420, 600)];
        let threshold = default_config().threshold;

        assert!(project_boxes(&tile, &boxes, &threshold).is_empty());
    }

    #[test]
    fn test_contained_box_only_shifts() {
        let config = default_config();
        let boxes = vec![source("bottle", 600, 550, 650, 600)];
        let outputs = tile_annotations(1200, 1200, &boxes, &config);

        let tile = &outputs[3];
        assert_eq!(tile.tile.index, 3);
        assert_eq!(tile.boxes.len(), 1);
        let rect = tile.boxes[0].rect;
        assert_eq!((rect.xmin(), rect.ymin()), (24, 18));
        assert_eq!((rect.width(), rect.height()), (50, 50));
        assert!(outputs[..3].iter().all(|o| o.boxes.is_empty()));
    }

    #[test]
    fn test_straddling_box_splits_without_gap() {
        let config = default_config();
        let boxes = vec![source("bottle", 500, 100, 700, 200)];
        let outputs = tile_annotations(1200, 1200, &boxes, &config);

        let left = &outputs[0].boxes;
        let right = &outputs[1].boxes;
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 1);
        assert_eq!(left[0].rect, Rect::new(500, 100, 576, 200).unwrap());
        assert_eq!(right[0].rect, Rect::new(0, 100, 124, 200).unwrap());
        assert_eq!(left[0].rect.width() + right[0].rect.width(), 200);
    }

    #[test]
    fn test_box_in_remainder_strip_never_appears() {
        let config = default_config();
        // columns 1152..1200 are beyond the last full tile
        let boxes = vec![source("bottle", 1160, 10, 1199, 300)];
        let outputs = tile_annotations(1200, 1200, &boxes, &config);

        assert_eq!(outputs.len(), 4);
        assert!(outputs.iter().all(|o| o.boxes.is_empty()));
        let tiles: Vec<_> = outputs.iter().map(|o| o.tile).collect();
        assert_eq!(count_lost_boxes(&tiles, &boxes, &config.threshold), 1);
    }

    #[test]
    fn test_edge_contact_is_not_an_overlap() {
        let tile = plan_tiles(1200, 1200, TileSize::new(576, 532).unwrap())[1];
        let boxes = vec![source("bottle", 500, 10, 576, 100)];

        assert!(project_boxes(&tile, &boxes, &Threshold::default()).is_empty());
    }

    #[test]
    fn test_clipping_invariant_and_order() {
        let config = default_config();
        let boxes = vec![
            source("a", -30, -30, 1300, 1300),
            source("b", 100, 100, 300, 300),
            source("c", 550, 510, 600, 560),
            source("d", 570, 0, 590, 40),
        ];
        let outputs = tile_annotations(1200, 1200, &boxes, &config);

        for output in &outputs {
            for projected in &output.boxes {
                let r = projected.rect;
                assert!(0 <= r.xmin() && r.xmin() < r.xmax() && r.xmax() <= 576);
                assert!(0 <= r.ymin() && r.ymin() < r.ymax() && r.ymax() <= 532);
            }
        }

        let names: Vec<_> = outputs[0].boxes.iter().map(|b| b.meta.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        // "d" keeps 14x40 in tile 1 and only 6 px in tile 0
        let names: Vec<_> = outputs[1].boxes.iter().map(|b| b.meta.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_metadata_carried_through() {
        let tile = plan_tiles(1200, 1200, TileSize::new(576, 532).unwrap())[0];
        let mut boxed = source("bottle", 10, 10, 100, 100);
        boxed.meta.pose = Some("Unspecified".to_string());
        boxed.meta.truncated = Some("1".to_string());
        boxed.meta.difficult = Some("0".to_string());

        let projected = project_box(&tile, &boxed, &Threshold::default()).unwrap();
        assert_eq!(projected.meta, boxed.meta);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let config = default_config();
        let boxes = vec![
            source("a", 10, 10, 900, 900),
            source("b", 560, 500, 620, 560),
        ];

        let first = tile_annotations(1200, 1200, &boxes, &config);
        let second = tile_annotations(1200, 1200, &boxes, &config);
        assert_eq!(first, second);
    }
}
