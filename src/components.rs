//! Connected component labeling and plate-shaped region selection.

use log::debug;

use std::collections::{BTreeMap, VecDeque};
use std::ops::RangeInclusive;

use crate::error::{LprErrorKind, LprResult};
use crate::grid::{BoundingBox, Foreground, Grid, LabelGrid};

/// Pixel count per component id. Iterates in ascending id order.
pub type ComponentStats = BTreeMap<u32, usize>;

/// Width/height ratio a plate is expected to have.
pub const DEFAULT_ASPECT_RANGE: RangeInclusive<f64> = 1.5..=5.0;

/// Label 4-connected foreground regions.
///
/// Ids start at 1 and follow the row-major order in which each component's
/// first pixel is met, so the numbering is reproducible.
pub fn label_components<T: Foreground>(grid: &Grid<T>) -> (LabelGrid, ComponentStats) {
    let (width, height) = grid.dimensions();
    let mut labels = Grid::new(width, height, 0u32);
    let mut visited = Grid::new(width, height, false);
    let mut stats = ComponentStats::new();
    let mut queue = VecDeque::new();
    let mut next_id = 1u32;

    for row in 0..height {
        for col in 0..width {
            if *visited.get(row, col) {
                continue;
            }
            visited.set(row, col, true);
            if !grid.get(row, col).is_foreground() {
                continue;
            }

            let id = next_id;
            next_id += 1;
            let count = stats.entry(id).or_insert(0);
            queue.push_back((row, col));
            while let Some((r, c)) = queue.pop_front() {
                labels.set(r, c, id);
                *count += 1;
                let neighbours = [
                    (r + 1, c),
                    (r.wrapping_sub(1), c),
                    (r, c + 1),
                    (r, c.wrapping_sub(1)),
                ];
                for &(nr, nc) in &neighbours {
                    // wrapped indices land far past the grid and fail this check
                    if nr >= height || nc >= width || *visited.get(nr, nc) {
                        continue;
                    }
                    if grid.get(nr, nc).is_foreground() {
                        visited.set(nr, nc, true);
                        queue.push_back((nr, nc));
                    }
                }
            }
        }
    }
    debug!("labeled {} components on {}x{} grid", stats.len(), width, height);
    (labels, stats)
}

/// Bounding box of every labeled component, keyed by id.
pub fn component_boxes(labels: &LabelGrid) -> BTreeMap<u32, BoundingBox> {
    let mut boxes: BTreeMap<u32, BoundingBox> = BTreeMap::new();
    for (row, ids) in labels.rows().enumerate() {
        for (col, &id) in ids.iter().enumerate() {
            if id == 0 {
                continue;
            }
            boxes.entry(id)
                .and_modify(|bbox| bbox.include(row, col))
                .or_insert_with(|| BoundingBox::at(row, col));
        }
    }
    boxes
}

/// Pick the biggest component whose box looks like a plate.
///
/// A component is dropped when its box has zero column or row span, or when
/// `col_span / row_span` falls outside `aspect`. Of the rest, the highest pixel
/// count wins, the lowest id on a tie.
pub fn select_largest_component(
    labels: &LabelGrid,
    stats: &ComponentStats,
    aspect: &RangeInclusive<f64>,
) -> LprResult<BoundingBox> {
    let boxes = component_boxes(labels);
    let mut best: Option<(u32, usize)> = None;
    for (&id, &count) in stats {
        let bbox = match boxes.get(&id) {
            Some(bbox) => bbox,
            None => continue,
        };
        let ratio = match bbox.aspect_ratio() {
            Some(ratio) => ratio,
            None => {
                debug!("component {} rejected: flat box {:?}", id, bbox);
                continue;
            }
        };
        if !aspect.contains(&ratio) {
            debug!("component {} rejected: aspect {:.2}", id, ratio);
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((id, count)),
        }
    }

    match best.and_then(|(id, _)| boxes.get(&id)) {
        Some(bbox) => Ok(*bbox),
        None => Err(LprErrorKind::NoComponentFound.into()),
    }
}
