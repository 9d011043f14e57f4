use ndarray::Array2;

use crate::grid::Grid;

/// Measured parameters of one detected object.
#[derive(Clone, Debug)]
pub struct ObjectStats {
    /// Label in the id map.
    pub label: u32,
    /// Number of pixels.
    pub area: usize,
    /// Sum of pixel intensities over the object.
    pub flux: f64,
    /// Brightest pixel intensity.
    pub peak: f32,
    /// Intensity-weighted centroid (row, col).
    pub centroid: (f64, f64),
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
}

/// Measure every labeled object in a single pass over the id map.
///
/// Returns stats sorted by label. Centroids are intensity-weighted with
/// negative intensities clamped to zero; an object with no positive flux
/// falls back to its bounding-box center.
pub fn measure_objects(grid: &Grid, id_map: &Array2<u32>) -> Vec<ObjectStats> {
    let max_label = id_map.iter().copied().max().unwrap_or(0) as usize;
    let mut slots: Vec<Option<ObjectStats>> = vec![None; max_label + 1];
    // (sum_row * w, sum_col * w, sum_w) per label.
    let mut moments: Vec<(f64, f64, f64)> = vec![(0.0, 0.0, 0.0); max_label + 1];

    for ((row, col), &lbl) in id_map.indexed_iter() {
        if lbl == 0 {
            continue;
        }
        let v = grid.data()[[row, col]];
        let entry = slots[lbl as usize].get_or_insert(ObjectStats {
            label: lbl,
            area: 0,
            flux: 0.0,
            peak: v,
            centroid: (0.0, 0.0),
            bbox: (row, row, col, col),
        });
        entry.area += 1;
        entry.flux += f64::from(v);
        entry.peak = entry.peak.max(v);
        entry.bbox.0 = entry.bbox.0.min(row);
        entry.bbox.1 = entry.bbox.1.max(row);
        entry.bbox.2 = entry.bbox.2.min(col);
        entry.bbox.3 = entry.bbox.3.max(col);

        let w = f64::from(v).max(0.0);
        let m = &mut moments[lbl as usize];
        m.0 += row as f64 * w;
        m.1 += col as f64 * w;
        m.2 += w;
    }

    let mut objects: Vec<ObjectStats> = Vec::new();
    for (stats, moment) in slots.into_iter().zip(moments) {
        let Some(mut stats) = stats else {
            continue;
        };
        stats.centroid = if moment.2 > 0.0 {
            (moment.0 / moment.2, moment.1 / moment.2)
        } else {
            // Zero-flux object: geometric center of the bounding box.
            (
                (stats.bbox.0 + stats.bbox.1) as f64 / 2.0,
                (stats.bbox.2 + stats.bbox.3) as f64 / 2.0,
            )
        };
        objects.push(stats);
    }
    objects
}
