#![allow(dead_code)]

use ndarray::Array2;

use mtseg_core::grid::Grid;

/// Build a grid from row vectors.
pub fn grid_from(rows: Vec<Vec<f32>>) -> Grid {
    let h = rows.len();
    let w = rows[0].len();
    let mut data = Array2::<f32>::zeros((h, w));
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), w, "ragged test grid");
        for (c, &v) in row.iter().enumerate() {
            data[[r, c]] = v;
        }
    }
    Grid::new(data).expect("valid test grid")
}

/// Uniform background with a single bright pixel in the middle.
pub fn single_peak(size: usize, background: f32, peak: f32) -> Grid {
    let mut data = Array2::<f32>::from_elem((size, size), background);
    data[[size / 2, size / 2]] = peak;
    Grid::new(data).expect("valid test grid")
}

/// Background 1.0, a 3x3 plateau at 10.0 (rows/cols 2..=4) with its center
/// pixel raised to 50.0: two concentric bright regions.
pub fn nested_regions() -> Grid {
    let mut data = Array2::<f32>::from_elem((7, 7), 1.0);
    for r in 2..=4 {
        for c in 2..=4 {
            data[[r, c]] = 10.0;
        }
    }
    data[[3, 3]] = 50.0;
    Grid::new(data).expect("valid test grid")
}

/// Deterministic uneven terrain for property tests.
pub fn patterned(size: usize) -> Grid {
    let mut data = Array2::<f32>::zeros((size, size));
    for r in 0..size {
        for c in 0..size {
            data[[r, c]] = ((r * 31 + c * 17 + r * c) % 7) as f32;
        }
    }
    Grid::new(data).expect("valid test grid")
}
