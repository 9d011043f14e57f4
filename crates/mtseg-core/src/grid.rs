use ndarray::Array2;

use crate::error::{MtsegError, Result};

/// An immutable 2D intensity image.
///
/// Pixel values are finite f32, shape = (height, width). Validation happens
/// here, before any tree work: a `Grid` in hand is always well-formed, and
/// it is read-only to every downstream component.
#[derive(Clone, Debug)]
pub struct Grid {
    data: Array2<f32>,
}

impl Grid {
    /// Wrap an intensity array, rejecting zero-sized grids and non-finite
    /// values.
    pub fn new(data: Array2<f32>) -> Result<Self> {
        let (h, w) = data.dim();
        if h == 0 || w == 0 {
            return Err(MtsegError::EmptyGrid {
                width: w,
                height: h,
            });
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(MtsegError::NonFinitePixel {
                row: pos / w,
                col: pos % w,
            });
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Total pixel count; at least 1 for a validated grid.
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }
}
