use ndarray::Array2;

use crate::consts::{MIN_BACKGROUND_VARIANCE, SIGMA_CLIP_KAPPA, SIGMA_CLIP_MAX_ITERATIONS};
use crate::error::{MtsegError, Result};
use crate::grid::Grid;

/// Noise model the significance test judges nodes against.
///
/// Supplied by the caller or estimated with [`estimate_background`]; the
/// filter treats it as an opaque source of per-position mean and variance.
#[derive(Clone, Debug)]
pub enum BackgroundModel {
    /// One mean/variance pair for the whole image.
    Global { mean: f64, variance: f64 },
    /// Per-pixel mean and variance maps, same dimensions as the grid.
    /// Evaluated at a node's canonical pixel.
    Local {
        mean: Array2<f32>,
        variance: Array2<f32>,
    },
}

impl BackgroundModel {
    /// Check the model against the grid dimensions before any node is
    /// touched. The significance test is undefined for variance <= 0.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        match self {
            BackgroundModel::Global { mean, variance } => {
                if !mean.is_finite() {
                    return Err(MtsegError::InvalidModel("non-finite mean".into()));
                }
                check_variance(*variance)
            }
            BackgroundModel::Local { mean, variance } => {
                for map in [mean, variance] {
                    let (h, w) = map.dim();
                    if h != height || w != width {
                        return Err(MtsegError::ModelDimensionMismatch {
                            model_width: w,
                            model_height: h,
                            width,
                            height,
                        });
                    }
                }
                if mean.iter().any(|v| !v.is_finite()) {
                    return Err(MtsegError::InvalidModel("non-finite mean".into()));
                }
                variance.iter().try_for_each(|&v| check_variance(f64::from(v)))
            }
        }
    }

    /// Mean and standard deviation at a linear pixel index.
    pub(crate) fn mean_sigma_at(&self, pixel: usize, width: usize) -> (f64, f64) {
        match self {
            BackgroundModel::Global { mean, variance } => (*mean, variance.sqrt()),
            BackgroundModel::Local { mean, variance } => {
                let row = pixel / width;
                let col = pixel % width;
                (
                    f64::from(mean[[row, col]]),
                    f64::from(variance[[row, col]]).sqrt(),
                )
            }
        }
    }
}

fn check_variance(variance: f64) -> Result<()> {
    if !variance.is_finite() || variance <= 0.0 {
        return Err(MtsegError::InvalidModel(format!(
            "variance must be positive and finite, got {variance}"
        )));
    }
    Ok(())
}

/// Estimate a global background model by iterative kappa-sigma clipping.
///
/// Starts from the full pixel population and repeatedly discards values
/// more than [`SIGMA_CLIP_KAPPA`] standard deviations from the running
/// mean, so bright sources stop inflating the noise estimate. The variance
/// is floored at [`MIN_BACKGROUND_VARIANCE`] so a flat image still yields a
/// usable model.
pub fn estimate_background(grid: &Grid) -> BackgroundModel {
    let mut kept: Vec<f32> = grid.data().iter().copied().collect();
    let (mut mean, mut variance) = mean_variance(&kept);

    for _ in 0..SIGMA_CLIP_MAX_ITERATIONS {
        let sigma = variance.sqrt();
        let lo = mean - SIGMA_CLIP_KAPPA * sigma;
        let hi = mean + SIGMA_CLIP_KAPPA * sigma;
        let before = kept.len();
        kept.retain(|&v| f64::from(v) >= lo && f64::from(v) <= hi);
        if kept.len() == before {
            break;
        }
        (mean, variance) = mean_variance(&kept);
    }

    BackgroundModel::Global {
        mean,
        variance: variance.max(MIN_BACKGROUND_VARIANCE),
    }
}

/// Sample mean and variance of a pixel population.
fn mean_variance(values: &[f32]) -> (f64, f64) {
    let n = values.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    let mean = sum / n;
    let variance: f64 = values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}
