/// Minimum pixel count (h*w) to use Rayon for the builder's intensity sort.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default significance threshold, in background standard deviations.
pub const DEFAULT_SIGNIFICANCE_SIGMA: f64 = 5.0;

/// Default minimum subtree area (pixels) for a node to count as an object.
pub const DEFAULT_MIN_AREA: usize = 5;

/// Default background adaptation rate for the nested-object test.
pub const DEFAULT_MOVE_FACTOR: f64 = 0.5;

/// Clipping width (in standard deviations) for iterative kappa-sigma
/// background estimation.
pub const SIGMA_CLIP_KAPPA: f64 = 3.0;

/// Maximum number of kappa-sigma clipping iterations.
pub const SIGMA_CLIP_MAX_ITERATIONS: usize = 5;

/// Variance floor applied by the background estimator. A perfectly flat
/// image has zero sample variance; the floor keeps the z-test defined.
pub const MIN_BACKGROUND_VARIANCE: f64 = 1e-12;
