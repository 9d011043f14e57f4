use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MIN_AREA, DEFAULT_MOVE_FACTOR, DEFAULT_SIGNIFICANCE_SIGMA};
use crate::maxtree::Connectivity;

/// Configuration for significance filtering of a max-tree.
///
/// Passed explicitly into each component call; there is no ambient state,
/// so independent images can be processed concurrently with different
/// settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Significance threshold, in background standard deviations.
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,
    /// Pixel neighborhood for component construction.
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Reject nodes whose subtree covers fewer pixels than this.
    #[serde(default = "default_min_area")]
    pub min_area: usize,
    /// Allow sub-objects nested inside accepted objects.
    #[serde(default = "default_nesting_enabled")]
    pub nesting_enabled: bool,
    /// Background adaptation rate for the nested-object test.
    #[serde(default = "default_move_factor")]
    pub move_factor: f64,
}

fn default_significance_threshold() -> f64 {
    DEFAULT_SIGNIFICANCE_SIGMA
}
fn default_min_area() -> usize {
    DEFAULT_MIN_AREA
}
fn default_nesting_enabled() -> bool {
    true
}
fn default_move_factor() -> f64 {
    DEFAULT_MOVE_FACTOR
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            significance_threshold: DEFAULT_SIGNIFICANCE_SIGMA,
            connectivity: Connectivity::default(),
            min_area: DEFAULT_MIN_AREA,
            nesting_enabled: true,
            move_factor: DEFAULT_MOVE_FACTOR,
        }
    }
}
