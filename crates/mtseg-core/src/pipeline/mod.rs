use ndarray::Array2;
use tracing::info;

use crate::detection::background::{estimate_background, BackgroundModel};
use crate::detection::catalog::{measure_objects, ObjectStats};
use crate::detection::config::DetectionConfig;
use crate::detection::filter::{filter_tree, Segmentation};
use crate::error::Result;
use crate::grid::Grid;
use crate::maxtree::{build_max_tree, compute_attributes, NodeId};

/// Everything one detection run produces.
#[derive(Clone, Debug)]
pub struct DetectionOutput {
    /// Per-pixel object labels; 0 is background.
    pub id_map: Array2<u32>,
    /// Accepted node ids, label `i + 1` for `significant[i]`.
    pub significant: Vec<NodeId>,
    /// Per-object measurements, sorted by label.
    pub objects: Vec<ObjectStats>,
    /// The noise model the run was judged against.
    pub background: BackgroundModel,
}

/// Run the full detection pipeline, estimating the noise model from the
/// grid itself.
pub fn run_detection(grid: &Grid, config: &DetectionConfig) -> Result<DetectionOutput> {
    let background = estimate_background(grid);
    run_detection_with_model(grid, &background, config)
}

/// Run the full detection pipeline against a caller-supplied noise model.
///
/// Grid -> max-tree -> attributes -> significance filter -> label map ->
/// object measurement. The grid is read-only throughout and the tree never
/// outlives the run.
pub fn run_detection_with_model(
    grid: &Grid,
    background: &BackgroundModel,
    config: &DetectionConfig,
) -> Result<DetectionOutput> {
    info!(
        width = grid.width(),
        height = grid.height(),
        connectivity = ?config.connectivity,
        "Building max-tree"
    );
    let mut tree = build_max_tree(grid, config.connectivity);
    info!(nodes = tree.node_count(), "Max-tree built");

    compute_attributes(&mut tree);

    let Segmentation { id_map, significant } = filter_tree(&mut tree, background, config)?;
    info!(objects = significant.len(), "Significance filtering complete");

    let objects = measure_objects(grid, &id_map);

    Ok(DetectionOutput {
        id_map,
        significant,
        objects,
        background: background.clone(),
    })
}
