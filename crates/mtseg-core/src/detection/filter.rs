use ndarray::Array2;
use tracing::warn;

use crate::error::{MtsegError, Result};
use crate::maxtree::{MaxTree, NodeId};

use super::background::BackgroundModel;
use super::config::DetectionConfig;
use super::labels::build_label_map;

/// Result of significance filtering: the per-pixel label map plus the
/// accepted nodes.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// Per-pixel object labels; 0 is background.
    pub id_map: Array2<u32>,
    /// Accepted nodes in top-down discovery order. The label of
    /// `significant[i]` is `i + 1`.
    pub significant: Vec<NodeId>,
}

/// Decide which nodes are statistically inconsistent with pure noise and
/// produce the per-pixel label map.
///
/// Each node's mean power density (subtree power / subtree area) is put
/// through a one-sided z-test against the background model. Nodes with no
/// significant ancestor are tested against the background mean. Under a
/// significant ancestor the baseline is adapted past the immediate parent's
/// level by `move_factor`, so a nested node must stand out from the object
/// it sits in, not just from the sky; such nodes are only eligible at all
/// when nesting is enabled. The root is judged on its level rather than its
/// subtree mean, since its subtree is the whole image.
///
/// Requires computed attributes and a validated model; the tree topology is
/// never modified, only the `significant` flags.
pub fn filter_tree(
    tree: &mut MaxTree,
    background: &BackgroundModel,
    config: &DetectionConfig,
) -> Result<Segmentation> {
    background.validate(tree.width(), tree.height())?;
    if tree.root().total_area != tree.pixel_count() {
        return Err(MtsegError::MissingAttributes);
    }

    let n = tree.node_count();
    // Nearest significant ancestor (inclusive), carried root-to-leaf.
    let mut nearest: Vec<Option<NodeId>> = vec![None; n];
    let mut significant: Vec<NodeId> = Vec::new();

    for id in 0..n as u32 {
        let accepted = {
            let node = tree.node(id);
            let (mean, sigma) =
                background.mean_sigma_at(node.canonical_pixel as usize, tree.width());
            let ancestor = node.parent.and_then(|pid| nearest[pid as usize]);

            node.total_area >= config.min_area
                && match (node.parent, ancestor) {
                    (None, _) => {
                        let z = z_score(f64::from(node.level) - mean, node.total_area, sigma);
                        z >= config.significance_threshold
                    }
                    (Some(_), None) => {
                        let density = node.power / node.total_area as f64;
                        let z = z_score(density - mean, node.total_area, sigma);
                        z >= config.significance_threshold
                    }
                    (Some(pid), Some(_)) => {
                        config.nesting_enabled && {
                            let parent_level = f64::from(tree.node(pid).level);
                            let baseline = parent_level
                                + config.move_factor * (parent_level - mean).max(0.0);
                            let density = node.power / node.total_area as f64;
                            let z = z_score(density - baseline, node.total_area, sigma);
                            z >= config.significance_threshold
                        }
                    }
                }
        };

        tree.nodes_mut()[id as usize].significant = accepted;
        if accepted {
            significant.push(id);
            nearest[id as usize] = Some(id);
        } else {
            nearest[id as usize] = tree.node(id).parent.and_then(|pid| nearest[pid as usize]);
        }
    }

    if tree.root().significant {
        warn!("root component is significant; the whole image reads as one object");
    }

    let id_map = build_label_map(tree);
    Ok(Segmentation { id_map, significant })
}

/// One-sided z-score for a mean excess over `area` pixels.
fn z_score(excess: f64, area: usize, sigma: f64) -> f64 {
    excess * (area as f64).sqrt() / sigma
}
