pub mod attributes;
pub mod builder;

pub use attributes::compute_attributes;
pub use builder::build_max_tree;

use serde::{Deserialize, Serialize};

/// Index of a node in the [`MaxTree`] arena.
pub type NodeId = u32;

/// Pixel neighborhood used when growing components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge-adjacent neighbors only.
    Four,
    /// Edge- and corner-adjacent neighbors.
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbor offsets as (row, col) deltas.
    pub(crate) fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &[(-1, 0), (0, -1), (0, 1), (1, 0)],
            Connectivity::Eight => &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
        }
    }
}

/// One component of the max-tree: the maximal connected set of pixels at or
/// above `level`, reachable through pixels at or above that level.
#[derive(Clone, Debug)]
pub struct MaxTreeNode {
    /// Threshold intensity of the component.
    pub level: f32,
    /// Arena index of the enclosing component; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Arena indices of directly nested components, ascending.
    pub children: Vec<NodeId>,
    /// Linear index of the node's canonical pixel.
    pub canonical_pixel: u32,
    /// Number of pixels whose canonical node is exactly this node.
    pub area: usize,
    /// Pixels in the whole subtree. Written by [`compute_attributes`].
    pub total_area: usize,
    /// Sum of level * area over the subtree. Written by [`compute_attributes`].
    pub power: f64,
    /// Subtree intensity excess above this node's level. Written by
    /// [`compute_attributes`].
    pub volume: f64,
    /// Level step up from the parent node; 0 for the root. Written by
    /// [`compute_attributes`].
    pub contrast: f32,
    /// Written only by the significance filter.
    pub significant: bool,
}

/// Max-tree of an intensity grid: a contiguous node arena plus a per-pixel
/// map to canonical nodes.
///
/// Node ids are topologically ordered: the root is id 0 and every node's
/// parent has a smaller id. Iterating ids ascending is a top-down traversal,
/// descending a bottom-up one, so no pass ever recurses.
#[derive(Clone, Debug)]
pub struct MaxTree {
    pub(crate) nodes: Vec<MaxTreeNode>,
    pub(crate) node_of_pixel: Vec<NodeId>,
    width: usize,
    height: usize,
    connectivity: Connectivity,
}

impl MaxTree {
    pub(crate) fn new(
        nodes: Vec<MaxTreeNode>,
        node_of_pixel: Vec<NodeId>,
        width: usize,
        height: usize,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            nodes,
            node_of_pixel,
            width,
            height,
            connectivity,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &MaxTreeNode {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[MaxTreeNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [MaxTreeNode] {
        &mut self.nodes
    }

    /// The root node (id 0), covering every pixel at the global minimum level.
    pub fn root(&self) -> &MaxTreeNode {
        &self.nodes[0]
    }

    /// Canonical node id for each pixel, in raster order.
    pub fn node_of_pixel(&self) -> &[NodeId] {
        &self.node_of_pixel
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }
}
