use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::grid::Grid;

use super::{Connectivity, MaxTree, MaxTreeNode, NodeId};

/// Sentinel for pixels the union-find has not reached yet.
const UNPROCESSED: u32 = u32::MAX;

/// Build the max-tree of `grid` with the given pixel connectivity.
///
/// Pixels are processed in decreasing-intensity order (raster order on
/// plateaus, so the result is deterministic) over a union-find with path
/// compression and union by rank. A canonicalization pass then collapses
/// equal-level chains so each (level, component) pair is represented by
/// exactly one node, and the pixel-level forest is compressed into the node
/// arena.
///
/// A completely flat image yields a single root node covering every pixel.
pub fn build_max_tree(grid: &Grid, connectivity: Connectivity) -> MaxTree {
    let width = grid.width();
    let height = grid.height();
    let n = width * height;

    let values: Vec<f32> = grid.data().iter().copied().collect();
    let order = sort_pixels(&values);

    // Pixel-level tree parents, plus the union-find forest. All pre-sized
    // to the pixel count.
    let mut parent: Vec<u32> = vec![UNPROCESSED; n];
    let mut set_parent: Vec<u32> = vec![UNPROCESSED; n];
    let mut set_rank: Vec<u8> = vec![0; n];
    // Most recently processed pixel of each set: the current subtree root.
    let mut set_top: Vec<u32> = vec![0; n];

    let offsets = connectivity.offsets();

    for &p in &order {
        let pi = p as usize;
        parent[pi] = p;
        set_parent[pi] = p;
        set_top[pi] = p;

        let row = (pi / width) as isize;
        let col = (pi % width) as isize;

        for &(dr, dc) in offsets {
            let nr = row + dr;
            let nc = col + dc;
            if nr < 0 || nr >= height as isize || nc < 0 || nc >= width as isize {
                continue;
            }
            let q = nr as usize * width + nc as usize;
            if set_parent[q] == UNPROCESSED {
                // Neighbor not reached yet: lower level, or a later
                // plateau tie.
                continue;
            }
            let set = find(&mut set_parent, q as u32);
            let top = set_top[set as usize];
            if top != p {
                // Attach the neighbor's partial subtree under this pixel.
                parent[top as usize] = p;
                let own = find(&mut set_parent, p);
                let merged = union(&mut set_parent, &mut set_rank, set, own);
                set_top[merged as usize] = p;
            }
        }
    }

    canonicalize(&values, &order, &mut parent);
    compress(&values, &order, &parent, width, height, connectivity)
}

/// Pixel indices sorted by decreasing intensity, ties broken by raster
/// order. The composite key is unique, so the unstable parallel sort is
/// still deterministic.
fn sort_pixels(values: &[f32]) -> Vec<u32> {
    let mut order: Vec<u32> = (0..values.len() as u32).collect();
    let by_level_desc = |a: &u32, b: &u32| {
        values[*b as usize]
            .total_cmp(&values[*a as usize])
            .then_with(|| a.cmp(b))
    };
    if values.len() >= PARALLEL_PIXEL_THRESHOLD {
        order.par_sort_unstable_by(by_level_desc);
    } else {
        order.sort_unstable_by(by_level_desc);
    }
    order
}

/// Iterative find with full path compression.
fn find(set_parent: &mut [u32], x: u32) -> u32 {
    let mut root = x;
    while set_parent[root as usize] != root {
        root = set_parent[root as usize];
    }
    let mut cur = x;
    while set_parent[cur as usize] != root {
        let next = set_parent[cur as usize];
        set_parent[cur as usize] = root;
        cur = next;
    }
    root
}

/// Union by rank; returns the surviving set representative.
fn union(set_parent: &mut [u32], set_rank: &mut [u8], a: u32, b: u32) -> u32 {
    if a == b {
        return a;
    }
    let (small, big) = if set_rank[a as usize] < set_rank[b as usize] {
        (a, b)
    } else {
        (b, a)
    };
    set_parent[small as usize] = big;
    if set_rank[small as usize] == set_rank[big as usize] {
        set_rank[big as usize] += 1;
    }
    big
}

/// Re-point every pixel whose grandparent shares its parent's level, so all
/// parent pointers land on canonical pixels. Runs in reverse processing
/// order (root first); a pixel's parent chain is already canonical when the
/// pixel is visited.
fn canonicalize(values: &[f32], order: &[u32], parent: &mut [u32]) {
    for &p in order.iter().rev() {
        let q = parent[p as usize] as usize;
        let qq = parent[q];
        if values[qq as usize] == values[q] {
            parent[p as usize] = qq;
        }
    }
}

/// Compress the canonicalized pixel forest into the node arena.
///
/// Canonical pixels become nodes, ids assigned root-first so every parent id
/// is smaller than its children's.
fn compress(
    values: &[f32],
    order: &[u32],
    parent: &[u32],
    width: usize,
    height: usize,
    connectivity: Connectivity,
) -> MaxTree {
    let n = values.len();
    let mut node_id: Vec<u32> = vec![UNPROCESSED; n];
    let mut nodes: Vec<MaxTreeNode> = Vec::new();

    for &p in order.iter().rev() {
        let pi = p as usize;
        let q = parent[pi];
        if q != p && values[q as usize] == values[pi] {
            // Non-canonical: absorbed into the node at the same level.
            continue;
        }
        let id = nodes.len() as u32;
        node_id[pi] = id;
        nodes.push(MaxTreeNode {
            level: values[pi],
            // The canonical parent sits at a strictly lower level, so it was
            // already assigned earlier in this sweep.
            parent: (q != p).then(|| node_id[q as usize]),
            children: Vec::new(),
            canonical_pixel: p,
            area: 0,
            total_area: 0,
            power: 0.0,
            volume: 0.0,
            contrast: 0.0,
            significant: false,
        });
    }

    let mut node_of_pixel: Vec<NodeId> = vec![0; n];
    for p in 0..n {
        let id = if node_id[p] != UNPROCESSED {
            node_id[p]
        } else {
            node_id[parent[p] as usize]
        };
        node_of_pixel[p] = id;
        nodes[id as usize].area += 1;
    }

    for id in 1..nodes.len() as u32 {
        if let Some(pid) = nodes[id as usize].parent {
            nodes[pid as usize].children.push(id);
        }
    }

    MaxTree::new(nodes, node_of_pixel, width, height, connectivity)
}
