mod common;

use ndarray::Array2;

use mtseg_core::error::MtsegError;
use mtseg_core::grid::Grid;
use mtseg_core::maxtree::{build_max_tree, Connectivity};

use common::{grid_from, patterned, single_peak};

#[test]
fn test_flat_image_single_node() {
    let grid = Grid::new(Array2::from_elem((4, 4), 5.0)).unwrap();
    let tree = build_max_tree(&grid, Connectivity::Eight);

    assert_eq!(tree.node_count(), 1);
    let root = tree.root();
    assert_eq!(root.level, 5.0);
    assert_eq!(root.area, 16);
    assert!(root.parent.is_none());
    assert!(root.children.is_empty());
    assert!(tree.node_of_pixel().iter().all(|&id| id == 0));
}

#[test]
fn test_single_peak_two_nodes() {
    let grid = single_peak(5, 1.0, 100.0);
    let tree = build_max_tree(&grid, Connectivity::Eight);

    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.root().level, 1.0);
    assert_eq!(tree.root().area, 24);
    assert_eq!(tree.root().children, vec![1]);

    let peak = tree.node(1);
    assert_eq!(peak.level, 100.0);
    assert_eq!(peak.area, 1);
    assert_eq!(peak.parent, Some(0));
    assert_eq!(peak.canonical_pixel, 12);

    for (pixel, &id) in tree.node_of_pixel().iter().enumerate() {
        let expected = if pixel == 12 { 1 } else { 0 };
        assert_eq!(id, expected, "pixel {pixel} mapped to wrong node");
    }
}

#[test]
fn test_monotonicity_invariant() {
    let grid = patterned(8);
    let tree = build_max_tree(&grid, Connectivity::Eight);

    for id in 1..tree.node_count() as u32 {
        let node = tree.node(id);
        let parent = tree.node(node.parent.expect("non-root node has a parent"));
        assert!(
            node.level > parent.level,
            "node {id} at level {} under parent at level {}",
            node.level,
            parent.level
        );
    }
}

#[test]
fn test_partition_invariant() {
    let grid = patterned(8);
    let tree = build_max_tree(&grid, Connectivity::Four);

    // Every pixel maps to exactly one node, own areas sum to the pixel
    // count, and a pixel's canonical node sits at the pixel's own level.
    let own_total: usize = tree.nodes().iter().map(|n| n.area).sum();
    assert_eq!(own_total, 64);
    assert_eq!(tree.node_of_pixel().len(), 64);

    for (pixel, &id) in tree.node_of_pixel().iter().enumerate() {
        let value = grid.data()[[pixel / 8, pixel % 8]];
        assert_eq!(tree.node(id).level, value, "pixel {pixel}");
    }
}

#[test]
fn test_builder_is_deterministic() {
    let grid = patterned(8);
    let a = build_max_tree(&grid, Connectivity::Eight);
    let b = build_max_tree(&grid, Connectivity::Eight);

    assert_eq!(a.node_count(), b.node_count());
    for id in 0..a.node_count() as u32 {
        let (x, y) = (a.node(id), b.node(id));
        assert_eq!(x.level, y.level);
        assert_eq!(x.parent, y.parent);
        assert_eq!(x.area, y.area);
        assert_eq!(x.canonical_pixel, y.canonical_pixel);
        assert_eq!(x.children, y.children);
    }
    assert_eq!(a.node_of_pixel(), b.node_of_pixel());
}

#[test]
fn test_connectivity_splits_diagonal_pair() {
    let grid = grid_from(vec![vec![5.0, 1.0], vec![1.0, 5.0]]);

    let eight = build_max_tree(&grid, Connectivity::Eight);
    assert_eq!(eight.node_count(), 2);
    let bright: Vec<_> = eight.nodes().iter().filter(|n| n.level == 5.0).collect();
    assert_eq!(bright.len(), 1);
    assert_eq!(bright[0].area, 2);

    let four = build_max_tree(&grid, Connectivity::Four);
    assert_eq!(four.node_count(), 3);
    let bright: Vec<_> = four.nodes().iter().filter(|n| n.level == 5.0).collect();
    assert_eq!(bright.len(), 2);
    assert!(bright.iter().all(|n| n.area == 1));
}

#[test]
fn test_plateau_merges_to_one_node_per_level() {
    // Two levels only; each must come out as exactly one node.
    let grid = grid_from(vec![
        vec![1.0, 1.0, 1.0, 1.0],
        vec![1.0, 3.0, 3.0, 1.0],
        vec![1.0, 3.0, 3.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0],
    ]);
    let tree = build_max_tree(&grid, Connectivity::Eight);

    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.root().area, 12);
    assert_eq!(tree.node(1).area, 4);
    assert_eq!(tree.node(1).level, 3.0);
}

#[test]
fn test_rejects_empty_grid() {
    let err = Grid::new(Array2::<f32>::zeros((0, 4))).unwrap_err();
    assert!(matches!(err, MtsegError::EmptyGrid { .. }));
}

#[test]
fn test_rejects_non_finite_values() {
    let mut data = Array2::<f32>::from_elem((3, 3), 1.0);
    data[[1, 2]] = f32::NAN;
    let err = Grid::new(data).unwrap_err();
    assert!(matches!(err, MtsegError::NonFinitePixel { row: 1, col: 2 }));
}
