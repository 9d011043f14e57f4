mod common;

use ndarray::Array2;

use mtseg_core::detection::DetectionConfig;
use mtseg_core::grid::Grid;
use mtseg_core::pipeline::run_detection;

use common::single_peak;

/// Background 1.0 with two 2x2 blocks at 20.0.
fn two_blocks() -> Grid {
    let mut data = Array2::<f32>::from_elem((16, 16), 1.0);
    for (r0, c0) in [(2, 2), (10, 10)] {
        for r in r0..r0 + 2 {
            for c in c0..c0 + 2 {
                data[[r, c]] = 20.0;
            }
        }
    }
    Grid::new(data).expect("valid test grid")
}

#[test]
fn test_two_blocks_end_to_end() {
    let grid = two_blocks();
    let config = DetectionConfig {
        min_area: 2,
        ..DetectionConfig::default()
    };
    let output = run_detection(&grid, &config).unwrap();

    assert_eq!(output.significant.len(), 2);
    assert_eq!(output.objects.len(), 2);

    let mut bboxes: Vec<_> = output.objects.iter().map(|o| o.bbox).collect();
    bboxes.sort_unstable();
    assert_eq!(bboxes, vec![(2, 3, 2, 3), (10, 11, 10, 11)]);

    for obj in &output.objects {
        assert_eq!(obj.area, 4);
        assert!((obj.flux - 80.0).abs() < 1e-6);
        assert_eq!(obj.peak, 20.0);
        let center = ((obj.bbox.0 + obj.bbox.1) as f64 / 2.0, (obj.bbox.2 + obj.bbox.3) as f64 / 2.0);
        assert!((obj.centroid.0 - center.0).abs() < 1e-9);
        assert!((obj.centroid.1 - center.1).abs() < 1e-9);
    }

    let labeled = output.id_map.iter().filter(|&&l| l != 0).count();
    assert_eq!(labeled, 8);
    assert_eq!(output.id_map[[0, 0]], 0);
}

#[test]
fn test_single_peak_end_to_end() {
    let grid = single_peak(5, 1.0, 100.0);
    let config = DetectionConfig {
        min_area: 1,
        ..DetectionConfig::default()
    };
    let output = run_detection(&grid, &config).unwrap();

    assert_eq!(output.significant.len(), 1);
    assert_eq!(output.objects.len(), 1);
    assert_eq!(output.objects[0].area, 1);
    assert_eq!(output.id_map[[2, 2]], 1);
    let labeled = output.id_map.iter().filter(|&&l| l != 0).count();
    assert_eq!(labeled, 1);
}

#[test]
fn test_flat_image_end_to_end() {
    let grid = Grid::new(Array2::from_elem((4, 4), 5.0)).unwrap();
    let output = run_detection(&grid, &DetectionConfig::default()).unwrap();

    assert!(output.significant.is_empty());
    assert!(output.objects.is_empty());
    assert!(output.id_map.iter().all(|&l| l == 0));
}

#[test]
fn test_pipeline_is_deterministic() {
    let grid = two_blocks();
    let config = DetectionConfig::default();

    let a = run_detection(&grid, &config).unwrap();
    let b = run_detection(&grid, &config).unwrap();

    assert_eq!(a.id_map, b.id_map);
    assert_eq!(a.significant, b.significant);
}
