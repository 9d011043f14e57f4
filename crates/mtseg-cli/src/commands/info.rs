use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mtseg_core::detection::{estimate_background, BackgroundModel, DetectionConfig};
use mtseg_core::maxtree::{build_max_tree, compute_attributes};

use crate::load::load_grid;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let grid = load_grid(&args.file)?;

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in grid.data().iter() {
        min = min.min(v);
        max = max.max(v);
    }

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", grid.width(), grid.height());
    println!("Pixels:      {}", grid.pixel_count());
    println!("Intensity:   [{min:.6}, {max:.6}]");

    let background = estimate_background(&grid);
    if let BackgroundModel::Global { mean, variance } = &background {
        println!("Background:  mean {:.6}, sigma {:.6}", mean, variance.sqrt());
    }

    let config = DetectionConfig::default();
    let mut tree = build_max_tree(&grid, config.connectivity);
    compute_attributes(&mut tree);
    println!("Tree nodes:  {}", tree.node_count());
    println!("Root level:  {:.6}", tree.root().level);

    Ok(())
}
