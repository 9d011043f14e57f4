use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use mtseg_core::detection::labels::relabel;
use mtseg_core::detection::{DetectionConfig, ObjectStats};
use mtseg_core::maxtree::Connectivity;
use mtseg_core::pipeline::run_detection;

use crate::load::{load_grid, save_label_map};

#[derive(Clone, ValueEnum)]
pub enum ConnectivityArg {
    Four,
    Eight,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Input image files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for output files (defaults to each input's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// TOML detection config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Significance threshold in background standard deviations
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Pixel connectivity
    #[arg(long, value_enum)]
    pub connectivity: Option<ConnectivityArg>,

    /// Minimum object area in pixels
    #[arg(long)]
    pub min_area: Option<usize>,

    /// Disable nested sub-object detection
    #[arg(long)]
    pub no_nesting: bool,

    /// Background adaptation rate for nested tests
    #[arg(long)]
    pub move_factor: Option<f64>,

    /// Shuffle output label identities
    #[arg(long)]
    pub shuffle: bool,

    /// Write an object catalog CSV next to each label map
    #[arg(long)]
    pub catalog: bool,
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(args: &DetectArgs) -> Result<DetectionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => DetectionConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.significance_threshold = threshold;
    }
    if let Some(ref conn) = args.connectivity {
        config.connectivity = match conn {
            ConnectivityArg::Four => Connectivity::Four,
            ConnectivityArg::Eight => Connectivity::Eight,
        };
    }
    if let Some(min_area) = args.min_area {
        config.min_area = min_area;
    }
    if args.no_nesting {
        config.nesting_enabled = false;
    }
    if let Some(move_factor) = args.move_factor {
        config.move_factor = move_factor;
    }
    Ok(config)
}

fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}{}", stem.to_string_lossy(), suffix))
}

fn write_catalog(path: &Path, objects: &[ObjectStats]) -> Result<()> {
    let mut csv =
        String::from("label,area,flux,peak,centroid_row,centroid_col,min_row,max_row,min_col,max_col\n");
    for obj in objects {
        let _ = writeln!(
            csv,
            "{},{},{:.6},{:.6},{:.3},{:.3},{},{},{},{}",
            obj.label,
            obj.area,
            obj.flux,
            obj.peak,
            obj.centroid.0,
            obj.centroid.1,
            obj.bbox.0,
            obj.bbox.1,
            obj.bbox.2,
            obj.bbox.3,
        );
    }
    std::fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))
}

/// Process a single image: detect, relabel, write outputs.
fn process(input: &Path, config: &DetectionConfig, args: &DetectArgs) -> Result<usize> {
    let grid = load_grid(input)?;
    let output = run_detection(&grid, config)?;
    let id_map = relabel(&output.id_map, args.shuffle);

    let labels_path = output_path(input, args.output_dir.as_deref(), "_labels.png");
    save_label_map(&labels_path, &id_map)?;

    if args.catalog {
        let catalog_path = output_path(input, args.output_dir.as_deref(), "_objects.csv");
        write_catalog(&catalog_path, &output.objects)?;
    }

    Ok(output.significant.len())
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let config = resolve_config(args)?;

    if let Some(ref dir) = args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    // Images are independent: batch runs fan out across the thread pool.
    let results: Vec<(PathBuf, Result<usize>)> = if args.inputs.len() > 1 {
        let pb = ProgressBar::new(args.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        pb.set_message("Detecting");
        let results = args
            .inputs
            .par_iter()
            .map(|input| {
                let result = process(input, &config, args);
                pb.inc(1);
                (input.clone(), result)
            })
            .collect();
        pb.finish_with_message("Done");
        results
    } else {
        args.inputs
            .iter()
            .map(|input| (input.clone(), process(input, &config, args)))
            .collect()
    };

    let mut failures = 0usize;
    for (input, result) in &results {
        match result {
            Ok(count) => println!(
                "{}: {} object(s)",
                input.display(),
                style(count).bold()
            ),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {:#}", input.display(), err);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} image(s) failed", results.len());
    }
    Ok(())
}
