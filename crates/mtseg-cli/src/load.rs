use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;

use mtseg_core::grid::Grid;

/// Load an image file as a grayscale intensity grid.
pub fn load_grid(path: &Path) -> Result<Grid> {
    let img =
        image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let luma = img.to_luma32f();
    let (width, height) = luma.dimensions();
    let data = Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())
        .context("Image buffer has unexpected shape")?;
    Ok(Grid::new(data)?)
}

/// Save a label map as a 16-bit grayscale PNG. Labels above u16::MAX are
/// clamped; runs producing that many objects should use the CSV catalog.
pub fn save_label_map(path: &Path, id_map: &Array2<u32>) -> Result<()> {
    let (h, w) = id_map.dim();
    let pixels: Vec<u16> = id_map
        .iter()
        .map(|&v| v.min(u32::from(u16::MAX)) as u16)
        .collect();
    let buffer =
        image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
            .context("Label map buffer has unexpected shape")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
