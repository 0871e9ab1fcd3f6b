//! PNG snapshots of the grid, one pixel per cell

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use smelt_core::World;

/// Material colors of every cell, empty cells drawn in `background`
pub fn render(world: &World, background: [u8; 4]) -> RgbaImage {
    let materials = world.materials();
    ImageBuffer::from_fn(world.width() as u32, world.height() as u32, |x, y| {
        let material = world.grid().material(x as usize, y as usize);
        Rgba(materials.display_color(material, background))
    })
}

/// Render and save as PNG, creating parent directories
pub fn save_png(world: &World, background: [u8; 4], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create snapshot directory: {}", parent.display()))?;
    }

    render(world, background)
        .save(path)
        .with_context(|| format!("Failed to save snapshot: {}", path.display()))?;

    log::info!("Snapshot saved: {}", path.display());
    Ok(())
}
