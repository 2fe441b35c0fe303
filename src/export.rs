//! PNG export for the generated grids.

use image::{ImageBuffer, Rgb, Rgba};
use std::error::Error;
use std::path::Path;

use crate::biomes::BiomeColor;
use crate::regions::RegionLabel;
use crate::tilemap::Tilemap;
use crate::voronoi::label_shade;

/// Export a scalar field as a grayscale PNG, min-max stretched so the full
/// value range maps to black..white. A constant field exports as black.
pub fn export_scalar<P: AsRef<Path>>(field: &Tilemap<f32>, path: P) -> Result<(), Box<dyn Error>> {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for (_, _, v) in field.iter() {
        min = min.min(*v);
        max = max.max(*v);
    }
    let range = if max > min { max - min } else { 1.0 };

    let mut img = ImageBuffer::new(field.width as u32, field.height as u32);
    for (x, y, v) in field.iter() {
        let shade = ((*v - min) / range * 255.0) as u8;
        img.put_pixel(x as u32, y as u32, Rgb([shade, shade, shade]));
    }

    img.save(path)?;
    Ok(())
}

/// Export a label grid, sea black and each region in its stable shade.
pub fn export_labels<P: AsRef<Path>>(
    labels: &Tilemap<RegionLabel>,
    path: P,
) -> Result<(), Box<dyn Error>> {
    let mut img = ImageBuffer::new(labels.width as u32, labels.height as u32);
    for (x, y, label) in labels.iter() {
        let shade = (label_shade(*label) * 255.0) as u8;
        let pixel = if label.is_sea() {
            Rgb([0, 0, 0])
        } else {
            // Hue the shade slightly so adjacent regions separate better
            // than pure gray steps would.
            Rgb([shade, shade.rotate_left(3), shade.rotate_left(5)])
        };
        img.put_pixel(x as u32, y as u32, pixel);
    }

    img.save(path)?;
    Ok(())
}

/// Export the colored biome grid as an RGBA PNG.
pub fn export_biomes<P: AsRef<Path>>(
    biomes: &Tilemap<BiomeColor>,
    path: P,
) -> Result<(), Box<dyn Error>> {
    let mut img = ImageBuffer::new(biomes.width as u32, biomes.height as u32);
    for (x, y, color) in biomes.iter() {
        img.put_pixel(x as u32, y as u32, Rgba(color.0));
    }

    img.save(path)?;
    Ok(())
}
