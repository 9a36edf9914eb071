//! PNG export of the height field and its derived maps.

use glam::DVec3;
use image::{GrayImage, ImageBuffer, Rgb, RgbImage};

use crate::terrain::Terrain;

/// Write the height field as an 8-bit grayscale PNG.
///
/// Heights map linearly from `[min, max]` onto `[0, 255]`; a flat field
/// writes solid mid-gray.
pub fn export_heightmap(terrain: &Terrain, path: &str) -> Result<(), image::ImageError> {
    let range = terrain.max_height() - terrain.min_height();
    let mut img: GrayImage =
        ImageBuffer::new(terrain.width() as u32, terrain.height() as u32);

    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            let shade = if range > 0.0 {
                ((terrain.height_at(x, y) - terrain.min_height()) / range * 255.0) as u8
            } else {
                128
            };
            img.put_pixel(x as u32, y as u32, image::Luma([shade]));
        }
    }

    img.save(path)
}

/// Write the surface normals as an RGB PNG.
///
/// The x and y components map from `[-1, 1]` onto the red and green
/// channels; z keeps its raw `[0, 1]` range in blue. Degenerate NaN
/// normals encode as the straight-up color.
pub fn export_normal_map(
    terrain: &Terrain,
    path: &str,
    amplification: f64,
) -> Result<(), image::ImageError> {
    let mut img: RgbImage =
        ImageBuffer::new(terrain.width() as u32, terrain.height() as u32);

    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            let normal = terrain.normal_at(x, y, amplification);
            let normal = if normal.is_nan() { DVec3::Z } else { normal };

            let r = ((1.0 + normal.x) / 2.0 * 255.0) as u8;
            let g = ((1.0 + normal.y) / 2.0 * 255.0) as u8;
            let b = (normal.z * 255.0) as u8;
            img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
        }
    }

    img.save(path)
}

/// Write a hillshaded relief PNG.
///
/// Lambert shading under a fixed light from the northwest, with a small
/// ambient floor so unlit slopes stay readable.
pub fn export_shaded(
    terrain: &Terrain,
    path: &str,
    amplification: f64,
) -> Result<(), image::ImageError> {
    let light_dir = DVec3::new(-1.0, -1.0, 2.0).normalize();
    let ambient = 0.4;

    let mut img: GrayImage =
        ImageBuffer::new(terrain.width() as u32, terrain.height() as u32);

    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            let normal = terrain.normal_at(x, y, amplification);
            let normal = if normal.is_nan() { DVec3::Z } else { normal };

            let diffuse = normal.dot(light_dir).max(0.0);
            let shade = ambient + (1.0 - ambient) * diffuse;
            img.put_pixel(
                x as u32,
                y as u32,
                image::Luma([(shade * 255.0).clamp(0.0, 255.0) as u8]),
            );
        }
    }

    img.save(path)
}
