// source.rs - Depth map loading
//
// A depth image is read as 8-bit luma; brighter = nearer.
// A photograph goes through MiDaS instead (see midas.rs).

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};
use ndarray::Array2;
use stereogram_engine::depth;

use crate::midas;

pub fn load(path: &Path, photo: bool) -> Result<Array2<f32>> {
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    log::info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());

    if photo {
        Ok(midas::estimate_depth(&img))
    } else {
        Ok(luma_to_array(&img.to_luma8()))
    }
}

pub fn luma_to_array(img: &GrayImage) -> Array2<f32> {
    let (w, h) = img.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        img.get_pixel(x as u32, y as u32)[0] as f32
    })
}

/// Grayscale preview of a depth map, rescaled to its own range.
pub fn depth_to_image(raw: &Array2<f32>) -> DynamicImage {
    let mut norm = raw.clone();
    depth::normalize(&mut norm);
    let (h, w) = norm.dim();
    let gray = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        image::Luma([(norm[[y as usize, x as usize]] * 255.0).round() as u8])
    });
    DynamicImage::ImageLuma8(gray)
}
