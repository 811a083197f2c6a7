// midas.rs - Monocular depth estimation (MiDaS)
//
// Runs the ONNX model on a photograph and returns a depth map at the
// photo's resolution, normalized to [0, 1] where 0 = far, 1 = near.

use anyhow::{Context, Result, bail};
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use ndarray::{Array2, Array4};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

const MIDAS_SIZE: u32 = 256;

// ImageNet normalization constants
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

pub fn estimate_depth(img: &DynamicImage) -> Array2<f32> {
    let (tw, th) = img.dimensions();
    let model_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/midas_small.onnx");

    if !model_path.exists() {
        log::warn!("MiDaS model not found at {}, using fallback", model_path.display());
        return fallback_depth(tw, th);
    }

    match run_midas(img, &model_path) {
        Ok((flat, ow, oh)) => bilinear_resize(&flat, ow, oh, tw as usize, th as usize),
        Err(e) => {
            log::warn!("MiDaS inference failed ({:#}), using fallback", e);
            fallback_depth(tw, th)
        }
    }
}

/// Raw model output as `(values, width, height)`.
fn run_midas(img: &DynamicImage, model_path: &Path) -> Result<(Vec<f32>, usize, usize)> {
    let mut session = Session::builder()
        .context("failed to create ONNX session")?
        .commit_from_file(model_path)
        .with_context(|| format!("failed to load {}", model_path.display()))?;

    log::info!("Running MiDaS...");
    let resized = img.resize_exact(MIDAS_SIZE, MIDAS_SIZE, FilterType::Lanczos3);

    let mut input = Array4::<f32>::zeros((1, 3, MIDAS_SIZE as usize, MIDAS_SIZE as usize));
    for y in 0..MIDAS_SIZE {
        for x in 0..MIDAS_SIZE {
            let p = resized.get_pixel(x, y);
            for c in 0..3 {
                input[[0, c, y as usize, x as usize]] = (p[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            }
        }
    }

    let input_val = Value::from_array(input).context("failed to build input tensor")?;
    let input_name = session.inputs.first().map(|i| i.name.clone()).unwrap_or_else(|| "image".into());
    let outputs = session.run(ort::inputs![input_name => input_val]).context("inference failed")?;
    let arr = outputs[0].try_extract_array::<f32>().context("unexpected output tensor")?;

    let (oh, ow) = output_dims(arr.shape())?;
    Ok((arr.iter().copied().collect(), ow, oh))
}

/// `(height, width)` of a depth output shaped `[1, 1, H, W]`, `[1, H, W]` or `[H, W]`.
fn output_dims(shape: &[usize]) -> Result<(usize, usize)> {
    let dims = match shape.len() {
        4 => (shape[2], shape[3]),
        3 => (shape[1], shape[2]),
        2 => (shape[0], shape[1]),
        _ => bail!("unexpected output shape {:?}", shape),
    };
    if dims.0 == 0 || dims.1 == 0 {
        bail!("empty output shape {:?}", shape);
    }
    Ok(dims)
}

/// Vertical gradient: top far, bottom near.
fn fallback_depth(w: u32, h: u32) -> Array2<f32> {
    Array2::from_shape_fn((h as usize, w as usize), |(y, _)| y as f32 / h as f32)
}

fn bilinear_resize(src: &[f32], sw: usize, sh: usize, tw: usize, th: usize) -> Array2<f32> {
    let (min_d, max_d) = src.iter().fold((f32::MAX, f32::MIN), |(mn, mx), &v| (mn.min(v), mx.max(v)));
    let range = (max_d - min_d).max(1e-6);
    let (sx, sy) = (sw as f32 / tw as f32, sh as f32 / th as f32);

    let sample = |x: usize, y: usize| {
        let v = src.get(y * sw + x).copied().unwrap_or(min_d);
        (v - min_d) / range
    };

    Array2::from_shape_fn((th, tw), |(y, x)| {
        let (fx, fy) = (x as f32 * sx, y as f32 * sy);
        let (x0, y0) = ((fx as usize).min(sw - 1), (fy as usize).min(sh - 1));
        let (x1, y1) = ((x0 + 1).min(sw - 1), (y0 + 1).min(sh - 1));
        let (tx, ty) = (fx.fract(), fy.fract());

        sample(x0, y0) * (1.0 - tx) * (1.0 - ty)
            + sample(x1, y0) * tx * (1.0 - ty)
            + sample(x0, y1) * (1.0 - tx) * ty
            + sample(x1, y1) * tx * ty
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_vertical_gradient() {
        let d = fallback_depth(4, 4);
        assert_eq!(d.dim(), (4, 4));
        assert_eq!(d[[0, 3]], 0.0);
        assert_eq!(d[[2, 1]], 0.5);
    }

    #[test]
    fn test_output_dims() {
        assert_eq!(output_dims(&[1, 1, 256, 192]).unwrap(), (256, 192));
        assert_eq!(output_dims(&[1, 256, 192]).unwrap(), (256, 192));
        assert_eq!(output_dims(&[64, 32]).unwrap(), (64, 32));

        let err = output_dims(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(err.to_string().contains("unexpected output shape"));
        assert!(output_dims(&[1, 0, 8]).is_err());
    }

    #[test]
    fn test_bilinear_resize_normalizes() {
        let src = [2.0, 4.0, 6.0, 8.0];
        let d = bilinear_resize(&src, 2, 2, 2, 2);
        assert_eq!(d[[0, 0]], 0.0);
        assert_eq!(d[[1, 1]], 1.0);
        assert!(d.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
