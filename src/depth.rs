// depth.rs - Depth map preparation
//
// Pads the map on the left with a copy of its own first columns, then
// rescales every sample into [0, 1]. 0 = far, 1 = near.

use ndarray::{Array2, ArrayView2};

use crate::error::{Result, StereoError};

/// How raw samples were mapped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `(v - min) / (max - min)`
    Scaled { min: f32, max: f32 },
    /// Every sample equal; all depths become 0 (no shift anywhere).
    Flat { value: f32 },
}

/// Padded depth map with samples in [0, 1].
#[derive(Debug, Clone)]
pub struct PreparedDepth {
    pub map: Array2<f32>,
    pub normalization: Normalization,
}

/// Pad by `pad` mirrored columns and normalize.
pub fn prepare(depth: ArrayView2<'_, f32>, pad: usize) -> Result<PreparedDepth> {
    check_samples(depth)?;
    let mut map = pad_left(depth, pad);
    let normalization = normalize(&mut map);
    log::debug!("prepared depth {:?} ({:?})", map.dim(), normalization);
    Ok(PreparedDepth { map, normalization })
}

/// Prepend a copy of the first `pad` columns. `pad` is capped at the map width.
pub fn pad_left(depth: ArrayView2<'_, f32>, pad: usize) -> Array2<f32> {
    let pad = pad.min(depth.ncols());
    if pad == 0 {
        return depth.to_owned();
    }
    let (h, w) = depth.dim();
    Array2::from_shape_fn((h, w + pad), |(r, c)| {
        if c < pad { depth[[r, c]] } else { depth[[r, c - pad]] }
    })
}

/// Rescale `map` in place to [0, 1] using its global range.
pub fn normalize(map: &mut Array2<f32>) -> Normalization {
    let (min, max) = map
        .iter()
        .fold((f32::MAX, f32::MIN), |(mn, mx), &v| (mn.min(v), mx.max(v)));

    if max <= min {
        log::warn!("depth map is flat ({}); output will carry no relief", min);
        map.fill(0.0);
        return Normalization::Flat { value: min };
    }

    // f64 so ranges wider than f32::MAX stay finite
    let (lo, range) = (min as f64, max as f64 - min as f64);
    map.mapv_inplace(|v| ((v as f64 - lo) / range).clamp(0.0, 1.0) as f32);
    Normalization::Scaled { min, max }
}

fn check_samples(depth: ArrayView2<'_, f32>) -> Result<()> {
    if depth.is_empty() {
        return Err(StereoError::EmptyDepthMap);
    }
    if let Some(((row, col), _)) = depth.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(StereoError::NonFiniteDepth { row, col });
    }
    Ok(())
}
