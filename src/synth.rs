// synth.rs - Autostereogram fill
//
// Row-major, left to right. Columns below the pattern width copy the
// tile (rows wrap). Every later column copies an earlier cell of the
// same row, `w - shift` columns back, where shift grows with depth.
// Chains of such copies always end in the reference band.
//
// Rows never read each other, but within a row the order is fixed.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use crate::depth;
use crate::error::{Result, StereoError};
use crate::pattern::PatternTile;

/// Horizontal disparity for a normalized depth sample.
#[inline]
pub fn shift(depth: f32, focal_length: f32, pattern_width: usize) -> isize {
    (depth * focal_length * pattern_width as f32).floor() as isize
}

/// Pad (when `center`), normalize, then fill.
pub fn synthesize(
    depth_map: ArrayView2<'_, f32>,
    pattern: &PatternTile,
    focal_length: f32,
    center: bool,
) -> Result<Array2<f32>> {
    let pad = if center { pattern.width() / 2 } else { 0 };
    let prepared = depth::prepare(depth_map, pad)?;
    fill(prepared.map.view(), pattern, focal_length)
}

/// Fill an output the shape of `depth`, whose samples must already be in [0, 1].
pub fn fill(depth: ArrayView2<'_, f32>, pattern: &PatternTile, focal_length: f32) -> Result<Array2<f32>> {
    let mut out = Array2::<f32>::zeros(depth.raw_dim());

    for (r, (out_row, depth_row)) in out
        .axis_iter_mut(Axis(0))
        .zip(depth.axis_iter(Axis(0)))
        .enumerate()
    {
        fill_row(r, depth_row, out_row, pattern, focal_length)?;
    }

    log::debug!(
        "filled {:?} stereogram from {}x{} tile",
        out.dim(),
        pattern.height(),
        pattern.width()
    );
    Ok(out)
}

fn fill_row(
    r: usize,
    depth: ArrayView1<'_, f32>,
    mut out: ArrayViewMut1<'_, f32>,
    pattern: &PatternTile,
    focal_length: f32,
) -> Result<()> {
    let w = pattern.width();

    for c in 0..out.len() {
        if c < w {
            out[c] = pattern.get(r, c);
            continue;
        }

        let mut s = shift(depth[c], focal_length, w);
        if focal_length <= 1.0 {
            // nearest samples at focal 1 would point at column c itself
            s = s.min(w as isize - 1);
        }
        let src = c as isize - w as isize + s;
        if src < 0 || src >= c as isize {
            return Err(StereoError::ShiftOutOfRange { row: r, col: c, index: src });
        }
        out[c] = out[src as usize];
    }
    Ok(())
}
