use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod depth;
pub mod error;
pub mod pattern;
pub mod synth;

pub use config::StereoConfig;
pub use depth::{Normalization, PreparedDepth};
pub use error::{Result, StereoError};
pub use pattern::PatternTile;

// ============================================================================
// Pipeline
// ============================================================================

/// Validate `config`, draw a pattern tile sized from `depth`, synthesize.
pub fn generate<R: Rng>(depth: ArrayView2<'_, f32>, config: &StereoConfig, rng: &mut R) -> Result<Array2<f32>> {
    config.validate()?;
    if depth.is_empty() {
        return Err(StereoError::EmptyDepthMap);
    }
    let pattern = PatternTile::generate(depth.dim(), config.tile_density, config.quant_levels, rng)?;
    synth::synthesize(depth, &pattern, config.effective_focal_length(), config.center)
}

/// Row-major `width * height` samples as a `(height, width)` map.
pub fn depth_from_slice(width: u32, height: u32, samples: &[f32]) -> Result<Array2<f32>> {
    let (w, h) = (width as usize, height as usize);
    let Some(expected) = w.checked_mul(h) else {
        return Err(StereoError::DepthShape { expected: usize::MAX, actual: samples.len() });
    };
    if samples.len() != expected {
        return Err(StereoError::DepthShape { expected, actual: samples.len() });
    }
    Array2::from_shape_vec((h, w), samples.to_vec())
        .map_err(|_| StereoError::DepthShape { expected, actual: samples.len() })
}

/// Deterministic pattern source for a given seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ============================================================================
// WASM facade
// ============================================================================

#[wasm_bindgen]
pub struct Stereogram {
    w: u32,
    h: u32,
    depth: Array2<f32>,
    config: StereoConfig,

    out: Vec<f32>,
    out_w: u32,
}

#[wasm_bindgen]
impl Stereogram {
    /// `depth` is row-major, `width * height` samples.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, depth: &[f32], seed: u64) -> std::result::Result<Stereogram, JsError> {
        let depth = depth_from_slice(width, height, depth)?;

        Ok(Self {
            w: width,
            h: height,
            depth,
            config: StereoConfig { seed: Some(seed), ..Default::default() },
            out: Vec::new(),
            out_w: 0,
        })
    }

    pub fn set_tile_density(&mut self, f: u32) { self.config.tile_density = f as usize; }
    pub fn set_quant_levels(&mut self, n: u32) { self.config.quant_levels = n as usize; }
    pub fn set_focal_length(&mut self, focal: f32) { self.config.focal_length = focal; }
    pub fn set_center(&mut self, center: bool) { self.config.center = center; }
    pub fn set_seed(&mut self, seed: u64) { self.config.seed = Some(seed); }

    /// Regenerate the output. On failure the previous output is kept.
    pub fn render(&mut self) -> std::result::Result<(), JsError> {
        let mut rng = seeded_rng(self.config.seed.unwrap_or_default());
        let img = generate(self.depth.view(), &self.config, &mut rng)?;

        self.out_w = img.ncols() as u32;
        self.out = img.into_iter().collect();
        Ok(())
    }

    pub fn output(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.out[..])
    }

    pub fn output_ptr(&self) -> *const f32 { self.out.as_ptr() }
    pub fn output_len(&self) -> usize { self.out.len() }
    pub fn output_width(&self) -> u32 { self.out_w }
    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(h: usize, w: usize) -> Array2<f32> {
        Array2::from_shape_fn((h, w), |(_, c)| c as f32)
    }

    #[test]
    fn test_generate_seeded_is_deterministic() {
        let config = StereoConfig::default();
        let d = ramp(30, 50);
        let a = generate(d.view(), &config, &mut seeded_rng(5)).unwrap();
        let b = generate(d.view(), &config, &mut seeded_rng(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dim(), (30, 55));
    }

    #[test]
    fn test_generate_validates_first() {
        let config = StereoConfig { quant_levels: 0, ..Default::default() };
        let err = generate(ramp(30, 50).view(), &config, &mut seeded_rng(0)).unwrap_err();
        assert!(matches!(err, StereoError::InvalidQuantLevels));
    }

    #[test]
    fn test_depth_from_slice_shape() {
        let d = depth_from_slice(3, 2, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(d.dim(), (2, 3));
        assert_eq!(d[[1, 0]], 3.0);

        let err = depth_from_slice(4, 2, &[0.0; 6]).unwrap_err();
        assert!(matches!(err, StereoError::DepthShape { expected: 8, actual: 6 }));

        let err = depth_from_slice(0, 5, &[1.0]).unwrap_err();
        assert!(matches!(err, StereoError::DepthShape { expected: 0, actual: 1 }));
    }

    #[test]
    fn test_facade_render() {
        let depth: Vec<f32> = (0..20 * 10).map(|i| (i % 20) as f32).collect();
        let mut s = Stereogram::new(20, 10, &depth, 3).unwrap_or_else(|_| panic!("bad shape"));
        s.render().unwrap_or_else(|_| panic!("render failed"));
        assert_eq!(s.output_width(), 22);
        assert_eq!(s.output_len(), 22 * 10);
        assert!(s.out.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
