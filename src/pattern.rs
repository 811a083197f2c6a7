// pattern.rs - Random pattern tile
//
// Each cell is an independent draw from {0, 1, ..., n-1} divided by n,
// so values sit in [0, 1) in steps of 1/n. The tile covers 1/f of the
// depth map along each axis.

use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::{Result, StereoError};

/// Quantized random tile seeding the reference band.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTile {
    cells: Array2<f32>,
    levels: usize,
}

impl PatternTile {
    /// Draw a tile sized for a `depth_shape = (height, width)` map.
    pub fn generate<R: Rng>(
        depth_shape: (usize, usize),
        tile_density: usize,
        quant_levels: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if tile_density == 0 {
            return Err(StereoError::InvalidTileDensity);
        }
        if quant_levels == 0 {
            return Err(StereoError::InvalidQuantLevels);
        }

        let (h, w) = (depth_shape.0 / tile_density, depth_shape.1 / tile_density);
        if h == 0 || w == 0 {
            return Err(StereoError::DegenerateTile { height: h, width: w, density: tile_density });
        }

        let n = quant_levels as f32;
        let cells = Array2::from_shape_simple_fn((h, w), || rng.random_range(0..quant_levels) as f32 / n);
        log::debug!("pattern tile {}x{} with {} levels", h, w, quant_levels);

        Ok(Self { cells, levels: quant_levels })
    }

    /// Wrap an existing tile. Values must lie in [0, 1).
    pub fn from_array(cells: Array2<f32>, levels: usize) -> Result<Self> {
        let (h, w) = cells.dim();
        if h == 0 || w == 0 {
            return Err(StereoError::DegenerateTile { height: h, width: w, density: 0 });
        }
        if levels == 0 {
            return Err(StereoError::InvalidQuantLevels);
        }
        if cells.iter().any(|&v| !(0.0..1.0).contains(&v)) {
            return Err(StereoError::PatternRange);
        }
        Ok(Self { cells, levels })
    }

    #[inline]
    pub fn height(&self) -> usize { self.cells.nrows() }

    #[inline]
    pub fn width(&self) -> usize { self.cells.ncols() }

    pub fn levels(&self) -> usize { self.levels }

    /// Value at `(row mod h, col)`; the tile repeats vertically.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cells[[row % self.height(), col]]
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.cells.view()
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.cells
    }
}
