// colormap.rs - Map stereogram values to RGB
//
// Values are autoscaled over the image's own range before lookup,
// so a 3-level pattern spans the whole ramp.

use image::{Rgb, RgbImage};
use ndarray::Array2;

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32, g: g as f32, b: b as f32 }
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [
            self.r.clamp(0.0, 255.0) as u8,
            self.g.clamp(0.0, 255.0) as u8,
            self.b.clamp(0.0, 255.0) as u8,
        ]
    }
}

impl std::ops::Add for Color {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self { r: self.r + o.r, g: self.g + o.g, b: self.b + o.b }
    }
}

impl std::ops::Mul<f32> for Color {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self { r: self.r * s, g: self.g * s, b: self.b * s }
    }
}

// Sequential white -> dark red ramp
const REDS: [Color; 9] = [
    Color::from_rgb(255, 245, 240),
    Color::from_rgb(254, 224, 210),
    Color::from_rgb(252, 187, 161),
    Color::from_rgb(252, 146, 114),
    Color::from_rgb(251, 106, 74),
    Color::from_rgb(239, 59, 44),
    Color::from_rgb(203, 24, 29),
    Color::from_rgb(165, 15, 21),
    Color::from_rgb(103, 0, 13),
];

const GRAY: [Color; 2] = [Color::from_rgb(0, 0, 0), Color::from_rgb(255, 255, 255)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    Reds,
    Gray,
}

impl std::str::FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reds" => Ok(Colormap::Reds),
            "gray" | "grey" => Ok(Colormap::Gray),
            other => Err(format!("unknown colormap '{}' (expected reds or gray)", other)),
        }
    }
}

impl Colormap {
    fn stops(self) -> &'static [Color] {
        match self {
            Colormap::Reds => &REDS,
            Colormap::Gray => &GRAY,
        }
    }

    /// Piecewise-linear lookup, `t` clamped to [0, 1].
    pub fn sample(self, t: f32) -> Color {
        let stops = self.stops();
        let x = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
        let i = (x as usize).min(stops.len() - 2);
        let f = x - i as f32;
        stops[i] * (1.0 - f) + stops[i + 1] * f
    }

    pub fn render(self, img: &Array2<f32>) -> RgbImage {
        let (h, w) = img.dim();
        let (lo, hi) = img
            .iter()
            .fold((f32::MAX, f32::MIN), |(mn, mx), &v| (mn.min(v), mx.max(v)));
        let range = (hi - lo).max(1e-6);

        RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let v = img[[y as usize, x as usize]];
            Rgb(self.sample((v - lo) / range).to_rgb())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(Colormap::Reds.sample(0.0).to_rgb(), [255, 245, 240]);
        assert_eq!(Colormap::Reds.sample(1.0).to_rgb(), [103, 0, 13]);
        assert_eq!(Colormap::Gray.sample(2.0).to_rgb(), [255, 255, 255]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Reds".parse::<Colormap>(), Ok(Colormap::Reds));
        assert_eq!("grey".parse::<Colormap>(), Ok(Colormap::Gray));
        assert!("jet".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_render_autoscales() {
        let img = ndarray::array![[0.0f32, 1.0 / 3.0, 2.0 / 3.0]];
        let rgb = Colormap::Gray.render(&img);
        assert_eq!(rgb.dimensions(), (3, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(2, 0).0, [255, 255, 255]);
    }
}
