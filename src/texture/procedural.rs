//! Built-in textures rendered at load time.

use std::f64::consts::TAU;

use image::{Rgba, RgbaImage};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Default edge length of generated textures (pixels)
pub const PROCEDURAL_SIZE: u32 = 512;

/// Tile artwork is laid out on a 32 unit square
const TILE_UNITS: f32 = 32.0;

/// hsl(240, 95%, 66%)
const TILE_STROKE: [f32; 3] = [0.337, 0.337, 0.983];

/// Blur radius of the border glow (tile units)
const GLOW_SIGMA: f32 = 3.0;

/// Peak opacity of the border glow
const GLOW_OPACITY: f32 = 0.5;

/// Half the border stroke width (tile units)
const STROKE_HALF_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProceduralTexture {
    /// Black cell framed by a glowing blue border
    Tile,

    /// Fractal noise in the alpha channel, used as mountain displacement
    FractalNoise {
        /// Noise frequency in cycles per pixel
        base_frequency: f32,
        octaves: usize,
        seed: u32,
    },

    /// Fractal noise with the middle third of the columns faded out so the
    /// road surface stays flat
    RoadNoise {
        base_frequency: f32,
        octaves: usize,
        seed: u32,
    },
}

impl ProceduralTexture {
    pub const fn mountain_noise(seed: u32) -> Self {
        Self::FractalNoise {
            base_frequency: 0.025,
            octaves: 10,
            seed,
        }
    }

    pub const fn road_noise(seed: u32) -> Self {
        Self::RoadNoise {
            base_frequency: 0.05,
            octaves: 10,
            seed,
        }
    }

    /// Render a `size` x `size` image.
    pub fn render(&self, size: u32) -> RgbaImage {
        match *self {
            Self::Tile => render_tile(size),
            Self::FractalNoise {
                base_frequency,
                octaves,
                seed,
            } => render_noise(size, base_frequency, octaves, seed, |_| 1.0),
            Self::RoadNoise {
                base_frequency,
                octaves,
                seed,
            } => render_noise(size, base_frequency, octaves, seed, road_mask),
        }
    }
}

fn render_tile(size: u32) -> RgbaImage {
    let unit = size as f32 / TILE_UNITS;

    RgbaImage::from_fn(size, size, |x, y| {
        // Distance from the pixel center to the nearest cell edge
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let edge = px.min(size as f32 - px).min(py).min(size as f32 - py) / unit;

        let stroke: f32 = if edge <= STROKE_HALF_WIDTH { 1.0 } else { 0.0 };
        let glow = GLOW_OPACITY * (-0.5 * (edge / GLOW_SIGMA).powi(2)).exp();
        let intensity = stroke.max(glow);

        let [r, g, b] = TILE_STROKE.map(|c| to_byte(c * intensity));
        Rgba([r, g, b, 255])
    })
}

/// Noise sampled on a torus so the image tiles under repeat addressing.
fn render_noise(
    size: u32,
    base_frequency: f32,
    octaves: usize,
    seed: u32,
    mask: impl Fn(f32) -> f32,
) -> RgbaImage {
    let fbm = Fbm::<Perlin>::new(seed)
        .set_octaves(octaves)
        .set_frequency(base_frequency as f64);
    let radius = size as f64 / TAU;

    RgbaImage::from_fn(size, size, |x, y| {
        let ax = TAU * x as f64 / size as f64;
        let ay = TAU * y as f64 / size as f64;
        let n = fbm.get([
            radius * ax.cos(),
            radius * ax.sin(),
            radius * ay.cos(),
            radius * ay.sin(),
        ]) as f32;

        let u = (x as f32 + 0.5) / size as f32;
        let value = ((n * 0.5 + 0.5) * mask(u)).clamp(0.0, 1.0);
        let byte = to_byte(value);
        Rgba([byte, byte, byte, byte])
    })
}

/// Luminance of the road mask at horizontal position `u`.
///
/// White everywhere except the band `[0.33, 0.66]`, which carries a
/// white-black-black-white gradient with stops at 0, 25, 75 and 100%.
fn road_mask(u: f32) -> f32 {
    const BAND_START: f32 = 0.33;
    const BAND_WIDTH: f32 = 0.33;

    let g = (u - BAND_START) / BAND_WIDTH;
    if !(0.0..=1.0).contains(&g) {
        1.0
    } else if g < 0.25 {
        1.0 - g / 0.25
    } else if g <= 0.75 {
        0.0
    } else {
        (g - 0.75) / 0.25
    }
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_border_and_center() {
        let image = ProceduralTexture::Tile.render(64);
        let corner = image.get_pixel(0, 0).0;
        let center = image.get_pixel(32, 32).0;

        assert_eq!(corner[3], 255);
        assert!(corner[2] > 240, "border is bright blue: {:?}", corner);
        assert!(corner[2] > corner[0]);
        assert!(center[2] < corner[2]);
        assert!(center[0] < 10 && center[1] < 10);
    }

    #[test]
    fn test_road_mask_stops() {
        assert_eq!(road_mask(0.0), 1.0);
        assert_eq!(road_mask(0.2), 1.0);
        assert_eq!(road_mask(0.5), 0.0);
        assert!((road_mask(0.33 + 0.33 * 0.125) - 0.5).abs() < 1e-4);
        assert_eq!(road_mask(0.9), 1.0);
    }

    #[test]
    fn test_road_noise_is_flat_in_the_middle() {
        let image = ProceduralTexture::road_noise(7).render(64);
        for y in 0..64 {
            assert_eq!(image.get_pixel(32, y).0[3], 0);
        }
        assert!((0..64).any(|y| image.get_pixel(2, y).0[3] > 0));
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = ProceduralTexture::mountain_noise(1).render(32);
        let b = ProceduralTexture::mountain_noise(1).render(32);
        let c = ProceduralTexture::mountain_noise(2).render(32);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
