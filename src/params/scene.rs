//! Landscape layout and per-model grid parameters.

use std::time::Duration;

use glam::Vec2;

use crate::mesh::GridOptions;
use crate::texture::{ImageSource, ProceduralTexture};

/// Seed of the built-in noise textures
pub const DEFAULT_NOISE_SEED: u32 = 0;

/// One curve-wrapped grid
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Tiles across the grid (X)
    pub cols: u32,

    /// Tiles along the grid (Z), also the number of scroll steps per
    /// noise period
    pub rows: u32,

    /// Edge length of one tile (world units)
    pub tile_size: f32,

    /// Peak-to-peak height of the noise displacement (world units)
    pub noise_scale: f32,

    /// Time for the grid to scroll one tile (milliseconds)
    pub interval_ms: u64,

    /// Texture repeated once per tile
    pub tile_texture: ImageSource,

    /// Alpha channel drives the height displacement
    pub noise_texture: ImageSource,
}

impl ModelParams {
    /// Narrow, dense strip with a flat middle third
    pub fn road() -> Self {
        Self {
            cols: 121,
            rows: 200,
            tile_size: 0.25,
            noise_scale: 3.0,
            interval_ms: 250,
            tile_texture: ImageSource::procedural(ProceduralTexture::Tile),
            noise_texture: ImageSource::procedural(ProceduralTexture::road_noise(
                DEFAULT_NOISE_SEED,
            )),
        }
    }

    /// Wide, coarse range behind the road
    pub fn mountains() -> Self {
        Self {
            cols: 101,
            rows: 100,
            tile_size: 0.5,
            noise_scale: 3.0,
            interval_ms: 250,
            tile_texture: ImageSource::procedural(ProceduralTexture::Tile),
            noise_texture: ImageSource::procedural(ProceduralTexture::mountain_noise(
                DEFAULT_NOISE_SEED,
            )),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Grid extent along Z (world units)
    pub fn length(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions::new(self.cols, self.rows, self.tile_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    /// Mountain profile `(distance, height)`
    pub mountain_points: [Vec2; 4],

    /// Last two road control points; the first two are derived from the
    /// mountain curve
    pub road_anchors: [Vec2; 2],

    pub road: ModelParams,
    pub mountains: ModelParams,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            mountain_points: [
                Vec2::new(50.0, 0.0),
                Vec2::new(60.0, 30.0),
                Vec2::new(75.0, -15.0),
                Vec2::new(100.0, 0.0),
            ],
            road_anchors: [Vec2::new(180.0, 10.0), Vec2::new(200.0, 10.0)],
            road: ModelParams::road(),
            mountains: ModelParams::mountains(),
        }
    }
}

impl SceneParams {
    /// Reseed any built-in noise textures.
    pub fn with_seed(mut self, seed: u32) -> Self {
        for params in [&mut self.road, &mut self.mountains] {
            if let ImageSource::Procedural { texture, .. } = &mut params.noise_texture {
                match texture {
                    ProceduralTexture::FractalNoise { seed: s, .. }
                    | ProceduralTexture::RoadNoise { seed: s, .. } => *s = seed,
                    ProceduralTexture::Tile => {}
                }
            }
        }
        self
    }

    /// Same interval for both models.
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.road.interval_ms = interval_ms;
        self.mountains.interval_ms = interval_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let road = ModelParams::road();
        assert_eq!((road.cols, road.rows, road.tile_size), (121, 200, 0.25));
        assert_eq!(road.length(), 50.0);
        assert_eq!(road.interval(), Duration::from_millis(250));

        let mountains = ModelParams::mountains();
        assert_eq!((mountains.cols, mountains.rows), (101, 100));
        assert_eq!(mountains.length(), 50.0);
    }

    #[test]
    fn test_with_seed_reaches_both_noise_textures() {
        let params = SceneParams::default().with_seed(42);
        assert_eq!(
            params.road.noise_texture,
            ImageSource::procedural(ProceduralTexture::road_noise(42))
        );
        assert_eq!(
            params.mountains.noise_texture,
            ImageSource::procedural(ProceduralTexture::mountain_noise(42))
        );
        assert_eq!(params.road.tile_texture, ModelParams::road().tile_texture);
    }

    #[test]
    fn test_with_seed_leaves_files_alone() {
        let mut params = SceneParams::default();
        params.road.noise_texture = ImageSource::Path("road.png".into());
        let reseeded = params.clone().with_seed(9);
        assert_eq!(reseeded.road.noise_texture, params.road.noise_texture);
    }
}
