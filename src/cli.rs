//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{ProjectionMode, RenderConfig, SceneParams, DEFAULT_MAX_DIMENSION};
use crate::texture::ImageSource;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "synthroad")]
#[command(about = "Endless low-poly road into a mountain range", long_about = None)]
pub struct Args {
    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Vertical field of view (degrees)
    #[arg(long, value_name = "DEGREES", default_value = "15")]
    pub fov: f32,

    /// Projection: perspective (default), orthographic
    #[arg(long, value_name = "MODE", default_value = "perspective")]
    pub projection: String,

    /// Time to scroll one tile (milliseconds)
    #[arg(long, value_name = "MS", default_value = "250")]
    pub interval_ms: u64,

    /// Cap the render target's longer side at 1024 pixels
    #[arg(long)]
    pub downscale: bool,

    /// Seed for the built-in noise textures
    #[arg(long, default_value = "0")]
    pub seed: u32,

    /// Road displacement image (alpha channel) instead of built-in noise
    #[arg(long, value_name = "FILE")]
    pub road_texture: Option<PathBuf>,

    /// Mountain displacement image (alpha channel) instead of built-in noise
    #[arg(long, value_name = "FILE")]
    pub mountain_texture: Option<PathBuf>,

    /// Tile image for both grids instead of the built-in tile
    #[arg(long, value_name = "FILE")]
    pub tile_texture: Option<PathBuf>,
}

impl Args {
    /// Parse projection mode from command-line arguments
    pub fn parse_projection(&self) -> ProjectionMode {
        match self.projection.to_lowercase().as_str() {
            "perspective" => {
                log::info!("Projection: perspective ({} deg)", self.fov);
                ProjectionMode::Perspective
            }
            "orthographic" | "ortho" => {
                log::info!("Projection: orthographic");
                ProjectionMode::DEFAULT_ORTHOGRAPHIC
            }
            other => {
                log::warn!("Unknown projection '{}', using perspective", other);
                ProjectionMode::Perspective
            }
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            fov_degrees: self.fov,
            max_dimension: self.downscale.then_some(DEFAULT_MAX_DIMENSION),
            projection: self.parse_projection(),
            ..RenderConfig::default()
        }
    }

    pub fn scene_params(&self) -> SceneParams {
        let mut params = SceneParams::default()
            .with_seed(self.seed)
            .with_interval_ms(self.interval_ms);

        if let Some(path) = &self.road_texture {
            log::info!("Road noise: {}", path.display());
            params.road.noise_texture = ImageSource::Path(path.clone());
        }
        if let Some(path) = &self.mountain_texture {
            log::info!("Mountain noise: {}", path.display());
            params.mountains.noise_texture = ImageSource::Path(path.clone());
        }
        if let Some(path) = &self.tile_texture {
            log::info!("Tile texture: {}", path.display());
            params.road.tile_texture = ImageSource::Path(path.clone());
            params.mountains.tile_texture = ImageSource::Path(path.clone());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("synthroad").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn test_defaults_match_params() {
        let args = parse(&[]);
        assert_eq!(args.render_config(), RenderConfig::default());
        assert_eq!(args.scene_params(), SceneParams::default());
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--width",
            "800",
            "--height",
            "600",
            "--fov",
            "30",
            "--projection",
            "orthographic",
            "--downscale",
            "--interval-ms",
            "100",
        ]);
        let config = args.render_config();
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert_eq!(config.fov_degrees, 30.0);
        assert_eq!(config.max_dimension, Some(DEFAULT_MAX_DIMENSION));
        assert_eq!(config.projection, ProjectionMode::DEFAULT_ORTHOGRAPHIC);

        let params = args.scene_params();
        assert_eq!(params.road.interval_ms, 100);
        assert_eq!(params.mountains.interval_ms, 100);
    }

    #[test]
    fn test_unknown_projection_falls_back() {
        let args = parse(&["--projection", "fisheye"]);
        assert_eq!(args.parse_projection(), ProjectionMode::Perspective);
    }

    #[test]
    fn test_texture_paths() {
        let args = parse(&["--road-texture", "road.png", "--tile-texture", "tile.jpg"]);
        let params = args.scene_params();
        assert_eq!(params.road.noise_texture, ImageSource::Path("road.png".into()));
        assert_eq!(params.road.tile_texture, ImageSource::Path("tile.jpg".into()));
        assert_eq!(params.mountains.tile_texture, ImageSource::Path("tile.jpg".into()));
        assert_eq!(
            params.mountains.noise_texture,
            SceneParams::default().mountains.noise_texture
        );
    }
}
