//! Window and projection configuration.

/// Downscale cap used by `--downscale` (pixels along the longer side)
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Vertical field of view from [`RenderConfig::fov_degrees`]
    Perspective,

    /// Box projection; width follows the aspect ratio
    Orthographic {
        /// Half the visible height (world units)
        half_height: f32,
    },
}

impl ProjectionMode {
    pub const DEFAULT_ORTHOGRAPHIC: Self = Self::Orthographic { half_height: 20.0 };
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    /// Narrow so the road reads as a long straight run
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Cap on the longer side of the render target, aspect preserved.
    /// `None` renders at full window resolution
    pub max_dimension: Option<u32>,

    pub projection: ProjectionMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 15.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            max_dimension: None,
            projection: ProjectionMode::Perspective,
        }
    }
}

impl RenderConfig {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Render target size for a `width` x `height` window.
    pub fn backing_size(&self, width: u32, height: u32) -> (u32, u32) {
        let longest = width.max(height);
        match self.max_dimension {
            Some(max) if longest > max => {
                let scale = max as f32 / longest as f32;
                (
                    ((width as f32 * scale).round() as u32).max(1),
                    ((height as f32 * scale).round() as u32).max(1),
                )
            }
            _ => (width.max(1), height.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncapped_backing_size() {
        let config = RenderConfig::default();
        assert_eq!(config.backing_size(1920, 1080), (1920, 1080));
        assert_eq!(config.backing_size(0, 0), (1, 1));
    }

    #[test]
    fn test_downscale_cap_preserves_aspect() {
        let config = RenderConfig {
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            ..RenderConfig::default()
        };
        assert_eq!(config.backing_size(2048, 1024), (1024, 512));
        assert_eq!(config.backing_size(1080, 1920), (576, 1024));
        assert_eq!(config.backing_size(800, 600), (800, 600));
    }

    #[test]
    fn test_default_projection() {
        let config = RenderConfig::default();
        assert_eq!(config.projection, ProjectionMode::Perspective);
        assert!((config.fov_radians() - 15f32.to_radians()).abs() < 1e-7);
    }
}
