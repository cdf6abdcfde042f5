//! The landscape: a mountain range with a road leading into it.
//!
//! Both grids share one set of control points. The road starts where the
//! mountain curve ends and leaves it along the same tangent, and both models
//! are lowered by the mountain peak height so the horizon sits at eye level.

use std::time::Instant;

use glam::Vec2;

use crate::bezier::{cubic_bezier, cubic_bezier_zeros, CubicBezier2};
use crate::error::RenderResult;
use crate::host::{DepthTest, ResourceHost, Viewport};
use crate::matrix::Matrix;
use crate::model::GridModel;
use crate::params::{ProjectionMode, RenderConfig, SceneParams};
use crate::texture::ImageLoader;

pub struct Scene<H: ResourceHost> {
    params: SceneParams,
    config: RenderConfig,
    mountains: GridModel<H>,
    road: GridModel<H>,
    projection: Matrix,
    viewport: Viewport,
    viewport_synced: bool,
}

impl<H: ResourceHost> Scene<H> {
    pub fn new(params: SceneParams, config: RenderConfig, start: Instant) -> Self {
        let mountain_curve = CubicBezier2::new(mountain_control_points(&params));
        let road_curve = CubicBezier2::new(road_control_points(&params));
        let horizon = horizon_offset(&params);
        let z = z_offset(&params);

        if !horizon.is_finite() {
            log::warn!(
                "Mountain curve has no finite peak (horizon offset {}); \
                 geometry will be degenerate",
                horizon
            );
        }

        let mut mountains = GridModel::new(params.mountains.clone(), mountain_curve, start);
        let mut road = GridModel::new(params.road.clone(), road_curve, start);
        mountains.model_view().translate(0.0, -horizon, z);
        road.model_view().translate(0.0, -horizon, z);

        let (width, height) = config.backing_size(config.window_width, config.window_height);
        let mut scene = Self {
            params,
            mountains,
            road,
            projection: Matrix::new(),
            viewport: Viewport { width, height },
            viewport_synced: false,
            config,
        };
        scene.update_projection(scene.config.window_width, scene.config.window_height);
        scene
    }

    pub fn mountains(&mut self) -> &mut GridModel<H> {
        &mut self.mountains
    }

    pub fn road(&mut self) -> &mut GridModel<H> {
        &mut self.road
    }

    pub fn projection(&self) -> &Matrix {
        &self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mountain_control_points(&self) -> [Vec2; 4] {
        mountain_control_points(&self.params)
    }

    pub fn road_control_points(&self) -> [Vec2; 4] {
        road_control_points(&self.params)
    }

    pub fn horizon_offset(&self) -> f32 {
        horizon_offset(&self.params)
    }

    pub fn z_offset(&self) -> f32 {
        z_offset(&self.params)
    }

    /// Match the render target to a new window size.
    ///
    /// A zero-sized window (minimized) keeps the previous viewport.
    pub fn resize(&mut self, host: &mut H, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        let (width, height) = self.config.backing_size(width, height);
        self.viewport = Viewport { width, height };
        host.set_viewport(self.viewport);
    }

    pub fn perspective(&mut self, fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> &mut Matrix {
        self.projection.perspective(fovy, aspect, z_near, z_far)
    }

    pub fn orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> &mut Matrix {
        self.projection
            .orthographic(left, right, bottom, top, near, far)
    }

    /// Rebuild the projection for a `width` x `height` window.
    ///
    /// A zero dimension leaves the current projection in place.
    pub fn update_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = width as f32 / height as f32;
        let near = self.config.near_plane;
        let far = self.config.far_plane;

        match self.config.projection {
            ProjectionMode::Perspective => {
                let fovy = self.config.fov_radians();
                self.perspective(fovy, aspect, near, far);
            }
            ProjectionMode::Orthographic { half_height } => {
                let half_width = half_height * aspect;
                self.orthographic(-half_width, half_width, -half_height, half_height, near, far);
            }
        }
    }

    /// Draw the mountains, then the road.
    pub async fn draw(
        &mut self,
        host: &mut H,
        loader: &impl ImageLoader,
        now: Instant,
    ) -> RenderResult<()> {
        if !self.viewport_synced {
            host.set_viewport(self.viewport);
            self.viewport_synced = true;
        }
        host.configure_depth_test(DepthTest::default());

        self.mountains
            .draw(host, loader, &self.projection, now)
            .await?;
        self.road.draw(host, loader, &self.projection, now).await
    }
}

fn mountain_control_points(params: &SceneParams) -> [Vec2; 4] {
    params.mountain_points
}

/// The road continues the mountain curve with a mirrored handle.
fn road_control_points(params: &SceneParams) -> [Vec2; 4] {
    let [_, _, m2, m3] = params.mountain_points;
    let [a0, a1] = params.road_anchors;
    [m3, m3 + (m3 - m2), a0, a1]
}

/// Height of the mountain curve at its extrema, the larger one.
///
/// NaN from a degenerate curve propagates.
fn horizon_offset(params: &SceneParams) -> f32 {
    let [p0, p1, p2, p3] = params.mountain_points;
    let height = cubic_bezier(p0.y, p1.y, p2.y, p3.y);
    let [t0, t1] = cubic_bezier_zeros(p0.y, p1.y, p2.y, p3.y);
    let (a, b) = (height(t0), height(t1));

    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

fn z_offset(params: &SceneParams) -> f32 {
    let mountain_start = params.mountain_points[0];
    let road_stop = road_control_points(params)[3];
    mountain_start.x - road_stop.x - mountain_start.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{MemoryLoader, RecordingHost};
    use crate::params::DEFAULT_MAX_DIMENSION;

    fn scene() -> Scene<RecordingHost> {
        Scene::new(SceneParams::default(), RenderConfig::default(), Instant::now())
    }

    #[test]
    fn test_horizon_is_mountain_peak() {
        let scene = scene();
        let horizon = scene.horizon_offset();
        assert!((horizon - 10.563).abs() < 0.01, "horizon {}", horizon);

        let [p0, p1, p2, p3] = scene.mountain_control_points();
        let height = cubic_bezier(p0.y, p1.y, p2.y, p3.y);
        for i in 0..=200 {
            assert!(height(i as f32 / 200.0) <= horizon + 1e-3);
        }
    }

    #[test]
    fn test_road_continues_mountains() {
        let scene = scene();
        let mountains = scene.mountain_control_points();
        let road = scene.road_control_points();

        assert_eq!(road[0], mountains[3]);
        assert_eq!(road[1], Vec2::new(125.0, 15.0));
        assert_eq!(road[2], Vec2::new(180.0, 10.0));
        assert_eq!(road[3], Vec2::new(200.0, 10.0));
        assert_eq!(scene.z_offset(), -200.0);
    }

    #[test]
    fn test_models_share_translation() {
        let mut scene = scene();
        let horizon = scene.horizon_offset();
        let expected = [0.0, -horizon, -200.0, 1.0];

        assert_eq!(scene.mountains().model_view().to_cols_array_2d()[3], expected);
        assert_eq!(scene.road().model_view().to_cols_array_2d()[3], expected);
    }

    #[test]
    fn test_draw_order_and_state() {
        let mut scene = scene();
        let mut host = RecordingHost::new();
        let loader = MemoryLoader::default();
        let now = Instant::now();

        pollster::block_on(scene.draw(&mut host, &loader, now)).unwrap();
        pollster::block_on(scene.draw(&mut host, &loader, now)).unwrap();

        let counts: Vec<u32> = host.draws.iter().map(|d| d.index_count).collect();
        assert_eq!(counts, vec![60_600, 145_200, 60_600, 145_200]);
        assert_eq!(host.viewports, vec![Viewport { width: 1280, height: 720 }]);
        assert_eq!(host.depth_tests, vec![DepthTest::default(); 2]);
        assert_eq!(host.programs, 2);
        assert_eq!(loader.loads.get(), 4);
    }

    #[test]
    fn test_resize_applies_cap() {
        let config = RenderConfig {
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            ..RenderConfig::default()
        };
        let mut scene: Scene<RecordingHost> =
            Scene::new(SceneParams::default(), config, Instant::now());
        let mut host = RecordingHost::new();

        assert_eq!(scene.viewport(), Viewport { width: 1024, height: 576 });
        scene.resize(&mut host, 4096, 2048);
        assert_eq!(host.viewports, vec![Viewport { width: 1024, height: 512 }]);
    }

    #[test]
    fn test_zero_size_window_keeps_state() {
        let mut scene = scene();
        let mut host = RecordingHost::new();
        let projection = scene.projection().clone();

        for (width, height) in [(0, 0), (800, 0), (0, 600)] {
            scene.resize(&mut host, width, height);
            scene.update_projection(width, height);
        }

        assert!(host.viewports.is_empty());
        assert_eq!(scene.viewport(), Viewport { width: 1280, height: 720 });
        assert_eq!(scene.projection(), &projection);
        assert!(scene.projection().to_cols_array_2d().iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_update_projection_modes() {
        let mut scene = scene();
        scene.update_projection(1600, 900);
        assert_eq!(scene.projection().get(3, 2), -1.0);
        assert_eq!(scene.projection().get(3, 3), 0.0);

        let config = RenderConfig {
            projection: ProjectionMode::DEFAULT_ORTHOGRAPHIC,
            ..RenderConfig::default()
        };
        let mut scene: Scene<RecordingHost> =
            Scene::new(SceneParams::default(), config, Instant::now());
        scene.update_projection(200, 100);
        assert_eq!(scene.projection().get(3, 3), 1.0);
        // Half width 40 maps to the right edge of clip space
        let right = scene.projection().transform([40.0, 0.0, -1.0, 1.0]);
        assert!((right[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_mountains_propagate_nan() {
        let params = SceneParams {
            mountain_points: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(2.0, 2.0),
                Vec2::new(3.0, 3.0),
            ],
            ..SceneParams::default()
        };
        let scene: Scene<RecordingHost> =
            Scene::new(params, RenderConfig::default(), Instant::now());
        assert!(!scene.horizon_offset().is_finite());
    }
}
