//! Curve-wrap vertex displacement.
//!
//! A flat grid lying along +Z is displaced by a scrolling noise texture,
//! shifted by the animation offset and then bent so that its Z axis follows a
//! cubic Bézier in the (distance, height) plane. `grid.vert.wgsl` runs this
//! per vertex on the GPU; the functions here are the host-side equivalent.

use glam::{Vec2, Vec3};

use crate::bezier::CubicBezier2;
use crate::host::GridUniforms;

pub const VERTEX_SHADER: &str = include_str!("grid.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("grid.frag.wgsl");

/// Alpha lookup into a displacement texture, repeat addressed.
pub trait NoiseField {
    fn sample_alpha(&self, uv: Vec2) -> f32;
}

/// Every lookup returns the same alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f32);

impl NoiseField for ConstantNoise {
    fn sample_alpha(&self, _uv: Vec2) -> f32 {
        self.0
    }
}

/// Counter-clockwise rotation of `v` by `theta` radians.
pub fn rotate(theta: f32, v: Vec2) -> Vec2 {
    let (s, c) = theta.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Map `p = (distance along grid, height)` onto the curve.
///
/// `p.x` in `[-length/2, length/2]` maps to `t` in `[0, 1]`; the height is
/// turned to stay perpendicular to the curve's tangent.
pub fn wrap_around_curve(p: Vec2, length: f32, curve: &CubicBezier2) -> Vec2 {
    let t = p.x / length + 0.5;
    let translation = curve.point(t);
    let d = curve.tangent(t);

    rotate(d.y.atan2(d.x), Vec2::new(0.0, p.y)) + translation
}

/// Noise height displacement followed by the scroll offset along Z.
pub fn displace_position(position: Vec3, alpha: f32, noise_scale: f32, vertex_offset: f32) -> Vec3 {
    Vec3::new(
        position.x,
        position.y + (alpha - 0.5) * noise_scale,
        position.z + vertex_offset,
    )
}

/// Everything one frame of the vertex stage depends on, minus the matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveWrap {
    pub curve: CubicBezier2,
    /// Grid extent along Z (`rows * tile_size`)
    pub length: f32,
    pub noise_offset: f32,
    pub noise_scale: f32,
    pub vertex_offset: f32,
}

impl CurveWrap {
    /// Read the same values the shader receives.
    pub fn from_uniforms(uniforms: &GridUniforms) -> Self {
        Self {
            curve: CubicBezier2::from_blocks(uniforms.curve1_block(), uniforms.curve2_block()),
            length: uniforms.size[1] * uniforms.tile_size,
            noise_offset: uniforms.noise_offset,
            noise_scale: uniforms.noise_scale,
            vertex_offset: uniforms.vertex_offset,
        }
    }

    /// Displaced, wrapped model-space position of one grid vertex.
    pub fn apply(&self, position: Vec3, uv: Vec2, noise: &impl NoiseField) -> Vec3 {
        let alpha = noise.sample_alpha(Vec2::new(uv.x, uv.y - self.noise_offset));
        let p = displace_position(position, alpha, self.noise_scale, self.vertex_offset);
        let wrapped = wrap_around_curve(Vec2::new(p.z, p.y), self.length, &self.curve);

        Vec3::new(p.x, wrapped.y, wrapped.x)
    }
}
