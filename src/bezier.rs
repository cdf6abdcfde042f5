//! Cubic Bézier math shared by the host and the grid vertex shader.
//!
//! The expansions here are written term for term like the WGSL versions in
//! `grid.vert.wgsl`, using products rather than `pow` so that `1 - t < 0`
//! stays defined on the GPU as well.

use glam::Vec2;

/// Scalar cubic Bézier for one coordinate of four control points.
///
/// `t` is not clamped; values outside `[0, 1]` extrapolate the curve.
pub fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32) -> impl Fn(f32) -> f32 {
    move |t| {
        let s = 1.0 - t;
        let a = s * s * s * p0;
        let b = s * s * p1 * t * 3.0;
        let c = s * t * t * p2 * 3.0;
        let d = t * t * t * p3;

        a + b + c + d
    }
}

/// Coefficients `(a, b, c)` of the derivative `a t² + b t + c`.
fn derivative_coefficients(p0: f32, p1: f32, p2: f32, p3: f32) -> (f32, f32, f32) {
    let a = 3.0 * (p3 + 3.0 * p1 - 3.0 * p2 - p0);
    let b = 6.0 * (p0 + p2 - 2.0 * p1);
    let c = 3.0 * (p1 - p0);
    (a, b, c)
}

/// Derivative of [`cubic_bezier`] with respect to `t`.
pub fn cubic_bezier_derivative(p0: f32, p1: f32, p2: f32, p3: f32) -> impl Fn(f32) -> f32 {
    let (a, b, c) = derivative_coefficients(p0, p1, p2, p3);
    move |t| t * t * a + t * b + c
}

/// Both roots of the derivative, i.e. the parameters of the curve's extrema.
///
/// The first root takes the `+sqrt` branch. Nothing is guarded: a zero
/// leading coefficient divides by zero and a negative discriminant takes the
/// square root of a negative number, so callers see infinities or NaN.
pub fn cubic_bezier_zeros(p0: f32, p1: f32, p2: f32, p3: f32) -> [f32; 2] {
    let (a, b, c) = derivative_coefficients(p0, p1, p2, p3);
    let root = (b * b - 4.0 * a * c).sqrt();
    [(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)]
}

/// A planar cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier2 {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier2 {
    pub fn new(points: [Vec2; 4]) -> Self {
        let [p0, p1, p2, p3] = points;
        Self { p0, p1, p2, p3 }
    }

    /// Rebuild a curve from two flattened 2x2 blocks
    /// (`[p0.x, p0.y, p1.x, p1.y]` and `[p2.x, p2.y, p3.x, p3.y]`).
    pub fn from_blocks(first: [f32; 4], last: [f32; 4]) -> Self {
        Self {
            p0: Vec2::new(first[0], first[1]),
            p1: Vec2::new(first[2], first[3]),
            p2: Vec2::new(last[0], last[1]),
            p3: Vec2::new(last[2], last[3]),
        }
    }

    /// Flatten into the two column-major 2x2 blocks the shader consumes.
    pub fn to_blocks(&self) -> ([f32; 4], [f32; 4]) {
        (
            [self.p0.x, self.p0.y, self.p1.x, self.p1.y],
            [self.p2.x, self.p2.y, self.p3.x, self.p3.y],
        )
    }

    /// Point on the curve at `t`.
    pub fn point(&self, t: f32) -> Vec2 {
        Vec2::new(
            cubic_bezier(self.p0.x, self.p1.x, self.p2.x, self.p3.x)(t),
            cubic_bezier(self.p0.y, self.p1.y, self.p2.y, self.p3.y)(t),
        )
    }

    /// Unnormalized tangent at `t`.
    pub fn tangent(&self, t: f32) -> Vec2 {
        Vec2::new(
            cubic_bezier_derivative(self.p0.x, self.p1.x, self.p2.x, self.p3.x)(t),
            cubic_bezier_derivative(self.p0.y, self.p1.y, self.p2.y, self.p3.y)(t),
        )
    }
}
