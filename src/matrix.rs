//! Column-major 4x4 homogeneous transforms, mutated in place.
//!
//! Every operation right-composes onto the stored state (`M := M * Op`) and
//! returns `&mut Self`, so transforms read as chains:
//!
//! ```
//! use synthroad::matrix::Matrix;
//!
//! let mut model_view = Matrix::new();
//! model_view.translate(0.0, -2.0, -10.0).rotate(0.5, 0.0, 1.0, 0.0);
//! ```

use std::fmt;

/// Number of elements in one 4x4 matrix.
pub const ELEMENTS: usize = 16;

/// A 4x4 transform stored column-major inside a flat buffer.
///
/// Element (row `r`, column `c`) lives at `buffer[start + 4 * c + r]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    buffer: Vec<f32>,
    start: usize,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    /// Create an identity matrix in its own buffer.
    pub fn new() -> Self {
        let mut matrix = Self {
            buffer: vec![0.0; ELEMENTS],
            start: 0,
        };
        matrix.identity();
        matrix
    }

    /// View 16 elements of `buffer` beginning at `start` as a matrix.
    ///
    /// The existing contents are kept. Returns `None` when the buffer is too
    /// short to hold a matrix at that offset.
    pub fn in_buffer(buffer: Vec<f32>, start: usize) -> Option<Self> {
        if buffer.len() < start.checked_add(ELEMENTS)? {
            return None;
        }
        Some(Self { buffer, start })
    }

    /// Offset of the first element inside the backing buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The 16 column-major elements of this matrix.
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer[self.start..self.start + ELEMENTS]
    }

    /// Copy of the 16 column-major elements.
    pub fn to_array(&self) -> [f32; ELEMENTS] {
        let mut out = [0.0; ELEMENTS];
        out.copy_from_slice(self.as_slice());
        out
    }

    /// Columns as nested arrays, the layout uniform structs expect.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let m = self.as_slice();
        [
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
            [m[12], m[13], m[14], m[15]],
        ]
    }

    /// Element at `row`, `col` (both in `0..4`).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.buffer[self.start + 4 * col + row]
    }

    /// Apply this transform to a homogeneous column vector.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let m = self.as_slice();
        let mut out = [0.0; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = m[row] * v[0] + m[4 + row] * v[1] + m[8 + row] * v[2] + m[12 + row] * v[3];
        }
        out
    }

    /// Reset to the multiplicative identity.
    pub fn identity(&mut self) -> &mut Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        self.overwrite(m)
    }

    /// `self := self * other`.
    pub fn multiply(&mut self, other: &Matrix) -> &mut Self {
        self.compose(other.to_array())
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        #[rustfmt::skip]
        let m = [
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        self.compose(m)
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            x, y, z, 1.0,
        ];
        self.compose(m)
    }

    /// Rotate by `theta` radians about the axis `(x, y, z)`.
    ///
    /// The axis is normalized first. A zero axis is not rejected: the
    /// normalization divides by zero and the matrix fills with NaN.
    pub fn rotate(&mut self, theta: f32, x: f32, y: f32, z: f32) -> &mut Self {
        let magnitude = (x * x + y * y + z * z).sqrt();
        let (ux, uy, uz) = (x / magnitude, y / magnitude, z / magnitude);
        let (s, c) = theta.sin_cos();
        let k = 1.0 - c;

        #[rustfmt::skip]
        let m = [
            c + ux * ux * k,      uy * ux * k + uz * s, uz * ux * k - uy * s, 0.0,
            ux * uy * k - uz * s, c + uy * uy * k,      uz * uy * k + ux * s, 0.0,
            ux * uz * k + uy * s, uy * uz * k - ux * s, c + uz * uz * k,      0.0,
            0.0,                  0.0,                  0.0,                  1.0,
        ];
        self.compose(m)
    }

    /// Overwrite with a symmetric-frustum perspective projection.
    ///
    /// Depth is mapped to `[-1, 1]`.
    pub fn perspective(&mut self, fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> &mut Self {
        let f = 1.0 / (fovy / 2.0).tan();
        let range = z_near - z_far;

        #[rustfmt::skip]
        let m = [
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (z_near + z_far) / range, -1.0,
            0.0, 0.0, 2.0 * z_near * z_far / range, 0.0,
        ];
        self.overwrite(m)
    }

    /// Overwrite with an orthographic box projection.
    pub fn orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> &mut Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        #[rustfmt::skip]
        let m = [
            2.0 / width, 0.0, 0.0, 0.0,
            0.0, 2.0 / height, 0.0, 0.0,
            0.0, 0.0, -2.0 / depth, 0.0,
            -(right + left) / width, -(top + bottom) / height, -(far + near) / depth, 1.0,
        ];
        self.overwrite(m)
    }

    fn overwrite(&mut self, m: [f32; ELEMENTS]) -> &mut Self {
        self.buffer[self.start..self.start + ELEMENTS].copy_from_slice(&m);
        self
    }

    /// Right-multiply the stored state by the column-major matrix `m`.
    fn compose(&mut self, m: [f32; ELEMENTS]) -> &mut Self {
        let a = self.to_array();
        let out = &mut self.buffer[self.start..self.start + ELEMENTS];

        for col in 0..4 {
            for row in 0..4 {
                out[4 * col + row] = a[row] * m[4 * col]
                    + a[4 + row] * m[4 * col + 1]
                    + a[8 + row] * m[4 * col + 2]
                    + a[12 + row] * m[4 * col + 3];
            }
        }

        self
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:.2} {:.2} {:.2} {:.2}",
                self.get(row, 0),
                self.get(row, 1),
                self.get(row, 2),
                self.get(row, 3)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    const EPSILON: f32 = 1e-5;

    fn assert_matches(matrix: &Matrix, expected: Mat4) {
        for (i, (a, b)) in matrix
            .as_slice()
            .iter()
            .zip(expected.to_cols_array())
            .enumerate()
        {
            assert!((a - b).abs() < EPSILON, "element {}: {} != {}", i, a, b);
        }
    }

    fn sample_matrix() -> Matrix {
        let mut m = Matrix::new();
        m.translate(3.0, -1.0, 2.0)
            .rotate(0.7, 1.0, 2.0, -0.5)
            .scale(2.0, 0.5, 1.5);
        m
    }

    #[test]
    fn test_identity_is_left_neutral() {
        let other = sample_matrix();
        let mut m = Matrix::new();
        m.translate(9.0, 9.0, 9.0);
        m.identity().multiply(&other);
        assert_matches(&m, Mat4::from_cols_slice(other.as_slice()));
    }

    #[test]
    fn test_translate_moves_origin() {
        let mut m = Matrix::new();
        m.identity().translate(1.0, 2.0, 3.0);
        assert_eq!(m.transform([0.0, 0.0, 0.0, 1.0]), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_translate_then_scale_composes_right() {
        let mut m = Matrix::new();
        m.translate(1.0, 2.0, 3.0).scale(2.0, 2.0, 2.0);
        // Scale applies first, then the translation.
        assert_eq!(m.transform([1.0, 1.0, 1.0, 1.0]), [3.0, 4.0, 5.0, 1.0]);
    }

    #[test]
    fn test_multiply_matches_glam() {
        let a = sample_matrix();
        let mut b = Matrix::new();
        b.rotate(-1.2, 0.0, 0.0, 1.0).translate(0.5, 0.25, -4.0);

        let expected = Mat4::from_cols_slice(a.as_slice()) * Mat4::from_cols_slice(b.as_slice());
        let mut product = a.clone();
        product.multiply(&b);
        assert_matches(&product, expected);
    }

    #[test]
    fn test_rotate_matches_glam_axis_angle() {
        let mut m = Matrix::new();
        m.rotate(1.1, 1.0, 2.0, 3.0);
        let expected = Mat4::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 1.1);
        assert_matches(&m, expected);
    }

    #[test]
    fn test_rotate_zero_axis_yields_nan() {
        let mut m = Matrix::new();
        m.rotate(0.3, 0.0, 0.0, 0.0);
        assert!(m.as_slice()[..11].iter().any(|v| v.is_nan()));
    }

    #[test]
    fn test_perspective_shape() {
        let (near, far) = (0.1, 1000.0);
        let mut m = Matrix::new();
        m.translate(5.0, 5.0, 5.0)
            .perspective(15f32.to_radians(), 1.5, near, far);

        assert_eq!(m.get(3, 2), -1.0);
        assert_eq!(m.get(2, 2), (near + far) / (near - far));
        assert_eq!(m.get(3, 3), 0.0);
        assert_matches(
            &m,
            Mat4::perspective_rh_gl(15f32.to_radians(), 1.5, near, far),
        );
    }

    #[test]
    fn test_orthographic_matches_glam() {
        let mut m = Matrix::new();
        m.orthographic(-4.0, 6.0, -2.0, 3.0, 0.5, 50.0);
        assert_matches(
            &m,
            Mat4::orthographic_rh_gl(-4.0, 6.0, -2.0, 3.0, 0.5, 50.0),
        );
    }

    #[test]
    fn test_in_buffer_respects_offset() {
        let mut packed = Matrix::in_buffer(vec![7.0; 20], 4).unwrap();
        packed.identity().translate(1.0, 2.0, 3.0);
        assert_eq!(packed.start(), 4);
        assert_eq!(packed.get(0, 3), 1.0);
        assert_eq!(packed.as_slice().len(), ELEMENTS);

        assert!(Matrix::in_buffer(vec![0.0; 16], 1).is_none());
    }

    #[test]
    fn test_display_prints_rows() {
        let mut m = Matrix::new();
        m.translate(1.0, 2.0, 3.0);
        let text = m.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "1.00 0.00 0.00 1.00");
        assert_eq!(rows[2], "0.00 0.00 1.00 3.00");
    }
}
