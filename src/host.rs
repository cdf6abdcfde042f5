//! Boundary between the scene core and whatever owns GPU resources.
//!
//! The core only ever sees opaque handles. [`crate::rendering::GpuHost`]
//! implements this trait on top of wgpu; tests use a recording host.

use std::fmt::Debug;

use bytemuck::{Pod, Zeroable};

use crate::error::ShaderCompileError;
use crate::texture::DecodedImage;

/// Uniform block shared by both grid shader stages.
///
/// Field order and padding follow WGSL uniform layout rules; the struct is
/// 192 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GridUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    /// First two control points, column-major 2x2
    pub curve1: [[f32; 2]; 2],
    /// Last two control points, column-major 2x2
    pub curve2: [[f32; 2]; 2],
    /// Grid `[cols, rows]`
    pub size: [f32; 2],
    pub noise_offset: f32,
    pub vertex_offset: f32,
    pub tile_size: f32,
    pub noise_scale: f32,
    pub _padding: [f32; 2],
}

impl GridUniforms {
    pub fn curve1_block(&self) -> [f32; 4] {
        let [[a, b], [c, d]] = self.curve1;
        [a, b, c, d]
    }

    pub fn curve2_block(&self) -> [f32; 4] {
        let [[a, b], [c, d]] = self.curve2;
        [a, b, c, d]
    }
}

/// Render target size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Depth buffer state for the next frame.
///
/// Fragments always pass when their depth is less than or equal to the
/// stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTest {
    pub clear_depth: f32,
}

impl Default for DepthTest {
    fn default() -> Self {
        Self { clear_depth: 1.0 }
    }
}

/// One indexed triangle draw of a grid model.
pub struct DrawCall<'a, H: ResourceHost + ?Sized> {
    pub program: &'a H::Program,
    pub vertex_buffer: &'a H::Buffer,
    pub uv_buffer: &'a H::Buffer,
    pub index_buffer: &'a H::Buffer,
    pub index_count: u32,
    pub tile_texture: &'a H::Texture,
    pub noise_texture: &'a H::Texture,
    pub uniforms: GridUniforms,
}

/// GPU resource creation and draw submission.
pub trait ResourceHost {
    type Buffer: Clone + Debug;
    type Texture: Clone + Debug;
    type Program: Clone + Debug;

    fn create_vertex_buffer(&mut self, data: &[f32]) -> Self::Buffer;

    fn create_index_buffer(&mut self, data: &[u32]) -> Self::Buffer;

    /// Upload an image; addressing depends on whether both sides are powers
    /// of two.
    fn create_texture(&mut self, image: &DecodedImage) -> Self::Texture;

    fn compile_and_link(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self::Program, ShaderCompileError>;

    fn set_viewport(&mut self, viewport: Viewport);

    fn configure_depth_test(&mut self, depth: DepthTest);

    fn draw(&mut self, call: DrawCall<'_, Self>);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<GridUniforms>(), 192);
        assert_eq!(std::mem::size_of::<GridUniforms>() % 16, 0);
    }

    #[test]
    fn test_curve_blocks_flatten_column_major() {
        let mut uniforms = GridUniforms::zeroed();
        uniforms.curve1 = [[1.0, 2.0], [3.0, 4.0]];
        uniforms.curve2 = [[5.0, 6.0], [7.0, 8.0]];
        assert_eq!(uniforms.curve1_block(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(uniforms.curve2_block(), [5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_default_depth_test() {
        let depth = DepthTest::default();
        assert_eq!(depth.clear_depth, 1.0);
    }
}
