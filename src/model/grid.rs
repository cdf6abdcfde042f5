//! A curve-wrapped grid and its lazily created GPU resources.

use std::time::Instant;

use crate::bezier::CubicBezier2;
use crate::error::{ImageLoadError, RenderResult, ShaderCompileError};
use crate::host::{DrawCall, GridUniforms, ResourceHost};
use crate::matrix::Matrix;
use crate::mesh::{generate_grid, Mesh};
use crate::model::AnimationState;
use crate::params::ModelParams;
use crate::texture::{ImageLoader, ImageSource};
use crate::wrap::{CurveWrap, FRAGMENT_SHADER, VERTEX_SHADER};

/// One grid bent along a cubic curve.
///
/// Every derived resource is created on first request and then reused for
/// the lifetime of the model. Program and texture acquisition happen at
/// most once: a failure is stored and returned again on later requests.
pub struct GridModel<H: ResourceHost> {
    params: ModelParams,
    curve1: [f32; 4],
    curve2: [f32; 4],
    animation: AnimationState,

    mesh: Option<Mesh>,
    vertex_buffer: Option<H::Buffer>,
    uv_buffer: Option<H::Buffer>,
    index_buffer: Option<H::Buffer>,
    program: Option<Result<H::Program, ShaderCompileError>>,
    model_view: Option<Matrix>,
    tile_texture: Option<Result<H::Texture, ImageLoadError>>,
    noise_texture: Option<Result<H::Texture, ImageLoadError>>,
}

impl<H: ResourceHost> GridModel<H> {
    pub fn new(params: ModelParams, curve: CubicBezier2, start: Instant) -> Self {
        let (curve1, curve2) = curve.to_blocks();
        let animation =
            AnimationState::new(start, params.interval(), params.rows, params.tile_size);

        Self {
            params,
            curve1,
            curve2,
            animation,
            mesh: None,
            vertex_buffer: None,
            uv_buffer: None,
            index_buffer: None,
            program: None,
            model_view: None,
            tile_texture: None,
            noise_texture: None,
        }
    }

    pub fn curve(&self) -> CubicBezier2 {
        CubicBezier2::from_blocks(self.curve1, self.curve2)
    }

    pub fn noise_offset(&self) -> f32 {
        self.animation.noise_offset()
    }

    pub fn mesh(&mut self) -> &Mesh {
        let options = self.params.grid_options();
        self.mesh.get_or_insert_with(|| {
            log::debug!("Generating {}x{} grid", options.cols, options.rows);
            generate_grid(&options)
        })
    }

    pub fn vertex_buffer(&mut self, host: &mut H) -> H::Buffer {
        if let Some(buffer) = &self.vertex_buffer {
            return buffer.clone();
        }
        let buffer = host.create_vertex_buffer(self.mesh().vertex_data());
        log::debug!("Created vertex buffer {:?}", buffer);
        self.vertex_buffer = Some(buffer.clone());
        buffer
    }

    pub fn uv_buffer(&mut self, host: &mut H) -> H::Buffer {
        if let Some(buffer) = &self.uv_buffer {
            return buffer.clone();
        }
        let buffer = host.create_vertex_buffer(self.mesh().uv_data());
        log::debug!("Created uv buffer {:?}", buffer);
        self.uv_buffer = Some(buffer.clone());
        buffer
    }

    pub fn index_buffer(&mut self, host: &mut H) -> H::Buffer {
        if let Some(buffer) = &self.index_buffer {
            return buffer.clone();
        }
        let buffer = host.create_index_buffer(&self.mesh().indices);
        log::debug!("Created index buffer {:?}", buffer);
        self.index_buffer = Some(buffer.clone());
        buffer
    }

    pub fn program(&mut self, host: &mut H) -> Result<H::Program, ShaderCompileError> {
        if let Some(program) = &self.program {
            return program.clone();
        }
        let program = host.compile_and_link(VERTEX_SHADER, FRAGMENT_SHADER);
        match &program {
            Ok(program) => log::debug!("Linked grid program {:?}", program),
            Err(err) => log::error!("Grid program unavailable: {}", err),
        }
        self.program = Some(program.clone());
        program
    }

    /// Model transform, identity until first modified.
    pub fn model_view(&mut self) -> &mut Matrix {
        self.model_view.get_or_insert_with(Matrix::new)
    }

    pub async fn tile_texture(
        &mut self,
        host: &mut H,
        loader: &impl ImageLoader,
    ) -> Result<H::Texture, ImageLoadError> {
        if let Some(texture) = &self.tile_texture {
            return texture.clone();
        }
        let texture = load_texture(host, loader, &self.params.tile_texture).await;
        self.tile_texture = Some(texture.clone());
        texture
    }

    pub async fn noise_texture(
        &mut self,
        host: &mut H,
        loader: &impl ImageLoader,
    ) -> Result<H::Texture, ImageLoadError> {
        if let Some(texture) = &self.noise_texture {
            return texture.clone();
        }
        let texture = load_texture(host, loader, &self.params.noise_texture).await;
        self.noise_texture = Some(texture.clone());
        texture
    }

    /// Uniform block for one frame.
    pub fn uniforms(&mut self, projection: &Matrix, vertex_offset: f32) -> GridUniforms {
        let [a, b, c, d] = self.curve1;
        let [e, f, g, h] = self.curve2;

        GridUniforms {
            projection: projection.to_cols_array_2d(),
            model_view: self.model_view().to_cols_array_2d(),
            curve1: [[a, b], [c, d]],
            curve2: [[e, f], [g, h]],
            size: [self.params.cols as f32, self.params.rows as f32],
            noise_offset: self.animation.noise_offset(),
            vertex_offset,
            tile_size: self.params.tile_size,
            noise_scale: self.params.noise_scale,
            _padding: [0.0; 2],
        }
    }

    /// Host-side equivalent of the vertex stage for the current animation state.
    pub fn curve_wrap(&self, vertex_offset: f32) -> CurveWrap {
        CurveWrap {
            curve: self.curve(),
            length: self.params.length(),
            noise_offset: self.animation.noise_offset(),
            noise_scale: self.params.noise_scale,
            vertex_offset,
        }
    }

    /// Advance the animation and issue this model's draw.
    pub async fn draw(
        &mut self,
        host: &mut H,
        loader: &impl ImageLoader,
        projection: &Matrix,
        now: Instant,
    ) -> RenderResult<()> {
        let vertex_offset = self.animation.tick(now);

        let program = self.program(host)?;
        let vertex_buffer = self.vertex_buffer(host);
        let uv_buffer = self.uv_buffer(host);
        let index_buffer = self.index_buffer(host);
        let tile_texture = self.tile_texture(host, loader).await?;
        let noise_texture = self.noise_texture(host, loader).await?;

        let index_count = self.mesh().indices.len() as u32;
        let uniforms = self.uniforms(projection, vertex_offset);

        host.draw(DrawCall {
            program: &program,
            vertex_buffer: &vertex_buffer,
            uv_buffer: &uv_buffer,
            index_buffer: &index_buffer,
            index_count,
            tile_texture: &tile_texture,
            noise_texture: &noise_texture,
            uniforms,
        });
        Ok(())
    }
}

async fn load_texture<H: ResourceHost>(
    host: &mut H,
    loader: &impl ImageLoader,
    source: &ImageSource,
) -> Result<H::Texture, ImageLoadError> {
    let image = loader.load(source).await.inspect_err(|err| {
        log::error!("Texture unavailable: {}", err);
    })?;
    let texture = host.create_texture(&image);
    log::debug!(
        "Created {}x{} texture {:?}",
        image.width(),
        image.height(),
        texture
    );
    Ok(texture)
}
