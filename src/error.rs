//! Error types for resource acquisition and rendering.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Vertex/fragment source failed to compile or link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("shader compile/link failed: {diagnostic}")]
pub struct ShaderCompileError {
    /// Compiler or linker output
    pub diagnostic: String,
}

impl ShaderCompileError {
    pub fn new<T: ToString>(diagnostic: T) -> Self {
        Self {
            diagnostic: diagnostic.to_string(),
        }
    }
}

/// Texture source could not be fetched or decoded.
///
/// Cloneable so a model can keep returning the failure it cached.
#[derive(Error, Debug, Clone)]
pub enum ImageLoadError {
    #[error("failed to read image {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[source] Arc<image::ImageError>),
}

impl From<image::ImageError> for ImageLoadError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(Arc::new(err))
    }
}

/// Failure while drawing a model.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderCompileError),

    #[error(transparent)]
    Image(#[from] ImageLoadError),
}

/// GPU host could not be brought up.
#[derive(Error, Debug)]
pub enum HostInitError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("surface reports no supported formats")]
    UnsupportedSurface,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

pub type RenderResult<T> = Result<T, RenderError>;
