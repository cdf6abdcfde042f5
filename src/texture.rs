//! Texture sources, decoding and the image loader boundary.

mod procedural;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;

use crate::error::ImageLoadError;
use crate::wrap::NoiseField;

pub use procedural::{ProceduralTexture, PROCEDURAL_SIZE};

/// Where a texture's pixels come from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Image file on disk (any format the `image` crate decodes)
    Path(PathBuf),

    /// Inline encoded image document
    Encoded(Vec<u8>),

    /// Generated at load time
    Procedural {
        texture: ProceduralTexture,
        /// Edge length in pixels
        size: u32,
    },
}

impl ImageSource {
    /// Procedural texture at the default resolution
    pub fn procedural(texture: ProceduralTexture) -> Self {
        Self::Procedural {
            texture,
            size: PROCEDURAL_SIZE,
        }
    }
}

/// Decoded RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    image: RgbaImage,
}

impl DecodedImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode an encoded image document
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        Ok(Self::new(image::load_from_memory(bytes)?.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Tightly packed RGBA rows
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Both dimensions are powers of two (decides repeat vs clamp addressing)
    pub fn is_power_of_two(&self) -> bool {
        self.width().is_power_of_two() && self.height().is_power_of_two()
    }

    fn alpha_at(&self, x: i64, y: i64) -> f32 {
        let w = self.width() as i64;
        let h = self.height() as i64;
        let pixel = self
            .image
            .get_pixel(x.rem_euclid(w) as u32, y.rem_euclid(h) as u32);
        pixel.0[3] as f32 / 255.0
    }
}

impl NoiseField for DecodedImage {
    /// Bilinear alpha lookup with repeat addressing, as the GPU sampler does.
    fn sample_alpha(&self, uv: Vec2) -> f32 {
        if self.width() == 0 || self.height() == 0 {
            return 0.0;
        }

        let x = uv.x * self.width() as f32 - 0.5;
        let y = uv.y * self.height() as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let top = self.alpha_at(ix, iy) * (1.0 - fx) + self.alpha_at(ix + 1, iy) * fx;
        let bottom = self.alpha_at(ix, iy + 1) * (1.0 - fx) + self.alpha_at(ix + 1, iy + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// Asynchronous image source resolution.
///
/// Loading is the one suspension point of a frame: model draws await their
/// textures through this trait.
pub trait ImageLoader {
    fn load(
        &self,
        source: &ImageSource,
    ) -> impl Future<Output = Result<DecodedImage, ImageLoadError>>;
}

/// Default loader: reads files, decodes inline documents, renders
/// procedural textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl ImageLoader for ImageDecoder {
    async fn load(&self, source: &ImageSource) -> Result<DecodedImage, ImageLoadError> {
        match source {
            ImageSource::Path(path) => {
                log::debug!("Decoding texture {:?}", path);
                let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
                    path: path.clone(),
                    source: Arc::new(source),
                })?;
                DecodedImage::decode(&bytes)
            }
            ImageSource::Encoded(bytes) => DecodedImage::decode(bytes),
            ImageSource::Procedural { texture, size } => {
                log::debug!("Rendering procedural texture {:?} at {}px", texture, size);
                Ok(DecodedImage::new(texture.render(*size)))
            }
        }
    }
}
