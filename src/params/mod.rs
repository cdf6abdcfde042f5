//! Parameter definitions with units and documented defaults.
//!
//! Command line flags in [`crate::cli`] override these.

mod render;
mod scene;

pub use render::{ProjectionMode, RenderConfig, DEFAULT_MAX_DIMENSION};
pub use scene::{ModelParams, SceneParams, DEFAULT_NOISE_SEED};
