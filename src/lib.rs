//! synthroad - an endless low-poly road running into a mountain range
//!
//! Flat grids are bent along cubic Bézier curves in the vertex stage and
//! scrolled through a noise texture to fake infinite terrain.

pub mod bezier;
pub mod cli;
pub mod error;
pub mod host;
pub mod matrix;
pub mod mesh;
pub mod model;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod texture;
pub mod wrap;
