//! Animated grid models.

mod animation;
mod grid;

pub use animation::AnimationState;
pub use grid::GridModel;
