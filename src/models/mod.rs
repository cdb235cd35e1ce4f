//! Data models for the particle field (particles, pointer, surface size)

mod dimensions;
mod particle;
mod pointer;

// Re-export all public types
pub use dimensions::{DimensionsError, SurfaceDimensions};
pub use particle::{Particle, Point};
pub use pointer::PointerState;
