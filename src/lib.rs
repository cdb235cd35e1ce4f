//! Particle field - a drifting-points backdrop with proximity lines
//!
//! This library provides:
//! - A particle field that drifts, re-seeds escaped particles and links
//!   nearby particles (and the pointer) with fading lines
//! - A debounced resize path and a cancellable frame loop around it
//! - Drawing backends: browser canvas (`wasm` feature), RGBA raster, and a
//!   recording surface for tests
//! - A headless simulation used by the `pfx` preview CLI

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod edges;
pub mod field;
pub mod frame_loop;
pub mod gif;
pub mod models;
pub mod output;
pub mod raster;
pub mod simulate;
pub mod surface;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;
