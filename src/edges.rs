//! Connective edges between nearby particles and between particles and the pointer
//!
//! An edge exists when two points are closer than a threshold. Its opacity
//! falls linearly from `max_opacity` at distance zero to nothing at the
//! threshold:
//!
//! ```text
//! opacity = max_opacity * (1 - distance / threshold)    for distance < threshold
//! ```
//!
//! The particle pass visits every unordered pair exactly once, so its cost is
//! N(N-1)/2 distance checks per frame. Config validation caps N for that reason.

use image::Rgba;

use crate::models::{Particle, PointerState};

/// How edges of one kind are detected and drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    /// Distance at or beyond which no edge is drawn
    pub threshold: f64,
    /// Opacity of an edge between coincident points
    pub max_opacity: f64,
    /// Stroke width
    pub line_width: f64,
    /// Stroke color
    pub color: Rgba<u8>,
}

impl LinkStyle {
    /// Opacity for an edge of the given length, if one should be drawn.
    pub fn opacity(&self, distance: f64) -> Option<f64> {
        edge_opacity(distance, self.threshold, self.max_opacity)
    }
}

/// Opacity of an edge of length `distance`.
///
/// Returns `None` when `distance >= threshold`. Strictly decreasing on
/// `[0, threshold)` for a positive `max_opacity`.
pub fn edge_opacity(distance: f64, threshold: f64, max_opacity: f64) -> Option<f64> {
    if distance < threshold {
        Some(max_opacity * (1.0 - distance / threshold))
    } else {
        None
    }
}

/// Edge between particles `i` and `j` (always `i < j`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEdge {
    pub i: usize,
    pub j: usize,
    pub opacity: f64,
}

/// Edge between particle `index` and the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEdge {
    pub index: usize,
    pub opacity: f64,
}

/// Call `visit` for every unordered particle pair closer than the threshold.
pub fn visit_connective_edges<F>(particles: &[Particle], style: &LinkStyle, mut visit: F)
where
    F: FnMut(PairEdge),
{
    for i in 0..particles.len() {
        let a = particles[i].position();
        for j in (i + 1)..particles.len() {
            let distance = a.distance(&particles[j].position());
            if let Some(opacity) = style.opacity(distance) {
                visit(PairEdge { i, j, opacity });
            }
        }
    }
}

/// Collect every particle-to-particle edge.
pub fn connective_edges(particles: &[Particle], style: &LinkStyle) -> Vec<PairEdge> {
    let mut edges = Vec::new();
    visit_connective_edges(particles, style, |edge| edges.push(edge));
    edges
}

/// Call `visit` for every particle close enough to the pointer.
///
/// Visits nothing while the pointer is absent.
pub fn visit_pointer_edges<F>(
    particles: &[Particle],
    pointer: &PointerState,
    style: &LinkStyle,
    mut visit: F,
) where
    F: FnMut(PointerEdge),
{
    let Some(target) = pointer.position() else {
        return;
    };
    for (index, particle) in particles.iter().enumerate() {
        let distance = particle.position().distance(&target);
        if let Some(opacity) = style.opacity(distance) {
            visit(PointerEdge { index, opacity });
        }
    }
}

/// Collect every particle-to-pointer edge.
pub fn pointer_edges(
    particles: &[Particle],
    pointer: &PointerState,
    style: &LinkStyle,
) -> Vec<PointerEdge> {
    let mut edges = Vec::new();
    visit_pointer_edges(particles, pointer, style, |edge| edges.push(edge));
    edges
}
