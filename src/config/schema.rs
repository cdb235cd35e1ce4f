//! Configuration schema types for `particles.toml`
//!
//! Every field has a default equal to the stock portfolio backdrop, so an
//! empty file (or no file at all) yields the standard 110-particle field.

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::edges::LinkStyle;
use crate::field::FieldSettings;

/// Largest population accepted by validation.
///
/// The connective pass is quadratic in the population; raising this needs a
/// spatial index in `edges` first.
pub const MAX_PARTICLES: usize = 400;

/// Root of `particles.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Population and per-particle randomization ranges
    #[serde(default)]
    pub particles: ParticlesConfig,
    /// Particle-to-particle lines
    #[serde(default)]
    pub edges: EdgesConfig,
    /// Particle-to-pointer lines
    #[serde(default)]
    pub pointer: PointerConfig,
    /// Viewport resize handling
    #[serde(default)]
    pub resize: ResizeConfig,
}

/// `[particles]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticlesConfig {
    /// Population size, fixed for the lifetime of a field
    #[serde(default = "default_count")]
    pub count: usize,
    /// Radius range [min, max)
    #[serde(default = "default_radius")]
    pub radius: [f64; 2],
    /// Velocity spread; each axis is drawn from [-speed/2, speed/2)
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Opacity range [min, max)
    #[serde(default = "default_alpha")]
    pub alpha: [f64; 2],
    /// Particle colors, picked uniformly
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            radius: default_radius(),
            speed: default_speed(),
            alpha: default_alpha(),
            palette: default_palette(),
        }
    }
}

fn default_count() -> usize {
    110
}

fn default_radius() -> [f64; 2] {
    [0.5, 2.5]
}

fn default_speed() -> f64 {
    0.4
}

fn default_alpha() -> [f64; 2] {
    [0.1, 0.7]
}

fn default_palette() -> Vec<String> {
    vec!["rgb(124, 58, 237)".to_string(), "rgb(6, 182, 212)".to_string(), "rgb(139, 92, 246)".to_string()]
}

/// `[edges]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgesConfig {
    /// Pairs at or beyond this distance draw nothing
    #[serde(default = "default_edge_threshold")]
    pub threshold: f64,
    /// Opacity of a zero-length edge
    #[serde(default = "default_edge_opacity")]
    pub max_opacity: f64,
    #[serde(default = "default_edge_width")]
    pub line_width: f64,
    #[serde(default = "default_edge_color")]
    pub color: String,
}

impl Default for EdgesConfig {
    fn default() -> Self {
        Self {
            threshold: default_edge_threshold(),
            max_opacity: default_edge_opacity(),
            line_width: default_edge_width(),
            color: default_edge_color(),
        }
    }
}

fn default_edge_threshold() -> f64 {
    120.0
}

fn default_edge_opacity() -> f64 {
    0.12
}

fn default_edge_width() -> f64 {
    0.5
}

fn default_edge_color() -> String {
    "rgb(124, 58, 237)".to_string()
}

/// `[pointer]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Particles at or beyond this distance from the pointer draw nothing
    #[serde(default = "default_pointer_threshold")]
    pub threshold: f64,
    #[serde(default = "default_pointer_opacity")]
    pub max_opacity: f64,
    #[serde(default = "default_pointer_width")]
    pub line_width: f64,
    #[serde(default = "default_pointer_color")]
    pub color: String,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            threshold: default_pointer_threshold(),
            max_opacity: default_pointer_opacity(),
            line_width: default_pointer_width(),
            color: default_pointer_color(),
        }
    }
}

fn default_pointer_threshold() -> f64 {
    150.0
}

fn default_pointer_opacity() -> f64 {
    0.2
}

fn default_pointer_width() -> f64 {
    0.7
}

fn default_pointer_color() -> String {
    "rgb(6, 182, 212)".to_string()
}

/// `[resize]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Quiet period before a burst of resize events takes effect
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

fn default_debounce_ms() -> u32 {
    100
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "edges.threshold")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "particles.toml: '{}' {}", self.field, self.message)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError { field: field.to_string(), message: message.into() }
}

/// Check a `[min, max]` range of finite values within `[lo, hi]`.
fn check_range(errors: &mut Vec<ConfigValidationError>, field: &str, range: [f64; 2], lo: f64, hi: f64) {
    let [min, max] = range;
    if !min.is_finite() || !max.is_finite() {
        errors.push(invalid(field, "must contain finite numbers"));
    } else if min > max {
        errors.push(invalid(field, format!("min {} is greater than max {}", min, max)));
    } else if min < lo || max > hi {
        errors.push(invalid(field, format!("must lie within [{}, {}]", lo, hi)));
    }
}

fn check_link(
    errors: &mut Vec<ConfigValidationError>,
    section: &str,
    threshold: f64,
    max_opacity: f64,
    line_width: f64,
    color: &str,
) {
    if !(threshold.is_finite() && threshold > 0.0) {
        errors.push(invalid(&format!("{}.threshold", section), "must be a positive number"));
    }
    if !(0.0..=1.0).contains(&max_opacity) {
        errors.push(invalid(&format!("{}.max_opacity", section), "must be between 0 and 1"));
    }
    if !(line_width.is_finite() && line_width > 0.0) {
        errors.push(invalid(&format!("{}.line_width", section), "must be a positive number"));
    }
    if let Err(e) = parse_color(color) {
        errors.push(invalid(&format!("{}.color", section), format!("is not a color: {}", e)));
    }
}

impl FieldConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let p = &self.particles;

        if p.count == 0 || p.count > MAX_PARTICLES {
            errors.push(invalid(
                "particles.count",
                format!("must be between 1 and {}", MAX_PARTICLES),
            ));
        }
        check_range(&mut errors, "particles.radius", p.radius, f64::MIN_POSITIVE, f64::MAX);
        if !(p.speed.is_finite() && p.speed >= 0.0) {
            errors.push(invalid("particles.speed", "must be a non-negative number"));
        }
        check_range(&mut errors, "particles.alpha", p.alpha, 0.0, 1.0);
        if p.palette.is_empty() {
            errors.push(invalid("particles.palette", "must contain at least one color"));
        }
        for (i, entry) in p.palette.iter().enumerate() {
            if let Err(e) = parse_color(entry) {
                errors.push(invalid(
                    &format!("particles.palette[{}]", i),
                    format!("is not a color: {}", e),
                ));
            }
        }

        let e = &self.edges;
        check_link(&mut errors, "edges", e.threshold, e.max_opacity, e.line_width, &e.color);
        let ptr = &self.pointer;
        check_link(&mut errors, "pointer", ptr.threshold, ptr.max_opacity, ptr.line_width, &ptr.color);

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Resolve into the settings a field is built from.
    ///
    /// Colors are parsed here; call [`validate`](Self::validate) first to get
    /// readable errors for every invalid entry at once.
    pub fn settings(&self) -> Result<FieldSettings, crate::color::ColorError> {
        let p = &self.particles;
        let palette = p.palette.iter().map(|c| parse_color(c)).collect::<Result<Vec<_>, _>>()?;

        Ok(FieldSettings {
            count: p.count,
            radius: (p.radius[0], p.radius[1]),
            speed: p.speed,
            alpha: (p.alpha[0], p.alpha[1]),
            palette,
            edges: LinkStyle {
                threshold: self.edges.threshold,
                max_opacity: self.edges.max_opacity,
                line_width: self.edges.line_width,
                color: parse_color(&self.edges.color)?,
            },
            pointer: LinkStyle {
                threshold: self.pointer.threshold,
                max_opacity: self.pointer.max_opacity,
                line_width: self.pointer.line_width,
                color: parse_color(&self.pointer.color)?,
            },
        })
    }
}
