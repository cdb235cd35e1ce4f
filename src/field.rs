//! The particle field: a fixed population of drifting points
//!
//! Each frame the field clears its surface, moves every particle by its
//! velocity, re-randomizes any particle that left the surface, draws the
//! particles, then draws connective lines between close pairs and between
//! particles and the pointer.
//!
//! Particles that leave the surface are re-rolled in place rather than
//! clamped or reflected, which reads as new particles drifting in.

use image::Rgba;
use rand::Rng;
use serde::Serialize;

use crate::color::{CYAN, LAVENDER, VIOLET};
use crate::edges::{visit_connective_edges, visit_pointer_edges, LinkStyle};
use crate::models::{Particle, PointerState, SurfaceDimensions};
use crate::surface::Surface;

/// Resolved parameters a field is built from.
///
/// Usually produced by [`FieldConfig::settings`](crate::config::FieldConfig::settings);
/// the default is the stock portfolio backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSettings {
    /// Population size
    pub count: usize,
    /// Radius range [min, max)
    pub radius: (f64, f64),
    /// Velocity spread per axis, centered on zero
    pub speed: f64,
    /// Opacity range [min, max)
    pub alpha: (f64, f64),
    /// Particle colors
    pub palette: Vec<Rgba<u8>>,
    /// Particle-to-particle lines
    pub edges: LinkStyle,
    /// Particle-to-pointer lines
    pub pointer: LinkStyle,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            count: 110,
            radius: (0.5, 2.5),
            speed: 0.4,
            alpha: (0.1, 0.7),
            palette: vec![VIOLET, CYAN, LAVENDER],
            edges: LinkStyle { threshold: 120.0, max_opacity: 0.12, line_width: 0.5, color: VIOLET },
            pointer: LinkStyle { threshold: 150.0, max_opacity: 0.2, line_width: 0.7, color: CYAN },
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Population after the update (always the configured count)
    pub particles: usize,
    /// Particles re-randomized because they left the surface
    pub resets: usize,
    /// Particle-to-particle lines drawn
    pub connective_edges: usize,
    /// Particle-to-pointer lines drawn
    pub pointer_edges: usize,
}

/// A constant-size population of particles plus the pointer and surface
/// state they react to.
#[derive(Debug, Clone)]
pub struct ParticleField<R> {
    settings: FieldSettings,
    particles: Vec<Particle>,
    pointer: PointerState,
    dims: SurfaceDimensions,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// Build a field with `settings.count` freshly randomized particles.
    pub fn new(settings: FieldSettings, dims: SurfaceDimensions, mut rng: R) -> Self {
        let particles = (0..settings.count).map(|_| spawn(&mut rng, &settings, dims)).collect();
        log::debug!("Particle field created: {} particles on {}", settings.count, dims);
        Self { settings, particles, pointer: PointerState::new(), dims, rng }
    }

    /// Build a field from an explicit population (fixtures, replays).
    pub fn with_particles(
        settings: FieldSettings,
        dims: SurfaceDimensions,
        particles: Vec<Particle>,
        rng: R,
    ) -> Self {
        Self { settings, particles, pointer: PointerState::new(), dims, rng }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    pub fn dimensions(&self) -> SurfaceDimensions {
        self.dims
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Record a pointer move.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer.move_to(x, y);
    }

    /// Adopt new surface dimensions.
    ///
    /// Existing particles are left alone; those now outside are re-rolled
    /// on their next update.
    pub fn resize(&mut self, dims: SurfaceDimensions) {
        self.dims = dims;
    }

    /// Advance every particle one frame without drawing.
    ///
    /// Returns how many particles were re-randomized.
    pub fn update(&mut self) -> usize {
        let mut resets = 0;
        for i in 0..self.particles.len() {
            if self.advance(i) {
                resets += 1;
            }
        }
        resets
    }

    /// Run one full frame against `surface`.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear();

        let mut stats = FrameStats { particles: self.particles.len(), ..FrameStats::default() };

        for i in 0..self.particles.len() {
            if self.advance(i) {
                stats.resets += 1;
            }
            let p = self.particles[i];
            let color = self.palette_color(p.color);
            surface.fill_circle(p.position(), p.r, color, p.alpha);
        }

        let particles = &self.particles;
        let edges = self.settings.edges;
        visit_connective_edges(particles, &edges, |edge| {
            let (a, b) = (particles[edge.i].position(), particles[edge.j].position());
            surface.stroke_line(a, b, edges.color, edge.opacity, edges.line_width);
            stats.connective_edges += 1;
        });

        let pointer = self.settings.pointer;
        if let Some(target) = self.pointer.position() {
            visit_pointer_edges(particles, &self.pointer, &pointer, |edge| {
                let from = particles[edge.index].position();
                surface.stroke_line(from, target, pointer.color, edge.opacity, pointer.line_width);
                stats.pointer_edges += 1;
            });
        }

        log::trace!("frame: {:?}", stats);
        stats
    }

    /// Move particle `i`; re-roll it if it left the surface.
    fn advance(&mut self, i: usize) -> bool {
        let particle = &mut self.particles[i];
        particle.advance();
        if particle.is_within(self.dims) {
            return false;
        }
        *particle = spawn(&mut self.rng, &self.settings, self.dims);
        true
    }

    fn palette_color(&self, index: usize) -> Rgba<u8> {
        self.settings.palette.get(index).copied().unwrap_or(VIOLET)
    }
}

/// Draw a fresh particle inside `dims`.
///
/// Positions are `random * extent`, so a zero-area surface puts every
/// particle on the origin.
pub fn spawn<R: Rng>(rng: &mut R, settings: &FieldSettings, dims: SurfaceDimensions) -> Particle {
    let (r_min, r_max) = settings.radius;
    let (a_min, a_max) = settings.alpha;
    let palette_len = settings.palette.len().max(1);

    Particle {
        x: rng.random::<f64>() * dims.width as f64,
        y: rng.random::<f64>() * dims.height as f64,
        r: r_min + rng.random::<f64>() * (r_max - r_min),
        vx: (rng.random::<f64>() - 0.5) * settings.speed,
        vy: (rng.random::<f64>() - 0.5) * settings.speed,
        color: rng.random_range(0..palette_len),
        alpha: a_min + rng.random::<f64>() * (a_max - a_min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stock_field(w: u32, h: u32, seed: u64) -> ParticleField<StdRng> {
        ParticleField::new(
            FieldSettings::default(),
            SurfaceDimensions::new(w, h),
            StdRng::seed_from_u64(seed),
        )
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle { x, y, r: 1.0, vx: 0.0, vy: 0.0, color: 0, alpha: 0.5 }
    }

    #[test]
    fn test_spawn_ranges() {
        let settings = FieldSettings::default();
        let dims = SurfaceDimensions::new(800, 600);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = spawn(&mut rng, &settings, dims);
            assert!(p.x >= 0.0 && p.x < 800.0);
            assert!(p.y >= 0.0 && p.y < 600.0);
            assert!(p.r >= 0.5 && p.r < 2.5);
            assert!(p.vx >= -0.2 && p.vx < 0.2);
            assert!(p.vy >= -0.2 && p.vy < 0.2);
            assert!(p.alpha >= 0.1 && p.alpha < 0.7);
            assert!(p.color < 3);
        }
    }

    #[test]
    fn test_new_field_has_configured_population() {
        let field = stock_field(800, 600, 1);
        assert_eq!(field.particles().len(), 110);
        assert!(!field.pointer().is_present());
    }

    #[test]
    fn test_exit_rerolls_instead_of_clamping() {
        let mut field = ParticleField::with_particles(
            FieldSettings::default(),
            SurfaceDimensions::new(100, 100),
            vec![Particle { vx: -5.0, ..still(1.0, 50.0) }, still(50.0, 50.0)],
            StdRng::seed_from_u64(3),
        );

        let resets = field.update();
        assert_eq!(resets, 1);
        let rerolled = field.particles()[0];
        assert!(rerolled.is_within(SurfaceDimensions::new(100, 100)));
        assert!(rerolled.vx.abs() <= 0.2, "velocity was re-randomized too");
        assert_eq!(field.particles()[1], still(50.0, 50.0));
    }

    #[test]
    fn test_resize_does_not_touch_particles() {
        let mut field = stock_field(800, 600, 2);
        let before = field.particles().to_vec();
        field.resize(SurfaceDimensions::new(200, 100));
        assert_eq!(field.particles(), &before[..]);
        assert_eq!(field.dimensions(), SurfaceDimensions::new(200, 100));
    }

    #[test]
    fn test_zero_area_collapses_to_origin() {
        let mut field = stock_field(0, 0, 5);
        for _ in 0..3 {
            field.update();
            for p in field.particles() {
                assert_eq!((p.x, p.y), (0.0, 0.0));
            }
        }
        assert_eq!(field.particles().len(), 110);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut field = ParticleField::with_particles(
            FieldSettings::default(),
            SurfaceDimensions::new(200, 200),
            vec![still(10.0, 10.0), still(20.0, 10.0)],
            StdRng::seed_from_u64(0),
        );
        field.set_pointer(10.0, 20.0);

        let mut surface = RecordingSurface::new(SurfaceDimensions::new(200, 200));
        let stats = field.frame(&mut surface);

        assert_eq!(
            stats,
            FrameStats { particles: 2, resets: 0, connective_edges: 1, pointer_edges: 2 }
        );
        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));
        assert!(matches!(commands[3], DrawCommand::Line { color, width, .. } if color == VIOLET && width == 0.5));
        assert!(matches!(commands[4], DrawCommand::Line { color, width, .. } if color == CYAN && width == 0.7));
        assert_eq!(commands.len(), 6);
    }

    #[test]
    fn test_pointer_line_ends_at_pointer() {
        let mut field = ParticleField::with_particles(
            FieldSettings::default(),
            SurfaceDimensions::new(200, 200),
            vec![still(50.0, 50.0)],
            StdRng::seed_from_u64(0),
        );
        field.set_pointer(80.0, 90.0);

        let mut surface = RecordingSurface::new(SurfaceDimensions::new(200, 200));
        field.frame(&mut surface);

        let line = surface.lines().next().cloned();
        match line {
            Some(DrawCommand::Line { from, to, opacity, .. }) => {
                assert_eq!((from.x, from.y), (50.0, 50.0));
                assert_eq!((to.x, to.y), (80.0, 90.0));
                assert!((opacity - 0.2 * (1.0 - 50.0 / 150.0)).abs() < 1e-12);
            }
            other => panic!("expected a pointer line, got {:?}", other),
        }
    }

    #[test]
    fn test_circle_uses_particle_color_and_alpha() {
        let mut field = ParticleField::with_particles(
            FieldSettings::default(),
            SurfaceDimensions::new(100, 100),
            vec![Particle { color: 2, alpha: 0.3, r: 2.0, ..still(5.0, 5.0) }],
            StdRng::seed_from_u64(0),
        );
        let mut surface = RecordingSurface::new(SurfaceDimensions::new(100, 100));
        field.frame(&mut surface);

        let circle = surface.circles().next().cloned();
        assert_eq!(
            circle,
            Some(DrawCommand::Circle {
                center: crate::models::Point::new(5.0, 5.0),
                radius: 2.0,
                color: LAVENDER,
                opacity: 0.3,
            })
        );
    }
}
