#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure illumination system that decides how brightly each cell is lit.
//!
//! Light comes from three sources around the observer: a flashlight cone along
//! the aim direction, a small ambient glow, and the fading footprint trail. The
//! sources are combined by taking the maximum so overlapping light never
//! exceeds the brightest contributor. Cone and glow require an unobstructed
//! line of sight; footprints are remembered light and ignore occlusion.

mod footprint;
mod sight;

use dark_maze_core::{tuning::LightTuning, CellCoord};
use glam::Vec2;

pub use footprint::{footprint_intensity, Footprint, FootprintTrail};
pub use sight::{line_of_sight, sample_count};

/// Light source state carried by the player.
#[derive(Clone, Copy, Debug)]
pub struct Observer<'a> {
    /// Cell the light originates from.
    pub position: CellCoord,
    /// Direction the flashlight points along; need not be normalized.
    pub aim: Vec2,
    /// Footprints left behind by the observer.
    pub trail: &'a FootprintTrail,
}

/// Computes per-cell light intensity from the configured light sources.
#[derive(Clone, Debug)]
pub struct Illumination {
    tuning: LightTuning,
}

impl Illumination {
    /// Creates an illumination model using the provided tuning surface.
    #[must_use]
    pub fn new(tuning: LightTuning) -> Self {
        Self { tuning }
    }

    /// Tuning knobs currently in effect.
    #[must_use]
    pub fn tuning(&self) -> &LightTuning {
        &self.tuning
    }

    /// Light intensity in `0.0..=1.0` received by `target`.
    pub fn intensity<F>(&self, observer: &Observer<'_>, target: CellCoord, is_opaque: F) -> f32
    where
        F: Fn(CellCoord) -> bool,
    {
        let remembered = observer.trail.intensity_at(target).unwrap_or(0.0);

        let distance = observer.position.distance(target);
        let cone = self.cone_intensity(observer.position, observer.aim, target);
        let ambient = self.ambient_intensity(distance);
        let live = cone.max(ambient);

        let lit = if live > 0.0
            && line_of_sight(
                observer.position,
                target,
                self.tuning.los_samples_per_unit,
                is_opaque,
            ) {
            live
        } else {
            0.0
        };

        lit.max(remembered).clamp(0.0, 1.0)
    }

    /// Flashlight contribution at `target`, ignoring occlusion.
    ///
    /// The product of a linear distance falloff and a linear angular falloff;
    /// both reach zero at the cone boundary.
    #[must_use]
    pub fn cone_intensity(&self, origin: CellCoord, aim: Vec2, target: CellCoord) -> f32 {
        let range = self.tuning.flashlight_range;
        let half_angle = self.tuning.half_angle_radians();
        if range <= 0.0 || half_angle <= 0.0 {
            return 0.0;
        }

        let offset = target.to_vec2() - origin.to_vec2();
        let distance = offset.length();
        if distance > range {
            return 0.0;
        }
        if distance <= f32::EPSILON {
            return 1.0;
        }

        let aim = aim.normalize_or_zero();
        if aim == Vec2::ZERO {
            return 0.0;
        }

        let cosine = aim.dot(offset / distance).clamp(-1.0, 1.0);
        let angle = cosine.acos();
        if angle > half_angle {
            return 0.0;
        }

        let distance_falloff = (1.0 - distance / range).clamp(0.0, 1.0);
        let angular_falloff = (1.0 - angle / half_angle).clamp(0.0, 1.0);
        distance_falloff * angular_falloff
    }

    /// Ambient glow contribution at `distance` cells, ignoring occlusion.
    #[must_use]
    pub fn ambient_intensity(&self, distance: f32) -> f32 {
        let radius = self.tuning.ambient_radius;
        if radius <= 0.0 || distance > radius {
            return 0.0;
        }

        let falloff = 1.0 - distance / radius;
        (self.tuning.max_ambient * falloff * falloff).clamp(0.0, 1.0)
    }
}

impl Default for Illumination {
    fn default() -> Self {
        Self::new(LightTuning::default())
    }
}
