//! Fading trail of cells the player has walked through.

use std::{collections::BTreeMap, f64::consts::PI, time::Duration};

use dark_maze_core::{tuning::LightTuning, CellCoord};

/// Intensity of a footprint of the provided age.
///
/// Follows a half cosine from `max_intensity` at age zero down to exactly zero
/// once `age` reaches `window`.
#[must_use]
pub fn footprint_intensity(age: Duration, window: Duration, max_intensity: f32) -> f32 {
    if window.is_zero() || age >= window {
        return 0.0;
    }

    let ratio = age.as_secs_f64() / window.as_secs_f64();
    let eased = ((PI * ratio).cos() + 1.0) * 0.5;
    (f64::from(max_intensity) * eased) as f32
}

/// Single glowing marker left behind by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    position: CellCoord,
    timestamp: Duration,
    intensity: f32,
}

impl Footprint {
    /// Cell the footprint glows on.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Intensity as of the most recent decay pass.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Footprints keyed by cell; a newer footprint replaces an older one.
#[derive(Clone, Debug)]
pub struct FootprintTrail {
    entries: BTreeMap<CellCoord, Footprint>,
    window: Duration,
    max_intensity: f32,
}

impl FootprintTrail {
    /// Creates an empty trail with explicit decay parameters.
    #[must_use]
    pub fn new(window: Duration, max_intensity: f32) -> Self {
        Self {
            entries: BTreeMap::new(),
            window,
            max_intensity: max_intensity.clamp(0.0, 1.0),
        }
    }

    /// Creates an empty trail using the footprint knobs of `tuning`.
    #[must_use]
    pub fn from_tuning(tuning: &LightTuning) -> Self {
        Self::new(tuning.footprint_window(), tuning.max_footprint_intensity)
    }

    /// Lays a fresh footprint at `cell`, replacing any older one there.
    pub fn record(&mut self, cell: CellCoord, now: Duration) {
        let footprint = Footprint {
            position: cell,
            timestamp: now,
            intensity: self.max_intensity,
        };
        let _ = self.entries.insert(cell, footprint);
    }

    /// Recomputes every intensity for `now` and drops fully faded footprints.
    ///
    /// Returns the number of footprints removed.
    pub fn decay(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        let window = self.window;
        let max_intensity = self.max_intensity;
        self.entries.retain(|_, footprint| {
            let age = now.saturating_sub(footprint.timestamp);
            footprint.intensity = footprint_intensity(age, window, max_intensity);
            age < window && footprint.intensity > 0.0
        });
        before - self.entries.len()
    }

    /// Intensity stored for `cell`, if a footprint glows there.
    #[must_use]
    pub fn intensity_at(&self, cell: CellCoord) -> Option<f32> {
        self.entries.get(&cell).map(Footprint::intensity)
    }

    /// Iterator over the footprints ordered by cell.
    pub fn iter(&self) -> impl Iterator<Item = &Footprint> {
        self.entries.values()
    }

    /// Number of glowing footprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the trail holds no footprints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every footprint.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
