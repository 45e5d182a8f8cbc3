use anyhow::{bail, ensure};
use hotspot_grid::{Point, WorldPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::SourceSettings;

/// An entity as sampled from the host: position plus its registry id.
pub type Entity = Point<u64>;

/// Supplies a fresh entity snapshot on every detector tick.
///
/// Stands in for the host's live object registry; the detector never keeps
/// a sample past the tick that requested it.
pub trait PointSource: Send {
    fn sample(&mut self) -> Vec<Entity>;
}

/// Synthetic registry: uniform background noise plus drifting dense blobs.
pub struct ScatterSource {
    rng: StdRng,
    settings: SourceSettings,
    centers: Vec<WorldPoint>,
}

impl ScatterSource {
    pub fn new(settings: SourceSettings) -> anyhow::Result<Self> {
        if !(settings.extent.is_finite() && settings.extent > 0.0) {
            bail!("source.extent must be a positive number, got {}", settings.extent);
        }
        ensure!(
            settings.blob_radius.is_finite() && settings.blob_radius >= 0.0,
            "source.blob_radius must be non-negative, got {}",
            settings.blob_radius
        );
        ensure!(
            settings.drift.is_finite() && settings.drift >= 0.0,
            "source.drift must be non-negative, got {}",
            settings.drift
        );
        ensure!(
            (0.0..=1.0).contains(&settings.missing_ratio),
            "source.missing_ratio must be within [0, 1], got {}",
            settings.missing_ratio
        );

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let centers = (0..settings.blobs)
            .map(|_| {
                WorldPoint::new(
                    rng.random_range(0.0..settings.extent),
                    rng.random_range(0.0..settings.extent),
                )
            })
            .collect();

        Ok(Self { rng, settings, centers })
    }

    pub fn centers(&self) -> &[WorldPoint] {
        &self.centers
    }

    fn drift_centers(&mut self) {
        let (drift, extent) = (self.settings.drift, self.settings.extent);
        for c in &mut self.centers {
            c.x = (c.x + jitter(&mut self.rng, drift)).clamp(0.0, extent);
            c.y = (c.y + jitter(&mut self.rng, drift)).clamp(0.0, extent);
        }
    }

    fn entity(&mut self, id: u64, x: f64, y: f64) -> Entity {
        let ratio = self.settings.missing_ratio;
        if ratio > 0.0 && self.rng.random_bool(ratio) {
            // Registries hand out entities before their first position update.
            if self.rng.random_bool(0.5) {
                return Point::partial(None, Some(y), id);
            }
            return Point::partial(Some(x), None, id);
        }
        Point::new(x, y, id)
    }
}

impl PointSource for ScatterSource {
    fn sample(&mut self) -> Vec<Entity> {
        self.drift_centers();

        let s = &self.settings;
        let capacity = s.noise_points + s.blobs * s.blob_points;
        let (noise_points, blob_points, extent, radius) =
            (s.noise_points, s.blob_points, s.extent, s.blob_radius);
        let mut entities = Vec::with_capacity(capacity);

        for _ in 0..noise_points {
            let x = self.rng.random_range(0.0..extent);
            let y = self.rng.random_range(0.0..extent);
            let id = entities.len() as u64;
            entities.push(self.entity(id, x, y));
        }
        for b in 0..self.centers.len() {
            let center = self.centers[b];
            for _ in 0..blob_points {
                let x = center.x + jitter(&mut self.rng, radius);
                let y = center.y + jitter(&mut self.rng, radius);
                let id = entities.len() as u64;
                entities.push(self.entity(id, x, y));
            }
        }

        debug!(entities = entities.len(), blobs = self.centers.len(), "Sampled synthetic snapshot");
        entities
    }
}

fn jitter(rng: &mut StdRng, r: f64) -> f64 {
    if r > 0.0 { rng.random_range(-r..=r) } else { 0.0 }
}
