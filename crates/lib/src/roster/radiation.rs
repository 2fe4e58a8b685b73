//! Sampling of `m_radiation_extra` for ships added to a fleet.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Chooses a radiation value for a newly compacted ship.
///
/// `known` holds the values of the ships already in the fleet, in roster order.
pub trait RadiationSampler {
    fn sample(&mut self, known: &[f64]) -> f64;
}

impl<S: RadiationSampler + ?Sized> RadiationSampler for &mut S {
    fn sample(&mut self, known: &[f64]) -> f64 {
        (**self).sample(known)
    }
}

/// Draws from a normal distribution fitted to the known values, rejecting
/// non-positive results.
///
/// With more than three finite known values the distribution uses their mean and a
/// standard deviation normalised by `n + 1`; otherwise it is `N(1, 1)`.
#[derive(Debug)]
pub struct NormalRadiation {
    rng: StdRng,
}

/// Minimum number of known values needed to fit the distribution.
const MIN_FIT: usize = 4;

/// Draws from a fitted distribution before falling back to `N(1, 1)`.
const MAX_DRAWS: usize = 10_000;

impl NormalRadiation {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn positive_draw(&mut self, mean: f64, std_dev: f64, attempts: usize) -> Option<f64> {
        (0..attempts)
            .map(|_| self.rng.sample::<f64, _>(StandardNormal) * std_dev + mean)
            .find(|value| *value > 0.0)
    }
}

impl Default for NormalRadiation {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean and standard deviation with an `n + 1` denominator.
pub(crate) fn fit(known: &[f64]) -> Option<(f64, f64)> {
    let finite: Vec<f64> = known.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < MIN_FIT {
        return None;
    }

    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let squares = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((mean, (squares / (n + 1.0)).sqrt()))
}

impl RadiationSampler for NormalRadiation {
    fn sample(&mut self, known: &[f64]) -> f64 {
        if let Some((mean, std_dev)) = fit(known) {
            if let Some(value) = self.positive_draw(mean, std_dev, MAX_DRAWS) {
                return value;
            }
            tracing::warn!(
                mean,
                std_dev,
                "fitted radiation distribution yields no positive values, using N(1, 1)"
            );
        }

        loop {
            if let Some(value) = self.positive_draw(1.0, 1.0, MAX_DRAWS) {
                return value;
            }
        }
    }
}
