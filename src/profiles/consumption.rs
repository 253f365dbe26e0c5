use rand::{SeedableRng, rngs::StdRng};

use super::types::{Profile, diurnal_sine, gaussian_noise};

/// A household consumption generator with a daily sinusoidal cycle.
///
/// `ConsumptionProfile` produces `base + amplitude × (sin(2π·hour/24) + 1)`
/// plus Gaussian sensor jitter. The output is deliberately not clamped:
/// noise can push it below zero and the cleaning stage repairs that.
///
/// # Examples
///
/// ```
/// use energy_pipeline::profiles::{ConsumptionProfile, Profile};
///
/// // Noise-free profile: 50 kWh floor plus a 30 kWh swing
/// let mut load = ConsumptionProfile::new(50.0, 30.0, 0.0, 42);
///
/// // sin term is 0 at midnight, so the value sits at base + amplitude
/// assert_eq!(load.sample(0), 80.0);
/// ```
#[derive(Debug, Clone)]
pub struct ConsumptionProfile {
    /// Minimum consumption before the diurnal term (kWh)
    pub base_kwh: f64,

    /// Amplitude of the diurnal term (kWh)
    pub amplitude_kwh: f64,

    /// Standard deviation of the Gaussian noise (kWh)
    pub noise_std: f64,

    /// Random number generator for noise generation
    rng: StdRng,
}

impl ConsumptionProfile {
    /// Creates a new consumption generator.
    ///
    /// # Arguments
    ///
    /// * `base_kwh` - Consumption floor before the diurnal term
    /// * `amplitude_kwh` - Diurnal swing amplitude
    /// * `noise_std` - Gaussian noise standard deviation (negative values clamp to 0)
    /// * `seed` - Random seed for reproducible noise generation
    pub fn new(base_kwh: f64, amplitude_kwh: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base_kwh,
            amplitude_kwh,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for ConsumptionProfile {
    fn sample(&mut self, hour: u32) -> f64 {
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        self.base_kwh + self.amplitude_kwh * (diurnal_sine(hour) + 1.0) + noise
    }

    fn name(&self) -> &'static str {
        "Consumption"
    }
}
