use rand::{SeedableRng, rngs::StdRng};

use super::types::{Profile, diurnal_sine, gaussian_noise};

/// Ambient temperature loosely following the hour of day.
#[derive(Debug, Clone)]
pub struct TemperatureProfile {
    /// Mean temperature (°C).
    pub base_c: f64,
    /// Diurnal amplitude (°C).
    pub amplitude_c: f64,
    /// Gaussian noise standard deviation (°C).
    pub noise_std: f64,
    rng: StdRng,
}

impl TemperatureProfile {
    pub fn new(base_c: f64, amplitude_c: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            base_c,
            amplitude_c,
            noise_std: noise_std.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for TemperatureProfile {
    fn sample(&mut self, hour: u32) -> f64 {
        let noise = gaussian_noise(&mut self.rng, self.noise_std);
        self.base_c + self.amplitude_c * diurnal_sine(hour) + noise
    }

    fn name(&self) -> &'static str {
        "Temperature"
    }
}
