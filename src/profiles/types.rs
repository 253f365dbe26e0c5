//! Common types and traits for the synthetic hourly profiles.

use rand::{Rng, rngs::StdRng};

/// Trait for a synthetic signal sampled once per hour.
///
/// Implementors own their random stream, so sampling the same profile twice
/// at the same hour advances the stream and yields a fresh draw.
pub trait Profile {
    /// Returns the value at the given hour of day (0..=23).
    fn sample(&mut self, hour: u32) -> f64;

    /// Returns a human-readable name for the profile.
    fn name(&self) -> &'static str;
}

/// Diurnal sine term `sin(2π·hour/24)`, peaking at 06:00 and bottoming at 18:00.
pub fn diurnal_sine(hour: u32) -> f64 {
    (2.0 * std::f64::consts::PI * f64::from(hour % 24) / 24.0).sin()
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
