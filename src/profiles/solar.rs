use rand::{Rng, SeedableRng, rngs::StdRng};

use super::types::Profile;

/// A solar generator with a triangular daylight envelope and random cloud cover.
///
/// Between `sunrise_hour` and `sunset_hour` (both inclusive) the output is
/// `peak × (1 − |noon − hour| / half_span) × cloud_factor`, where `noon` is
/// the midpoint of the daylight window and `cloud_factor` is drawn uniformly
/// per hour. Outside the window the output is exactly zero.
#[derive(Debug, Clone)]
pub struct SolarProfile {
    /// Output at the envelope peak under clear sky (kWh).
    pub peak_kwh: f64,

    /// First daylight hour (inclusive).
    pub sunrise_hour: u32,

    /// Last daylight hour (inclusive).
    pub sunset_hour: u32,

    /// Lower bound of the cloud attenuation.
    pub cloud_min: f64,

    /// Upper bound of the cloud attenuation.
    pub cloud_max: f64,

    /// Random number generator for cloud draws.
    rng: StdRng,
}

impl SolarProfile {
    /// Creates a new solar generator.
    ///
    /// # Arguments
    ///
    /// * `peak_kwh` - Clear-sky output at the envelope peak
    /// * `sunrise_hour` - First daylight hour (inclusive)
    /// * `sunset_hour` - Last daylight hour (inclusive)
    /// * `cloud_min` / `cloud_max` - Uniform cloud attenuation bounds
    /// * `seed` - Random seed for reproducible cloud cover
    ///
    /// # Panics
    ///
    /// Panics if `sunrise_hour >= sunset_hour`, either cloud bound lies
    /// outside `[0, 1]` (NaN included) or `cloud_min > cloud_max`.
    pub fn new(
        peak_kwh: f64,
        sunrise_hour: u32,
        sunset_hour: u32,
        cloud_min: f64,
        cloud_max: f64,
        seed: u64,
    ) -> Self {
        assert!(sunrise_hour < sunset_hour);
        assert!((0.0..=1.0).contains(&cloud_min) && (0.0..=1.0).contains(&cloud_max));
        assert!(cloud_min <= cloud_max);
        Self {
            peak_kwh: peak_kwh.max(0.0),
            sunrise_hour,
            sunset_hour,
            cloud_min,
            cloud_max,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Clear-sky envelope fraction in [0, 1] for the given hour.
    pub fn daylight_frac(&self, hour: u32) -> f64 {
        if hour < self.sunrise_hour || hour > self.sunset_hour {
            return 0.0;
        }
        let noon = f64::from(self.sunrise_hour + self.sunset_hour) / 2.0;
        let half_span = f64::from(self.sunset_hour - self.sunrise_hour) / 2.0;
        (1.0 - (noon - f64::from(hour)).abs() / half_span).max(0.0)
    }
}

impl Profile for SolarProfile {
    fn sample(&mut self, hour: u32) -> f64 {
        if hour < self.sunrise_hour || hour > self.sunset_hour {
            return 0.0;
        }
        let cloud_factor = self.rng.random_range(self.cloud_min..=self.cloud_max);
        self.peak_kwh * self.daylight_frac(hour) * cloud_factor
    }

    fn name(&self) -> &'static str {
        "Solar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pv() -> SolarProfile {
        SolarProfile::new(40.0, 6, 18, 0.2, 1.0, 42)
    }

    #[test]
    fn test_daylight_frac() {
        let pv = pv();
        assert_eq!(pv.daylight_frac(0), 0.0);
        assert_eq!(pv.daylight_frac(5), 0.0);
        assert_eq!(pv.daylight_frac(6), 0.0);
        assert_eq!(pv.daylight_frac(12), 1.0);
        assert_eq!(pv.daylight_frac(18), 0.0);
        assert_eq!(pv.daylight_frac(19), 0.0);
        assert!((pv.daylight_frac(9) - 0.5).abs() < 1e-12);
        assert!((pv.daylight_frac(9) - pv.daylight_frac(15)).abs() < 1e-12);
    }

    #[test]
    fn test_no_generation_at_night() {
        let mut pv = pv();
        for h in (0..6).chain(19..24) {
            assert_eq!(pv.sample(h), 0.0);
        }
    }

    #[test]
    fn test_noon_within_cloud_bounds() {
        let mut pv = pv();
        for _ in 0..100 {
            let kwh = pv.sample(12);
            assert!((8.0..=40.0).contains(&kwh), "noon output {kwh} outside [8, 40]");
        }
    }

    #[test]
    fn test_clear_sky_hits_envelope() {
        let mut pv = SolarProfile::new(40.0, 6, 18, 1.0, 1.0, 0);
        assert_eq!(pv.sample(12), 40.0);
        assert!((pv.sample(9) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = pv();
        let mut b = pv();
        for h in 0..24 {
            assert_eq!(a.sample(h), b.sample(h));
        }
    }

    #[test]
    fn test_negative_peak_clamped_to_zero() {
        let pv = SolarProfile::new(-1.0, 6, 18, 0.2, 1.0, 0);
        assert_eq!(pv.peak_kwh, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_sunset_before_sunrise_panics() {
        SolarProfile::new(40.0, 18, 6, 0.2, 1.0, 0);
    }

    #[test]
    #[should_panic]
    fn test_nan_cloud_bound_panics() {
        SolarProfile::new(40.0, 6, 18, 0.2, f64::NAN, 0);
    }
}
