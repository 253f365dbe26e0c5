//! Synthetic hourly signal generators feeding the raw series.

/// Household consumption with a diurnal cycle.
pub mod consumption;
/// Solar generation under random cloud cover.
pub mod solar;
pub mod temperature;
pub mod types;

pub use consumption::ConsumptionProfile;
pub use solar::SolarProfile;
pub use temperature::TemperatureProfile;
pub use types::Profile;
