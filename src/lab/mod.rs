//! Lab domain types: simulated scenes, audio commands and sensor readings.

pub mod audio;
pub mod scenario;
pub mod sensors;

pub use audio::AudioCommand;
pub use scenario::{Scenario, Severity};
pub use sensors::{InsightRequest, SensorReading, coerce_number, extract_recommendations};
