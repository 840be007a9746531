//! Sensor capability views
//!
//! Each sensor is a stateless decoder/encoder over a group of registers,
//! borrowing the shared device handle from the board facade. Operating
//! modes live in bit-fields of the shared status register; mode updates
//! are masked so neighbouring fields are never disturbed.

pub mod indoor_air_quality;
pub mod outdoor_air_quality;
pub mod temperature_humidity;

pub use indoor_air_quality::{
    IndoorAirQualityLevel, IndoorAirQualityMode, IndoorAirQualitySensor,
};
pub use outdoor_air_quality::{
    OutdoorAirQualityLevel, OutdoorAirQualityMode, OutdoorAirQualitySensor,
};
pub use temperature_humidity::TemperatureHumiditySensor;
