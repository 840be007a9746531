//! Register-level driver for the Arduino Nicla Sense Env board
//!
//! The board bundles an HS4001 temperature/humidity sensor, a ZMOD4410
//! indoor air quality sensor, a ZMOD4510 outdoor air quality sensor, an
//! RGB LED and an orange LED behind a single I2C slave exposing a flat
//! byte-addressable register map.
//!
//! This crate provides:
//!
//! - The register map and typed register access ([`regmap`], [`device`])
//! - The flash persistence handshake ([`device::I2cDevice::persist`])
//! - The board facade with configuration and identity registers ([`board`])
//! - Stateless capability views for the sensors and LEDs ([`sensor`], [`led`])
//!
//! The driver is written against the bus and clock traits in `senseenv-hal`
//! and is fully testable on the host against a simulated device.
//!
//! # Example
//!
//! ```ignore
//! let mut board = NiclaSenseEnv::new(bus, timer);
//! if board.init()? {
//!     let mut iaq = board.indoor_air_quality_sensor();
//!     iaq.set_mode(IndoorAirQualityMode::IndoorAirQuality, true)?;
//!     let quality = iaq.air_quality()?;
//! }
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod device;
pub mod error;
pub mod led;
pub mod regmap;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing;

pub use board::{BaudRate, NiclaSenseEnv};
pub use device::{I2cDevice, DEFAULT_DEVICE_ADDRESS};
pub use error::Error;
pub use led::{Color, OrangeLed, RgbLed};
pub use regmap::{Register, RegisterValue};
pub use sensor::{
    IndoorAirQualityLevel, IndoorAirQualityMode, IndoorAirQualitySensor, OutdoorAirQualityLevel,
    OutdoorAirQualityMode, OutdoorAirQualitySensor, TemperatureHumiditySensor,
};
