//! HS4001 temperature/humidity sensor

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::device::I2cDevice;
use crate::error::Error;
use crate::regmap::reg;

/// Enable flag in the shared status register
const ENABLE_BIT: u8 = 1;

/// Raw reading reported while the sensor is still warming up
const WARMUP_SENTINEL: f32 = -300.0;

/// Temperature/humidity sensor view
pub struct TemperatureHumiditySensor<'a, B, T> {
    dev: &'a mut I2cDevice<B, T>,
}

impl<'a, B, T> TemperatureHumiditySensor<'a, B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    pub(crate) fn new(dev: &'a mut I2cDevice<B, T>) -> Self {
        Self { dev }
    }

    /// Temperature in degrees Celsius
    ///
    /// `None` while the sensor has no reading yet (the chip reports a
    /// -300.0 sentinel until the first conversion completes).
    pub fn temperature(&mut self) -> Result<Option<f32>, Error<B::Error>> {
        let celsius: f32 = self.dev.read(reg::TEMPERATURE)?;
        if celsius == WARMUP_SENTINEL {
            return Ok(None);
        }
        Ok(Some(celsius))
    }

    /// Relative humidity in percent
    pub fn humidity(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::HUMIDITY)
    }

    /// Number of samples taken since power-on
    pub fn sample_counter(&mut self) -> Result<u32, Error<B::Error>> {
        self.dev.read(reg::HS4001_SAMPLE_COUNTER)
    }

    /// Whether the sensor is enabled
    pub fn enabled(&mut self) -> Result<bool, Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        Ok(status & ENABLE_BIT != 0)
    }

    /// Enable or disable the sensor
    ///
    /// No-op when the sensor is already in the requested state. With
    /// `persist` the new state survives power cycles.
    pub fn set_enabled(&mut self, enabled: bool, persist: bool) -> Result<(), Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        if (status & ENABLE_BIT != 0) == enabled {
            return Ok(());
        }

        let bit = if enabled { ENABLE_BIT } else { 0 };
        self.dev.write(reg::STATUS, (status & !ENABLE_BIT) | bit)?;

        if persist {
            self.dev.persist(reg::STATUS)?;
        }
        Ok(())
    }
}
