//! ZMOD4410 indoor air quality sensor

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::device::I2cDevice;
use crate::error::Error;
use crate::regmap::reg;

/// Mode bit-field position in the shared status register
const MODE_SHIFT: u8 = 1;
const MODE_MASK: u8 = 7 << MODE_SHIFT;

/// Operating modes of the ZMOD4410
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndoorAirQualityMode {
    /// Sensor off, lowest power consumption
    PowerDown = 0,
    /// One-time thermal cleaning cycle of the MOx element. Takes about a
    /// minute and blocks on the device side; must run only once in the
    /// sensor's lifetime and must not be interrupted.
    Cleaning = 1,
    /// Indoor air quality measurement (default)
    IndoorAirQuality = 2,
    /// Lower-power indoor air quality measurement with reduced accuracy
    IndoorAirQualityLowPower = 3,
    /// Public Building Air Quality standard measurement (TVOC/EtOH)
    Pbaq = 4,
    /// Sulfur odor detection
    Sulfur = 5,
}

impl IndoorAirQualityMode {
    /// Decode the mode bit-field
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 7 {
            0 => Some(Self::PowerDown),
            1 => Some(Self::Cleaning),
            2 => Some(Self::IndoorAirQuality),
            3 => Some(Self::IndoorAirQualityLowPower),
            4 => Some(Self::Pbaq),
            5 => Some(Self::Sulfur),
            _ => None,
        }
    }

    /// Bit-field value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Interpretation of the indoor air quality index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndoorAirQualityLevel {
    VeryGood,
    Good,
    Medium,
    Poor,
    Bad,
}

impl IndoorAirQualityLevel {
    /// Classify an IAQ index (common range 0 to ~5)
    pub fn from_iaq(iaq: f32) -> Self {
        if iaq <= 1.99 {
            Self::VeryGood
        } else if iaq <= 2.99 {
            Self::Good
        } else if iaq <= 3.99 {
            Self::Medium
        } else if iaq <= 4.99 {
            Self::Poor
        } else {
            Self::Bad
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Medium => "Medium",
            Self::Poor => "Poor",
            Self::Bad => "Bad",
        }
    }
}

/// Indoor air quality sensor view
pub struct IndoorAirQualitySensor<'a, B, T> {
    dev: &'a mut I2cDevice<B, T>,
}

impl<'a, B, T> IndoorAirQualitySensor<'a, B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    pub(crate) fn new(dev: &'a mut I2cDevice<B, T>) -> Self {
        Self { dev }
    }

    /// Current operating mode
    pub fn mode(&mut self) -> Result<IndoorAirQualityMode, Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        IndoorAirQualityMode::from_bits(status >> MODE_SHIFT).ok_or(Error::UnknownMode)
    }

    /// Set the operating mode
    ///
    /// No-op (and success) when the sensor is already in the requested
    /// mode, so repeated calls cost neither bus traffic nor flash wear.
    /// With `persist` the mode is committed to flash, which also persists
    /// the other fields sharing the status register.
    pub fn set_mode(
        &mut self,
        mode: IndoorAirQualityMode,
        persist: bool,
    ) -> Result<(), Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        let bits = mode.bits() << MODE_SHIFT;
        if status & MODE_MASK == bits {
            return Ok(());
        }

        self.dev.write(reg::STATUS, (status & !MODE_MASK) | bits)?;

        if persist {
            self.dev.persist(reg::STATUS)?;
        }
        Ok(())
    }

    /// Whether the sensor is in any active mode
    pub fn enabled(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.mode()? != IndoorAirQualityMode::PowerDown)
    }

    /// Enable (indoor air quality mode) or disable (power down)
    ///
    /// No-op when the sensor is already in the requested enabled state;
    /// in particular, enabling an already-active sensor keeps its current
    /// mode.
    pub fn set_enabled(&mut self, enabled: bool, persist: bool) -> Result<(), Error<B::Error>> {
        if self.enabled()? == enabled {
            return Ok(());
        }
        let mode = if enabled {
            IndoorAirQualityMode::IndoorAirQuality
        } else {
            IndoorAirQualityMode::PowerDown
        };
        self.set_mode(mode, persist)
    }

    /// Indoor air quality index, common range 0 to ~5
    pub fn air_quality(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_IAQ)
    }

    /// Interpreted indoor air quality
    pub fn air_quality_interpreted(
        &mut self,
    ) -> Result<IndoorAirQualityLevel, Error<B::Error>> {
        Ok(IndoorAirQualityLevel::from_iaq(self.air_quality()?))
    }

    /// Relative air quality in percent (0 - 100)
    pub fn relative_air_quality(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_REL_IAQ)
    }

    /// Total volatile organic compounds in mg/m^3
    pub fn tvoc(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_TVOC)
    }

    /// CO2 equivalent in ppm
    pub fn co2(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_ECO2)
    }

    /// Ethanol equivalent in ppm
    pub fn ethanol(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_ETOH)
    }

    /// Odor intensity (sulfur mode)
    pub fn odor_intensity(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_INTENSITY)
    }

    /// Whether a sulfur odor is detected (sulfur mode)
    pub fn sulfur_odor(&mut self) -> Result<bool, Error<B::Error>> {
        let class: u8 = self.dev.read(reg::ZMOD4410_ODOR_CLASS)?;
        Ok(class != 0)
    }

    /// Number of samples taken since power-on
    pub fn sample_counter(&mut self) -> Result<u32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_SAMPLE_COUNTER)
    }

    /// Raw device status byte of the ZMOD4410
    pub fn device_status(&mut self) -> Result<u8, Error<B::Error>> {
        self.dev.read(reg::ZMOD4410_STATUS)
    }

    /// MOx resistances of the 13 measurement steps, in Ohm
    pub fn rmox(&mut self) -> Result<[f32; 13], Error<B::Error>> {
        let mut raw = [0u8; 52];
        self.dev.read_bytes(reg::ZMOD4410_RMOX, &mut raw)?;

        let mut rmox = [0.0f32; 13];
        for (value, chunk) in rmox.iter_mut().zip(raw.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(rmox)
    }
}
