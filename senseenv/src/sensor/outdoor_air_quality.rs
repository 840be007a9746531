//! ZMOD4510 outdoor air quality sensor

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::device::I2cDevice;
use crate::error::Error;
use crate::regmap::reg;

/// Mode bit-field position in the shared status register
const MODE_SHIFT: u8 = 4;
const MODE_MASK: u8 = 3 << MODE_SHIFT;

/// Operating modes of the ZMOD4510
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutdoorAirQualityMode {
    /// Sensor off, lowest power consumption
    PowerDown = 0,
    /// One-time thermal cleaning cycle of the MOx element
    Cleaning = 1,
    /// Outdoor air quality measurement (default)
    OutdoorAirQuality = 2,
}

impl OutdoorAirQualityMode {
    /// Decode the mode bit-field
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 3 {
            0 => Some(Self::PowerDown),
            1 => Some(Self::Cleaning),
            2 => Some(Self::OutdoorAirQuality),
            _ => None,
        }
    }

    /// Bit-field value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// EPA interpretation of the air quality index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutdoorAirQualityLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl OutdoorAirQualityLevel {
    /// Classify an EPA AQI value (0..=500)
    pub const fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

/// Outdoor air quality sensor view
pub struct OutdoorAirQualitySensor<'a, B, T> {
    dev: &'a mut I2cDevice<B, T>,
}

impl<'a, B, T> OutdoorAirQualitySensor<'a, B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    pub(crate) fn new(dev: &'a mut I2cDevice<B, T>) -> Self {
        Self { dev }
    }

    /// Current operating mode
    pub fn mode(&mut self) -> Result<OutdoorAirQualityMode, Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        OutdoorAirQualityMode::from_bits(status >> MODE_SHIFT).ok_or(Error::UnknownMode)
    }

    /// Set the operating mode
    ///
    /// No-op (and success) when the sensor is already in the requested
    /// mode. With `persist` the mode is committed to flash, which also
    /// persists the other fields sharing the status register.
    pub fn set_mode(
        &mut self,
        mode: OutdoorAirQualityMode,
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
        Ok(self.mode()? != OutdoorAirQualityMode::PowerDown)
    }

    /// Enable (outdoor air quality mode) or disable (power down)
    ///
    /// No-op when the sensor is already in the requested enabled state.
    pub fn set_enabled(&mut self, enabled: bool, persist: bool) -> Result<(), Error<B::Error>> {
        if self.enabled()? == enabled {
            return Ok(());
        }
        let mode = if enabled {
            OutdoorAirQualityMode::OutdoorAirQuality
        } else {
            OutdoorAirQualityMode::PowerDown
        };
        self.set_mode(mode, persist)
    }

    /// EPA air quality index, 0..=500
    pub fn air_quality_index(&mut self) -> Result<u16, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_EPA_AQI)
    }

    /// Interpreted EPA air quality index
    pub fn air_quality_index_interpreted(
        &mut self,
    ) -> Result<OutdoorAirQualityLevel, Error<B::Error>> {
        Ok(OutdoorAirQualityLevel::from_aqi(self.air_quality_index()?))
    }

    /// Fast-settling air quality index
    ///
    /// Settles within the first minute after power-on instead of the
    /// hour-scale EPA average.
    pub fn fast_air_quality_index(&mut self) -> Result<u16, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_FAST_AQI)
    }

    /// Ozone concentration in ppb
    pub fn o3(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_O3)
    }

    /// Nitrogen dioxide concentration in ppb
    pub fn no2(&mut self) -> Result<f32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_NO2)
    }

    /// Number of samples taken since power-on
    pub fn sample_counter(&mut self) -> Result<u32, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_SAMPLE_COUNTER)
    }

    /// Raw device status byte of the ZMOD4510
    pub fn device_status(&mut self) -> Result<u8, Error<B::Error>> {
        self.dev.read(reg::ZMOD4510_STATUS)
    }

    /// MOx resistances of the 13 measurement steps, in Ohm
    pub fn rmox(&mut self) -> Result<[f32; 13], Error<B::Error>> {
        let mut raw = [0u8; 52];
        self.dev.read_bytes(reg::ZMOD4510_RMOX, &mut raw)?;

        let mut rmox = [0.0f32; 13];
        for (value, chunk) in rmox.iter_mut().zip(raw.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(rmox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SimBus, SimTimer};

    fn device(bus: SimBus) -> I2cDevice<SimBus, SimTimer> {
        I2cDevice::new(bus, SimTimer::new())
    }

    #[test]
    fn mode_lives_in_bits_four_and_five() {
        let mut bus = SimBus::new();
        bus.regs[0x00] = 0b0000_1111; // temperature + indoor fields populated
        let mut dev = device(bus);
        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);

        assert_eq!(sensor.mode().unwrap(), OutdoorAirQualityMode::PowerDown);
        sensor
            .set_mode(OutdoorAirQualityMode::OutdoorAirQuality, false)
            .unwrap();
        assert_eq!(dev.bus().regs[0x00], 0b0010_1111);
    }

    #[test]
    fn setting_the_current_mode_writes_nothing() {
        let mut bus = SimBus::new();
        bus.regs[0x00] = OutdoorAirQualityMode::Cleaning.bits() << MODE_SHIFT;
        let mut dev = device(bus);
        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);

        sensor
            .set_mode(OutdoorAirQualityMode::Cleaning, false)
            .unwrap();
        assert_eq!(dev.bus().register_writes, 0);
    }

    #[test]
    fn reserved_mode_bits_are_reported() {
        let mut bus = SimBus::new();
        bus.regs[0x00] = 3 << MODE_SHIFT;
        let mut dev = device(bus);
        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);

        assert_eq!(sensor.mode().unwrap_err(), Error::UnknownMode);
    }

    #[test]
    fn aqi_reads_as_u16_with_interpretation() {
        let mut bus = SimBus::new();
        bus.regs[0x28..0x2A].copy_from_slice(&175u16.to_le_bytes());
        bus.regs[0x2A..0x2C].copy_from_slice(&42u16.to_le_bytes());
        let mut dev = device(bus);
        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);

        assert_eq!(sensor.air_quality_index().unwrap(), 175);
        assert_eq!(
            sensor.air_quality_index_interpreted().unwrap(),
            OutdoorAirQualityLevel::Unhealthy
        );
        assert_eq!(sensor.fast_air_quality_index().unwrap(), 42);
    }

    #[test]
    fn aqi_classification_thresholds() {
        assert_eq!(
            OutdoorAirQualityLevel::from_aqi(50),
            OutdoorAirQualityLevel::Good
        );
        assert_eq!(
            OutdoorAirQualityLevel::from_aqi(51),
            OutdoorAirQualityLevel::Moderate
        );
        assert_eq!(
            OutdoorAirQualityLevel::from_aqi(150),
            OutdoorAirQualityLevel::UnhealthyForSensitiveGroups
        );
        assert_eq!(
            OutdoorAirQualityLevel::from_aqi(300),
            OutdoorAirQualityLevel::VeryUnhealthy
        );
        assert_eq!(
            OutdoorAirQualityLevel::from_aqi(301),
            OutdoorAirQualityLevel::Hazardous
        );
        assert_eq!(
            OutdoorAirQualityLevel::UnhealthyForSensitiveGroups.as_str(),
            "Unhealthy for Sensitive Groups"
        );
    }

    #[test]
    fn gas_readings_decode_as_floats() {
        let mut bus = SimBus::new();
        bus.regs[0x2C..0x30].copy_from_slice(&31.5f32.to_le_bytes());
        bus.regs[0x30..0x34].copy_from_slice(&12.25f32.to_le_bytes());
        let mut dev = device(bus);
        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);

        assert_eq!(sensor.o3().unwrap(), 31.5);
        assert_eq!(sensor.no2().unwrap(), 12.25);
    }

    #[test]
    fn disable_then_disable_again_is_idempotent() {
        let mut bus = SimBus::new();
        bus.regs[0x00] = OutdoorAirQualityMode::OutdoorAirQuality.bits() << MODE_SHIFT;
        let mut dev = device(bus);

        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);
        sensor.set_enabled(false, false).unwrap();
        assert_eq!(dev.bus().register_writes, 1);

        let mut sensor = OutdoorAirQualitySensor::new(&mut dev);
        sensor.set_enabled(false, false).unwrap();
        assert_eq!(dev.bus().register_writes, 1);
    }
}
