//! On-board RGB LED

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::device::I2cDevice;
use crate::error::Error;
use crate::regmap::reg;

/// RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// All channels off; with a non-zero brightness the firmware shows
    /// the indoor air quality status instead
    pub const OFF: Self = Self::new(0, 0, 0);
}

/// RGB LED view
pub struct RgbLed<'a, B, T> {
    dev: &'a mut I2cDevice<B, T>,
}

impl<'a, B, T> RgbLed<'a, B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    pub(crate) fn new(dev: &'a mut I2cDevice<B, T>) -> Self {
        Self { dev }
    }

    /// Current color
    pub fn color(&mut self) -> Result<Color, Error<B::Error>> {
        Ok(Color {
            red: self.dev.read(reg::RGB_RED)?,
            green: self.dev.read(reg::RGB_GREEN)?,
            blue: self.dev.read(reg::RGB_BLUE)?,
        })
    }

    /// Set the color
    ///
    /// Each channel is its own register, so a persist request commits all
    /// three individually.
    pub fn set_color(&mut self, color: Color, persist: bool) -> Result<(), Error<B::Error>> {
        self.dev.write(reg::RGB_RED, color.red)?;
        self.dev.write(reg::RGB_GREEN, color.green)?;
        self.dev.write(reg::RGB_BLUE, color.blue)?;

        if persist {
            self.dev.persist(reg::RGB_RED)?;
            self.dev.persist(reg::RGB_GREEN)?;
            self.dev.persist(reg::RGB_BLUE)?;
        }
        Ok(())
    }

    /// Current brightness (0..=255)
    pub fn brightness(&mut self) -> Result<u8, Error<B::Error>> {
        self.dev.read(reg::RGB_INTENSITY)
    }

    /// Set the brightness (0..=255)
    pub fn set_brightness(&mut self, brightness: u8, persist: bool) -> Result<(), Error<B::Error>> {
        self.dev.write(reg::RGB_INTENSITY, brightness)?;

        if persist {
            self.dev.persist(reg::RGB_INTENSITY)?;
        }
        Ok(())
    }

    /// Hand the LED over to the firmware's indoor air quality indication
    ///
    /// Color (0, 0, 0) tells the firmware to drive the LED from the
    /// ZMOD4410 readings at the given brightness.
    pub fn enable_indoor_air_quality_status(
        &mut self,
        brightness: u8,
        persist: bool,
    ) -> Result<(), Error<B::Error>> {
        self.set_color(Color::OFF, persist)?;
        self.set_brightness(brightness, persist)
    }
}
