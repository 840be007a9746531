//! Board facade
//!
//! [`NiclaSenseEnv`] owns the register-level device handle, exposes the
//! identity and configuration registers, and hands out the capability
//! views for the individual sensors and LEDs.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use heapless::String;
use senseenv_hal::{Clock, I2cBus};

use crate::device::{backoff_us, I2cDevice, DEFAULT_DEVICE_ADDRESS, MAX_POLL_ATTEMPTS};
use crate::error::Error;
use crate::led::{OrangeLed, RgbLed};
use crate::regmap::reg;
use crate::sensor::{
    IndoorAirQualitySensor, OutdoorAirQualitySensor, TemperatureHumiditySensor,
};

/// Control register bits
const DEBUG_BIT: u8 = 1;
const CSV_BIT: u8 = 1 << 1;
const FACTORY_RESET_BIT: u8 = 1 << 5;

/// Status register bits
const DEEP_SLEEP_BIT: u8 = 1 << 6;
const RESET_BIT: u8 = 1 << 7;

/// Settle delay after address-affecting writes, microseconds
const ADDRESS_SETTLE_US: u32 = 100;

/// UART baud rates supported by the board firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    /// Decode from the UART control register index (bits 0..=2)
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => BaudRate::B1200,
            1 => BaudRate::B2400,
            2 => BaudRate::B4800,
            3 => BaudRate::B9600,
            4 => BaudRate::B19200,
            5 => BaudRate::B38400,
            6 => BaudRate::B57600,
            _ => BaudRate::B115200,
        }
    }

    /// UART control register index
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Baud rate in bits per second
    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }

    /// Look up the enum value for a numeric rate
    pub fn from_bps(bps: u32) -> Option<Self> {
        match bps {
            1200 => Some(BaudRate::B1200),
            2400 => Some(BaudRate::B2400),
            4800 => Some(BaudRate::B4800),
            9600 => Some(BaudRate::B9600),
            19200 => Some(BaudRate::B19200),
            38400 => Some(BaudRate::B38400),
            57600 => Some(BaudRate::B57600),
            115200 => Some(BaudRate::B115200),
            _ => None,
        }
    }
}

/// Delimiters the board firmware rejects for CSV output
const PROHIBITED_DELIMITERS: [char; 5] = ['\r', '\n', '\\', '"', '\''];

/// The Nicla Sense Env board
///
/// Owns the device handle for the board's operational lifetime. The sensor
/// and LED accessors return short-lived views borrowing the handle; the
/// views are stateless, so constructing one is free and dropping the board
/// tears everything down.
pub struct NiclaSenseEnv<B, T> {
    dev: I2cDevice<B, T>,
}

impl<B, T> NiclaSenseEnv<B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    /// Board at the factory-default address 0x21
    pub fn new(bus: B, timer: T) -> Self {
        Self::with_address(bus, timer, DEFAULT_DEVICE_ADDRESS)
    }

    /// Board at a specific device address
    pub fn with_address(bus: B, timer: T, address: u8) -> Self {
        Self {
            dev: I2cDevice::with_address(bus, timer, address),
        }
    }

    /// Check whether the board acknowledges its address
    pub fn connected(&mut self) -> bool {
        self.dev.connected()
    }

    /// Perform bus setup and probe the board
    pub fn init(&mut self) -> Result<bool, Error<B::Error>> {
        self.dev.init()
    }

    /// Borrow the device handle
    pub fn device(&self) -> &I2cDevice<B, T> {
        &self.dev
    }

    /// Release the bus and timer
    pub fn release(self) -> (B, T) {
        self.dev.release()
    }

    /// Temperature/humidity sensor view
    pub fn temperature_humidity_sensor(&mut self) -> TemperatureHumiditySensor<'_, B, T> {
        TemperatureHumiditySensor::new(&mut self.dev)
    }

    /// Indoor air quality sensor view (ZMOD4410)
    pub fn indoor_air_quality_sensor(&mut self) -> IndoorAirQualitySensor<'_, B, T> {
        IndoorAirQualitySensor::new(&mut self.dev)
    }

    /// Outdoor air quality sensor view (ZMOD4510)
    pub fn outdoor_air_quality_sensor(&mut self) -> OutdoorAirQualitySensor<'_, B, T> {
        OutdoorAirQualitySensor::new(&mut self.dev)
    }

    /// RGB LED view
    pub fn rgb_led(&mut self) -> RgbLed<'_, B, T> {
        RgbLed::new(&mut self.dev)
    }

    /// Orange LED view
    pub fn orange_led(&mut self) -> OrangeLed<'_, B, T> {
        OrangeLed::new(&mut self.dev)
    }

    /// Raw 6-byte serial number
    pub fn serial_number(&mut self) -> Result<[u8; 6], Error<B::Error>> {
        let mut serial = [0u8; 6];
        self.dev.read_bytes(reg::SERIAL_NUMBER, &mut serial)?;
        Ok(serial)
    }

    /// Serial number as the decimal concatenation of its bytes
    pub fn serial_number_string(&mut self) -> Result<String<18>, Error<B::Error>> {
        let serial = self.serial_number()?;
        let mut out = String::new();
        for byte in serial {
            // 6 bytes of at most 3 digits always fit the capacity
            let _ = write!(out, "{}", byte);
        }
        Ok(out)
    }

    /// Numeric product identifier
    pub fn product_id(&mut self) -> Result<u8, Error<B::Error>> {
        self.dev.read(reg::PRODUCT_ID)
    }

    /// Firmware revision
    pub fn software_revision(&mut self) -> Result<u8, Error<B::Error>> {
        self.dev.read(reg::SW_REVISION)
    }

    /// Soft-reset the board
    ///
    /// Configuration not previously persisted to flash is lost.
    pub fn reset(&mut self) -> Result<(), Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        self.dev.write(reg::STATUS, status | RESET_BIT)
    }

    /// Put the board into deep sleep
    ///
    /// Only a hardware reset wakes it up again.
    pub fn deep_sleep(&mut self) -> Result<(), Error<B::Error>> {
        let status: u8 = self.dev.read(reg::STATUS)?;
        self.dev.write(reg::STATUS, status | DEEP_SLEEP_BIT)
    }

    /// Restore the factory settings
    ///
    /// Resets the configuration covered by [`store_settings_in_flash`],
    /// including the device address, which falls back to the default. The
    /// board performs the reset asynchronously; completion is polled with
    /// the same bounded backoff as the flash commit, and the restored
    /// defaults are then persisted.
    ///
    /// [`store_settings_in_flash`]: NiclaSenseEnv::store_settings_in_flash
    pub fn restore_factory_settings(&mut self) -> Result<(), Error<B::Error>> {
        let control: u8 = self.dev.read(reg::CONTROL)?;
        self.dev.write(reg::CONTROL, control | FACTORY_RESET_BIT)?;

        // The default address recovery needs a moment to take effect
        self.dev.delay_us(ADDRESS_SETTLE_US);
        self.set_device_address(DEFAULT_DEVICE_ADDRESS)?;

        for attempt in 0..MAX_POLL_ATTEMPTS {
            let control: u8 = self.dev.read(reg::CONTROL)?;
            if control & FACTORY_RESET_BIT == 0 {
                return self.store_settings_in_flash();
            }
            self.dev.delay_us(backoff_us(attempt));
        }
        Err(Error::RetriesExhausted)
    }

    /// Commit the current configuration to flash
    ///
    /// Covers the UART baud rate, CSV output enable, CSV delimiter, debug
    /// enable, device address, both gas-sensor modes, the temperature
    /// sensor enable and both LED settings. Set all desired values before
    /// calling; the commit is not an atomic whole-board snapshot.
    pub fn store_settings_in_flash(&mut self) -> Result<(), Error<B::Error>> {
        self.dev.persist(reg::CONTROL)
    }

    /// Current UART baud rate
    pub fn uart_baud_rate(&mut self) -> Result<BaudRate, Error<B::Error>> {
        let control: u8 = self.dev.read(reg::UART_CONTROL)?;
        Ok(BaudRate::from_bits(control))
    }

    /// Set the UART baud rate
    ///
    /// No-op when the register already holds the requested rate.
    pub fn set_uart_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Error<B::Error>> {
        let control: u8 = self.dev.read(reg::UART_CONTROL)?;
        if control & 7 == baud_rate.bits() {
            return Ok(());
        }
        self.dev.write(reg::UART_CONTROL, (control & !7) | baud_rate.bits())
    }

    /// Whether CSV output over UART is enabled
    pub fn uart_csv_output_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        let control: u8 = self.dev.read(reg::CONTROL)?;
        Ok(control & CSV_BIT != 0)
    }

    /// Enable or disable CSV output over UART
    pub fn set_uart_csv_output_enabled(&mut self, enabled: bool) -> Result<(), Error<B::Error>> {
        let control: u8 = self.dev.read(reg::CONTROL)?;
        if (control & CSV_BIT != 0) == enabled {
            return Ok(());
        }
        let bit = if enabled { CSV_BIT } else { 0 };
        self.dev.write(reg::CONTROL, (control & !CSV_BIT) | bit)
    }

    /// Current CSV delimiter character
    pub fn csv_delimiter(&mut self) -> Result<char, Error<B::Error>> {
        let delimiter: u8 = self.dev.read(reg::CSV_DELIMITER)?;
        Ok(delimiter as char)
    }

    /// Set the CSV delimiter
    ///
    /// The firmware accepts any ASCII character except `\r`, `\n`, `\\`,
    /// `"` and `'`; anything else is rejected without touching the device.
    pub fn set_csv_delimiter(&mut self, delimiter: char) -> Result<(), Error<B::Error>> {
        if !delimiter.is_ascii() || PROHIBITED_DELIMITERS.contains(&delimiter) {
            return Err(Error::InvalidDelimiter);
        }
        if self.csv_delimiter()? == delimiter {
            return Ok(());
        }
        self.dev.write(reg::CSV_DELIMITER, delimiter as u8)
    }

    /// Whether debug messages over UART are enabled
    pub fn debugging_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        let control: u8 = self.dev.read(reg::CONTROL)?;
        Ok(control & DEBUG_BIT != 0)
    }

    /// Enable or disable debug messages over UART
    pub fn set_debugging_enabled(&mut self, enabled: bool) -> Result<(), Error<B::Error>> {
        let control: u8 = self.dev.read(reg::CONTROL)?;
        if (control & DEBUG_BIT != 0) == enabled {
            return Ok(());
        }
        let bit = if enabled { DEBUG_BIT } else { 0 };
        self.dev.write(reg::CONTROL, (control & !DEBUG_BIT) | bit)
    }

    /// Change the board's I2C address
    ///
    /// Addresses above 127 are rejected before any bus traffic. After the
    /// register write the firmware needs a short settle delay, then the
    /// in-memory handle follows; re-acknowledgement at the new address is
    /// not verified here - probe with [`connected`](NiclaSenseEnv::connected).
    pub fn set_device_address(&mut self, address: u8) -> Result<(), Error<B::Error>> {
        if address > 127 {
            return Err(Error::InvalidAddress);
        }
        let current: u8 = self.dev.read(reg::SLAVE_ADDRESS)?;
        if current & 0x7F == address {
            return Ok(());
        }
        self.dev
            .write(reg::SLAVE_ADDRESS, (current & !0x7F) | address)?;
        self.dev.delay_us(ADDRESS_SETTLE_US);
        self.dev.set_address(address);
        Ok(())
    }
}
