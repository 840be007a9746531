//! I2C bus abstractions
//!
//! Provides a transactional I2C master trait that can be implemented by
//! platform-specific buses. The SenseEnv board speaks a write-then-read
//! register protocol, so the trait is shaped around explicit transactions
//! with repeated-start support rather than one-shot transfers.

/// Transactional I2C bus master
///
/// A register access is composed of discrete steps: open a write
/// transaction, queue payload bytes, close the transaction (optionally
/// keeping the bus for a repeated start), then request and drain the
/// response bytes.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Perform bus-level setup
    ///
    /// Must be idempotent; the driver may call it more than once.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Open a write transaction addressed to a device
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    fn begin_transmission(&mut self, address: u8);

    /// Queue payload bytes for the open transaction
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Close the open transaction
    ///
    /// With `release_bus = false` the bus is held for a repeated-start
    /// read; with `true` a stop condition is generated. An error means the
    /// device did not acknowledge every byte.
    fn end_transmission(&mut self, release_bus: bool) -> Result<(), Self::Error>;

    /// Request bytes from a device
    ///
    /// Returns the number of bytes the bus was able to clock in.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `count` - Number of bytes to request
    fn request_from(&mut self, address: u8, count: usize) -> Result<usize, Self::Error>;

    /// Number of received bytes waiting to be read
    fn available(&self) -> usize;

    /// Pop one received byte, if any
    fn read_byte(&mut self) -> Option<u8>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}
