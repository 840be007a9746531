//! Transactional register access and the flash persistence handshake
//!
//! [`I2cDevice`] owns the bus handle and the current device address and is
//! the single point through which every register transaction flows. The
//! capability views in [`crate::sensor`] and [`crate::led`] borrow it; they
//! carry no state of their own.

use embedded_hal::delay::DelayNs;
use senseenv_hal::{Clock, I2cBus};

use crate::error::Error;
use crate::regmap::{Register, RegisterValue};

/// Factory-default I2C address of the board
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x21;

/// Wall-clock ceiling on the read-availability poll
pub const READ_TIMEOUT_MS: u64 = 1000;

/// Retry budget of the persistence/completion polls
pub const MAX_POLL_ATTEMPTS: u32 = 10;

/// Flash-commit request/completion flag, valid on any persistable register
const PERSIST_BIT: u8 = 1 << 7;

/// Register-level handle to the board
///
/// Generic over the bus transport `B` and a timer `T` providing both the
/// monotonic clock (for the availability poll) and delays (for backoff
/// sleeps). All operations block the calling thread; the handle assumes a
/// single logical owner issuing transactions serially.
pub struct I2cDevice<B, T> {
    bus: B,
    timer: T,
    address: u8,
}

impl<B, T> I2cDevice<B, T>
where
    B: I2cBus,
    T: Clock + DelayNs,
{
    /// Create a handle at the factory-default address
    pub fn new(bus: B, timer: T) -> Self {
        Self::with_address(bus, timer, DEFAULT_DEVICE_ADDRESS)
    }

    /// Create a handle at a specific device address
    pub fn with_address(bus: B, timer: T, address: u8) -> Self {
        Self {
            bus,
            timer,
            address,
        }
    }

    /// Current 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the bus and timer
    pub fn release(self) -> (B, T) {
        (self.bus, self.timer)
    }

    /// Check whether the device acknowledges its address
    ///
    /// A zero-length transaction; a presence probe, not a protocol read.
    pub fn connected(&mut self) -> bool {
        self.bus.begin_transmission(self.address);
        self.bus.end_transmission(true).is_ok()
    }

    /// Perform bus setup and probe the device
    ///
    /// Safe to call more than once; bus init is idempotent.
    pub fn init(&mut self) -> Result<bool, Error<B::Error>> {
        self.bus.init()?;
        Ok(self.connected())
    }

    /// Read a scalar register
    pub fn read<V: RegisterValue>(&mut self, register: Register) -> Result<V, Error<B::Error>> {
        if register.len != V::WIDTH {
            return Err(Error::LengthMismatch);
        }

        self.request(register)?;

        let mut buf = [0u8; 4];
        let bytes = &mut buf[..register.len];
        for slot in bytes.iter_mut() {
            *slot = self.bus.read_byte().ok_or(Error::ReadTimeout)?;
        }
        Ok(V::decode_le(bytes))
    }

    /// Read a fixed-length byte-array register
    ///
    /// `buf` must match the register width exactly. If the device delivers
    /// fewer bytes than requested, the tail of `buf` is left untouched.
    pub fn read_bytes(
        &mut self,
        register: Register,
        buf: &mut [u8],
    ) -> Result<(), Error<B::Error>> {
        if buf.len() != register.len {
            return Err(Error::LengthMismatch);
        }

        self.request(register)?;

        for slot in buf.iter_mut() {
            match self.bus.read_byte() {
                Some(byte) => *slot = byte,
                None => break,
            }
        }
        Ok(())
    }

    /// Write a scalar register
    ///
    /// Success means the device acknowledged every byte. No read-modify-
    /// write atomicity is provided; bit-field updates are read, mask and
    /// write as separate calls.
    pub fn write<V: RegisterValue>(
        &mut self,
        register: Register,
        value: V,
    ) -> Result<(), Error<B::Error>> {
        if register.len != V::WIDTH {
            return Err(Error::LengthMismatch);
        }

        let mut buf = [0u8; 4];
        value.encode_le(&mut buf[..register.len]);

        self.bus.begin_transmission(self.address);
        self.bus.write(&[register.address])?;
        self.bus.write(&buf[..register.len])?;
        self.bus.end_transmission(true)?;
        Ok(())
    }

    /// Commit a register's current value to flash
    ///
    /// Sets bit 7 of the register to request the commit, then polls the
    /// same register until the hardware clears the bit. Flash writes are
    /// asynchronous on the device; the poll backs off exponentially to
    /// avoid hammering the bus and gives up after [`MAX_POLL_ATTEMPTS`].
    pub fn persist(&mut self, register: Register) -> Result<(), Error<B::Error>> {
        let cell = register.first_byte();
        let current: u8 = self.read(cell)?;
        self.write(cell, current | PERSIST_BIT)?;

        for attempt in 0..MAX_POLL_ATTEMPTS {
            let value: u8 = self.read(cell)?;
            if value & PERSIST_BIT == 0 {
                return Ok(());
            }
            self.timer.delay_us(backoff_us(attempt));
        }
        Err(Error::RetriesExhausted)
    }

    /// Update the in-memory device address
    ///
    /// Used by the address-change protocol after the hardware has been
    /// reconfigured; does not touch the bus.
    pub(crate) fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Sleep helper for settle delays and backoff
    pub(crate) fn delay_us(&mut self, us: u32) {
        self.timer.delay_us(us);
    }

    /// Address a register and wait for response bytes
    ///
    /// Repeated-start write of the register address followed by the read
    /// request. The availability wait is a busy poll; the call is expected
    /// to be fast and the timeout only bounds pathological hangs.
    fn request(&mut self, register: Register) -> Result<(), Error<B::Error>> {
        self.bus.begin_transmission(self.address);
        self.bus.write(&[register.address])?;
        self.bus.end_transmission(false)?;

        self.bus.request_from(self.address, register.len)?;

        let start = self.timer.now_ms();
        while self.bus.available() == 0 {
            if self.timer.now_ms().wrapping_sub(start) >= READ_TIMEOUT_MS {
                return Err(Error::ReadTimeout);
            }
        }
        Ok(())
    }
}

/// Backoff delay before poll attempt `attempt + 1`
///
/// Starts at 200 us and doubles each iteration; ~102 ms at the 10th
/// attempt, so the whole budget stays sub-second.
pub(crate) fn backoff_us(attempt: u32) -> u32 {
    100 * (2 << attempt)
}
