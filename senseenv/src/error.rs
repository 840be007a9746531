//! Driver error taxonomy
//!
//! Every fallible operation reports through [`Error`]; nothing in this
//! crate panics on device-absent or timed-out conditions.

/// Errors reported by the SenseEnv driver
///
/// `E` is the bus implementation's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported a failed transaction (NACK, arbitration loss, ...)
    Bus(E),
    /// No response bytes became available within the read timeout window
    ReadTimeout,
    /// A bounded retry loop (flash persist, factory reset) was exhausted
    /// without the hardware signalling completion
    RetriesExhausted,
    /// Register width and value/buffer width disagree
    LengthMismatch,
    /// Device address outside the 7-bit range 0..=127
    InvalidAddress,
    /// CSV delimiter character the board firmware does not accept
    InvalidDelimiter,
    /// A mode bit-field read back with a reserved bit pattern
    UnknownMode,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Bus(err)
    }
}
