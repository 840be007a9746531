//! Device register map and register value marshalling
//!
//! The board exposes every facility through fixed-width registers at fixed
//! addresses. All addresses and widths here are bit-exact to the board
//! firmware; changing them breaks wire compatibility.

/// Static description of one device register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    /// Register address
    pub address: u8,
    /// Width in bytes
    pub len: usize,
}

impl Register {
    /// Create a register descriptor
    pub const fn new(address: u8, len: usize) -> Self {
        Self { address, len }
    }

    /// View of the first byte of this register
    ///
    /// The persist and completion flags always live in the leading byte.
    pub const fn first_byte(self) -> Self {
        Self {
            address: self.address,
            len: 1,
        }
    }
}

/// Fixed-width scalar that can be marshalled to/from register bytes
///
/// The device transmits multi-byte values little-endian.
pub trait RegisterValue: Copy {
    /// Exact wire size in bytes
    const WIDTH: usize;

    /// Decode from little-endian register bytes
    ///
    /// `bytes` is exactly `WIDTH` long. Named apart from the primitives'
    /// inherent `from_le` so calls on concrete types resolve here.
    fn decode_le(bytes: &[u8]) -> Self;

    /// Encode into little-endian register bytes
    ///
    /// `out` is exactly `WIDTH` long.
    fn encode_le(self, out: &mut [u8]);
}

impl RegisterValue for u8 {
    const WIDTH: usize = 1;

    fn decode_le(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn encode_le(self, out: &mut [u8]) {
        out[0] = self;
    }
}

impl RegisterValue for u16 {
    const WIDTH: usize = 2;

    fn decode_le(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    fn encode_le(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }
}

impl RegisterValue for u32 {
    const WIDTH: usize = 4;

    fn decode_le(bytes: &[u8]) -> Self {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn encode_le(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }
}

impl RegisterValue for f32 {
    const WIDTH: usize = 4;

    fn decode_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn encode_le(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }
}

/// Register addresses and widths of the Nicla Sense Env firmware
pub mod reg {
    use super::Register;

    /// Sensor status/control: temperature enable (bit 0), ZMOD4410 mode
    /// (bits 1..=3), ZMOD4510 mode (bits 4..=5), deep sleep (bit 6),
    /// soft reset (bit 7)
    pub const STATUS: Register = Register::new(0x00, 1);
    /// I2C slave address (bits 0..=6)
    pub const SLAVE_ADDRESS: Register = Register::new(0x01, 1);
    /// Board control: debug UART output (bit 0), CSV output (bit 1),
    /// factory reset (bit 5), persist settings to flash (bit 7)
    pub const CONTROL: Register = Register::new(0x02, 1);
    /// Orange LED: brightness (bits 0..=5), sensor error indicator (bit 7)
    pub const ORANGE_LED: Register = Register::new(0x03, 1);
    /// RGB LED red channel
    pub const RGB_RED: Register = Register::new(0x04, 1);
    /// RGB LED green channel
    pub const RGB_GREEN: Register = Register::new(0x05, 1);
    /// RGB LED blue channel
    pub const RGB_BLUE: Register = Register::new(0x06, 1);
    /// RGB LED intensity
    pub const RGB_INTENSITY: Register = Register::new(0x07, 1);
    /// UART control: baud rate index (bits 0..=2)
    pub const UART_CONTROL: Register = Register::new(0x08, 1);
    /// CSV delimiter character (ASCII code)
    pub const CSV_DELIMITER: Register = Register::new(0x09, 1);
    /// Firmware revision
    pub const SW_REVISION: Register = Register::new(0x0C, 1);
    /// Product identifier
    pub const PRODUCT_ID: Register = Register::new(0x0D, 1);
    /// Serial number, 6 bytes
    pub const SERIAL_NUMBER: Register = Register::new(0x0E, 6);

    /// HS4001 sample counter
    pub const HS4001_SAMPLE_COUNTER: Register = Register::new(0x14, 4);
    /// HS4001 temperature, degrees Celsius
    pub const TEMPERATURE: Register = Register::new(0x18, 4);
    /// HS4001 relative humidity, percent
    pub const HUMIDITY: Register = Register::new(0x1C, 4);

    /// ZMOD4510 device status
    pub const ZMOD4510_STATUS: Register = Register::new(0x23, 1);
    /// ZMOD4510 sample counter
    pub const ZMOD4510_SAMPLE_COUNTER: Register = Register::new(0x24, 4);
    /// ZMOD4510 EPA air quality index (0..=500)
    pub const ZMOD4510_EPA_AQI: Register = Register::new(0x28, 2);
    /// ZMOD4510 fast-settling air quality index
    pub const ZMOD4510_FAST_AQI: Register = Register::new(0x2A, 2);
    /// ZMOD4510 ozone, ppb
    pub const ZMOD4510_O3: Register = Register::new(0x2C, 4);
    /// ZMOD4510 nitrogen dioxide, ppb
    pub const ZMOD4510_NO2: Register = Register::new(0x30, 4);
    /// ZMOD4510 MOx resistances, 13 floats
    pub const ZMOD4510_RMOX: Register = Register::new(0x34, 4 * 13);

    /// ZMOD4410 device status
    pub const ZMOD4410_STATUS: Register = Register::new(0x6B, 1);
    /// ZMOD4410 sample counter
    pub const ZMOD4410_SAMPLE_COUNTER: Register = Register::new(0x6C, 4);
    /// ZMOD4410 indoor air quality index (~0..=5)
    pub const ZMOD4410_IAQ: Register = Register::new(0x70, 4);
    /// ZMOD4410 total volatile organic compounds, mg/m^3
    pub const ZMOD4410_TVOC: Register = Register::new(0x74, 4);
    /// ZMOD4410 CO2 equivalent, ppm
    pub const ZMOD4410_ECO2: Register = Register::new(0x78, 4);
    /// ZMOD4410 relative air quality, percent
    pub const ZMOD4410_REL_IAQ: Register = Register::new(0x7C, 4);
    /// ZMOD4410 ethanol equivalent, ppm
    pub const ZMOD4410_ETOH: Register = Register::new(0x80, 4);
    /// ZMOD4410 MOx resistances, 13 floats
    pub const ZMOD4410_RMOX: Register = Register::new(0x84, 4 * 13);
    /// ZMOD4410 clean dry air resistances, 3 floats
    pub const ZMOD4410_RCDA: Register = Register::new(0xB8, 4 * 3);
    /// ZMOD4410 heater resistance
    pub const ZMOD4410_RHTR: Register = Register::new(0xC4, 4);
    /// ZMOD4410 die temperature, degrees Celsius
    pub const ZMOD4410_TEMP: Register = Register::new(0xC8, 4);
    /// ZMOD4410 odor intensity
    pub const ZMOD4410_INTENSITY: Register = Register::new(0xCC, 4);
    /// ZMOD4410 sulfur odor classification (0 = acceptable, 1 = sulfur)
    pub const ZMOD4410_ODOR_CLASS: Register = Register::new(0xD0, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let mut buf = [0u8; 4];

        0xA5u8.encode_le(&mut buf[..1]);
        assert_eq!(u8::decode_le(&buf[..1]), 0xA5);

        0x1234u16.encode_le(&mut buf[..2]);
        assert_eq!(buf[..2], [0x34, 0x12]);
        assert_eq!(u16::decode_le(&buf[..2]), 0x1234);

        0xDEAD_BEEFu32.encode_le(&mut buf);
        assert_eq!(u32::decode_le(&buf), 0xDEAD_BEEF);

        (-300.0f32).encode_le(&mut buf);
        assert_eq!(buf, [0x00, 0x00, 0x96, 0xC3]);
        assert_eq!(f32::decode_le(&buf), -300.0);
    }

    #[test]
    fn widths_match_wire_types() {
        assert_eq!(reg::STATUS.len, u8::WIDTH);
        assert_eq!(reg::ZMOD4510_EPA_AQI.len, u16::WIDTH);
        assert_eq!(reg::HS4001_SAMPLE_COUNTER.len, u32::WIDTH);
        assert_eq!(reg::TEMPERATURE.len, f32::WIDTH);
        assert_eq!(reg::SERIAL_NUMBER.len, 6);
        assert_eq!(reg::ZMOD4410_RMOX.len, 52);
    }

    #[test]
    fn first_byte_view() {
        let cell = reg::ZMOD4510_EPA_AQI.first_byte();
        assert_eq!(cell.address, 0x28);
        assert_eq!(cell.len, 1);
    }
}
