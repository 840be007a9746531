//! LED capability views
//!
//! The RGB LED and the orange LED are plain register groups; like the
//! sensors, the views here are stateless borrows of the device handle.

pub mod orange;
pub mod rgb;

pub use orange::OrangeLed;
pub use rgb::{Color, RgbLed};
