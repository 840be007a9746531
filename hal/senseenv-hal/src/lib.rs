//! SenseEnv Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the SenseEnv driver
//! is written against. Implementing them for a concrete platform (a Linux
//! I2C character device, an embedded-hal bus wrapper, a simulator) is all
//! that is needed to run the driver there.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  senseenv (register-level driver)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  senseenv-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Platform bus implementation            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Transactional I2C master operations
//! - [`time::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use i2c::I2cBus;
pub use time::Clock;
