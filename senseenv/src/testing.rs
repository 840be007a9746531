//! Simulated bus and timer for host-run tests
//!
//! `SimBus` models the board as a 256-byte register file behind the
//! transactional bus contract, with counters for the transaction-level
//! assertions in the driver tests and a scripted flash-commit completion.

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use senseenv_hal::{Clock, I2cBus};

use crate::device::DEFAULT_DEVICE_ADDRESS;
use crate::regmap::reg;

/// Bus error of the simulator (the device did not acknowledge)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Nack;

/// Register-file simulation of the board
pub(crate) struct SimBus {
    /// Backing register file
    pub regs: [u8; 256],
    /// Address the simulated device acknowledges
    pub ack_address: u8,
    /// Drop all requested bytes (forces the availability poll to time out)
    pub swallow_reads: bool,
    /// Scripted flash commit: number of completion polls that still observe
    /// bit 7 set before the device clears it. `None` means it never clears.
    /// Only registers named via [`script_persist`](SimBus::script_persist)
    /// take part; bit 7 is plain data everywhere else (LED error status,
    /// large intensity values).
    pub persist_polls_before_clear: Option<usize>,
    /// Scripted factory reset: number of polls of the control register that
    /// still observe bit 5 set before the device clears it. `None` (the
    /// default) leaves bit 5 alone.
    pub factory_reset_polls_before_clear: Option<usize>,

    /// Transactions opened (`begin_transmission` calls)
    pub transactions: usize,
    /// Completed register data writes
    pub register_writes: usize,
    /// Read requests issued (`request_from` calls)
    pub reads: usize,
    /// Bus setup calls
    pub inits: usize,

    tx_target: u8,
    tx_buf: [u8; 64],
    tx_len: usize,
    pointer: u8,
    rx_buf: [u8; 64],
    rx_len: usize,
    rx_pos: usize,
    persist_regs: Vec<u8, 4>,
    persist_armed: Option<u8>,
    persist_polls_seen: usize,
    factory_armed: bool,
    factory_polls_seen: usize,
}

impl SimBus {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            ack_address: DEFAULT_DEVICE_ADDRESS,
            swallow_reads: false,
            persist_polls_before_clear: Some(0),
            factory_reset_polls_before_clear: None,
            transactions: 0,
            register_writes: 0,
            reads: 0,
            inits: 0,
            tx_target: 0,
            tx_buf: [0; 64],
            tx_len: 0,
            pointer: 0,
            rx_buf: [0; 64],
            rx_len: 0,
            rx_pos: 0,
            persist_regs: Vec::new(),
            persist_armed: None,
            persist_polls_seen: 0,
            factory_armed: false,
            factory_polls_seen: 0,
        }
    }

    /// Mark a register as persistable: a write to it with bit 7 set arms
    /// the scripted flash-commit completion
    pub fn script_persist(&mut self, register: u8) {
        let _ = self.persist_regs.push(register);
    }

    fn acks(&self, address: u8) -> bool {
        address == self.ack_address
    }
}

impl I2cBus for SimBus {
    type Error = Nack;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.inits += 1;
        Ok(())
    }

    fn begin_transmission(&mut self, address: u8) {
        self.transactions += 1;
        self.tx_target = address;
        self.tx_len = 0;
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx_buf[self.tx_len..self.tx_len + data.len()].copy_from_slice(data);
        self.tx_len += data.len();
        Ok(())
    }

    fn end_transmission(&mut self, release_bus: bool) -> Result<(), Self::Error> {
        if !self.acks(self.tx_target) {
            return Err(Nack);
        }

        if self.tx_len >= 1 {
            self.pointer = self.tx_buf[0];
        }
        if release_bus && self.tx_len >= 2 {
            // Register data write
            let base = self.tx_buf[0] as usize;
            let payload = &self.tx_buf[1..self.tx_len];
            self.regs[base..base + payload.len()].copy_from_slice(payload);
            self.register_writes += 1;

            // A write with bit 7 set to a scripted persistable register
            // arms the flash-commit completion for that register; bit 7
            // written anywhere else stays plain register data
            if payload.len() == 1
                && payload[0] & 0x80 != 0
                && self.persist_regs.contains(&self.tx_buf[0])
            {
                self.persist_armed = Some(self.tx_buf[0]);
                self.persist_polls_seen = 0;
            }

            // A control-register write with bit 5 set arms the scripted
            // factory-reset completion
            if payload.len() == 1
                && payload[0] & (1 << 5) != 0
                && self.tx_buf[0] == reg::CONTROL.address
                && self.factory_reset_polls_before_clear.is_some()
            {
                self.factory_armed = true;
                self.factory_polls_seen = 0;
            }
        }
        Ok(())
    }

    fn request_from(&mut self, address: u8, count: usize) -> Result<usize, Self::Error> {
        if !self.acks(address) {
            return Err(Nack);
        }
        self.reads += 1;

        if self.swallow_reads {
            self.rx_len = 0;
            self.rx_pos = 0;
            return Ok(0);
        }

        // Scripted flash-commit completion
        if self.persist_armed == Some(self.pointer) {
            match self.persist_polls_before_clear {
                Some(k) if self.persist_polls_seen >= k => {
                    self.regs[self.pointer as usize] &= !0x80;
                    self.persist_armed = None;
                }
                _ => self.persist_polls_seen += 1,
            }
        }

        // Scripted factory-reset completion
        if self.factory_armed && self.pointer == reg::CONTROL.address {
            match self.factory_reset_polls_before_clear {
                Some(k) if self.factory_polls_seen >= k => {
                    self.regs[reg::CONTROL.address as usize] &= !(1 << 5);
                    self.factory_armed = false;
                }
                _ => self.factory_polls_seen += 1,
            }
        }

        let base = self.pointer as usize;
        self.rx_buf[..count].copy_from_slice(&self.regs[base..base + count]);
        self.rx_len = count;
        self.rx_pos = 0;
        Ok(count)
    }

    fn available(&self) -> usize {
        self.rx_len - self.rx_pos
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.rx_pos < self.rx_len {
            let byte = self.rx_buf[self.rx_pos];
            self.rx_pos += 1;
            Some(byte)
        } else {
            None
        }
    }
}

/// Timer whose clock advances on every observation
///
/// Each `now_ms` call moves time forward, so busy polls that never see data
/// run out of their window after a handful of iterations.
pub(crate) struct SimTimer {
    now: Cell<u64>,
    /// Milliseconds added per `now_ms` call
    pub step_ms: u64,
    /// Total time slept through `DelayNs`
    pub slept_us: u64,
}

impl SimTimer {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            step_ms: 100,
            slept_us: 0,
        }
    }
}

impl Clock for SimTimer {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step_ms);
        now
    }
}

impl DelayNs for SimTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.slept_us += u64::from(ns) / 1_000;
    }
}
