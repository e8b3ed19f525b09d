//! up5k_riscv Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that the display core,
//! the drivers and the firmware are written against. The memory-mapped
//! implementations for the SoC live in `up5k-hal-soc`; tests substitute
//! recording fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  up5k-display / up5k-drivers / firmware │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  up5k-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ up5k-hal-soc  │       │  test fakes   │
//! │ (MMIO)        │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (bit-banged control lines)
//! - [`spi::SpiTransport`] - Byte-oriented SPI master with explicit chip-select
//! - [`i2c::I2cBus`] - I2C master writes
//! - [`uart::UartTx`], [`uart::UartRx`] - Polled serial console
//!
//! Every busy-wait in an implementation goes through [`spin::SpinBudget`],
//! so a stuck peripheral surfaces as [`spin::Timeout`] instead of a hang.
//! Millisecond delays use `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod spi;
pub mod spin;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::I2cBus;
pub use spi::SpiTransport;
pub use spin::{SpinBudget, Timeout};
pub use uart::{UartRx, UartTx};
