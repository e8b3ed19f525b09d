//! Peripheral drivers for the up5k_riscv board
//!
//! Drivers here are written against the `up5k-hal` traits only, so they run
//! unchanged on the SoC and against test fakes:
//!
//! - SPI NOR flash (wake, JEDEC id, read, deep power-down)

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, SpiFlash};
