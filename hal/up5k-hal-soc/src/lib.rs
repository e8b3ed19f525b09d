//! up5k_riscv SoC HAL
//!
//! Memory-mapped implementations of the `up5k-hal` traits for the
//! up5k_riscv SoC: a picorv32 core on an iCE40 UltraPlus with the FPGA's
//! hard SPI and I2C blocks exposed on the system bus.
//!
//! # Memory map
//!
//! | Address       | Peripheral                              |
//! |---------------|-----------------------------------------|
//! | `0x2000_0000` | `gp_out` 32-bit parallel output         |
//! | `0x3000_0000` | ACIA serial (control/status, data)      |
//! | `0x4000_0000` | SB_SPI0 (SPI flash)                     |
//! | `0x4000_0040` | SB_I2C0                                 |
//! | `0x4000_0080` | SB_SPI1 (LCD)                           |
//! | `0x4000_00C0` | SB_I2C1                                 |
//! | `0x5000_0000` | 32-bit clock counter                    |
//!
//! Register blocks are plain `#[repr(C)]` structs of volatile cells, so the
//! drivers can be pointed at RAM in host tests.

#![no_std]

pub mod clock;
pub mod gpio;
pub mod i2c;
pub mod regs;
pub mod spi;
pub mod uart;

pub use clock::ClockCounter;
pub use gpio::{GpOut, GpioBit, GpioError, GpioField};
pub use i2c::{I2cError, SbI2c};
pub use regs::Port;
pub use spi::{SbSpi, SpiError};
pub use uart::{Acia, AciaError};

/// System clock of the reference board
pub const DEFAULT_SYSCLK_HZ: u32 = 24_000_000;

/// `gp_out` bit driving the LCD command/data select line
pub const LCD_DC_BIT: u8 = 30;

/// `gp_out` bit driving the LCD reset line (active low)
pub const LCD_RESET_BIT: u8 = 31;

/// `gp_out` bit raised while an I2C transaction is running
pub const I2C_ACTIVITY_BIT: u8 = 0;

/// First `gp_out` bit of the three diagnostic LEDs
pub const LED_SHIFT: u8 = 17;

/// Number of diagnostic LEDs
pub const LED_WIDTH: u8 = 3;
