//! Board configuration
//!
//! `BOARD` is generated by build.rs from board.toml, which has already been
//! range-checked by the time this compiles.

use up5k_hal_soc::Port;

/// Board description
#[derive(Debug, Clone, Copy)]
pub struct BoardConfig {
    /// System clock in Hz
    pub sysclk_hz: u32,
    pub lcd: LcdConfig,
    pub flash: FlashConfig,
    pub i2c: I2cBusConfig,
    pub demo: DemoConfig,
}

/// ILI9341 wiring
#[derive(Debug, Clone, Copy)]
pub struct LcdConfig {
    pub port: Port,
    pub spi_hz: u32,
}

/// SPI NOR flash wiring
#[derive(Debug, Clone, Copy)]
pub struct FlashConfig {
    pub port: Port,
    pub spi_hz: u32,
    /// Byte address of the full-screen image
    pub image_offset: u32,
}

/// I2C heartbeat target
#[derive(Debug, Clone, Copy)]
pub struct I2cBusConfig {
    pub port: Port,
    pub bus_hz: u32,
    /// 7-bit address
    pub device_address: u8,
}

/// Which power-on demos run
#[derive(Debug, Clone, Copy)]
pub struct DemoConfig {
    pub text: bool,
    pub color_lines: bool,
    pub line_sweep: bool,
    pub flash_image: bool,
    pub heartbeat_ms: u32,
}

/// Hard IP instance from its board.toml index
///
/// Evaluated at compile time, so an index build.rs let through still fails
/// the build instead of reaching the hardware.
const fn port(index: u8) -> Port {
    match Port::from_index(index) {
        Some(port) => port,
        None => panic!("SPI/I2C port index must be 0 or 1"),
    }
}

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
