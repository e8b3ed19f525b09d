//! Serial flash drivers

pub mod spi_nor;

pub use spi_nor::{FlashError, SpiFlash};
