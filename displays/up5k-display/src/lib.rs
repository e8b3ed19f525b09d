//! ILI9341 display core for the up5k_riscv board
//!
//! This crate provides:
//! - [`Ili9341`] - the protocol engine: command/data framing, the power-on
//!   script, address windows and pixel streaming
//! - [`Rasterizer`] - clipped drawing primitives on top of any [`RasterTarget`]
//! - [`color`] - RGB565 packing and integer HSV conversion
//! - [`font`] - the 8x8 bitmap font
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Rasterizer (pixel, line, rect, glyph, ...)  │
//! └─────────────────────────────────────────────┘
//!                       │ window + stream
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │ Ili9341 protocol engine                     │
//! └─────────────────────────────────────────────┘
//!                       │ bytes, D/C, CS
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │ up5k-hal SpiTransport + OutputPin           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The panel is fixed at 240x320 portrait, RGB565.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod color;
pub mod error;
pub mod font;
pub mod init;
pub mod protocol;
pub mod raster;

#[cfg(test)]
mod mock;

// Re-export key types
pub use color::{hsv2rgb, pack_rgb565, Hsv, Rgb565, Rgb888};
pub use error::DisplayError;
pub use init::{InitStep, INIT_SCRIPT};
pub use protocol::{Frame, Ili9341};
pub use raster::{RasterTarget, Rasterizer, Window};

/// Panel width in pixels
pub const WIDTH: u16 = 240;

/// Panel height in pixels
pub const HEIGHT: u16 = 320;

