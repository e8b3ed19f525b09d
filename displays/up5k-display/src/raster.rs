//! Rasterizer
//!
//! Drawing primitives built only on the protocol engine's window and pixel
//! stream calls. Everything is clipped against the 240x320 panel first; a
//! primitive that clips to nothing sends nothing.
//!
//! Coordinates are signed so shapes may hang off any edge. Internally all
//! arithmetic is done in `i32`, so no input combination overflows.

use up5k_hal::{OutputPin, SpiTransport};

use crate::color::Rgb565;
use crate::error::DisplayError;
use crate::font::{self, GLYPH_SIZE};
use crate::protocol::Ili9341;
use crate::{HEIGHT, WIDTH};

const W: i32 = WIDTH as i32;
const H: i32 = HEIGHT as i32;

/// An inclusive panel rectangle, as programmed with CASET/RASET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Part of the `w` x `h` rectangle at (`x`, `y`) that lies on the panel
    pub fn clip(x: i32, y: i32, w: i32, h: i32) -> Option<Self> {
        if w <= 0 || h <= 0 {
            return None;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w - 1).min(W - 1);
        let y1 = y.saturating_add(h - 1).min(H - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Self {
            x0: x0 as u16,
            y0: y0 as u16,
            x1: x1 as u16,
            y1: y1 as u16,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.x1 - self.x0) + 1
    }

    pub fn height(&self) -> u32 {
        u32::from(self.y1 - self.y0) + 1
    }

    /// Pixels covered
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }
}

/// The protocol surface the rasterizer draws through
pub trait RasterTarget {
    type Error;

    fn set_address_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16)
        -> Result<(), Self::Error>;

    fn stream_pixels(&mut self, color: Rgb565, count: u32) -> Result<(), Self::Error>;

    fn stream_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<SPI, DC, RST> RasterTarget for Ili9341<SPI, DC, RST>
where
    SPI: SpiTransport,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error = DisplayError<SPI::Error>;

    fn set_address_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Self::Error> {
        Ili9341::set_address_window(self, x0, y0, x1, y1)
    }

    fn stream_pixels(&mut self, color: Rgb565, count: u32) -> Result<(), Self::Error> {
        Ili9341::stream_pixels(self, color, count)
    }

    fn stream_buffer(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        Ili9341::stream_buffer(self, bytes)
    }
}

/// Drawing primitives
///
/// Implemented for every [`RasterTarget`].
pub trait Rasterizer: RasterTarget {
    /// Plot one pixel
    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) -> Result<(), Self::Error> {
        plot(self, x.into(), y.into(), color)
    }

    /// Horizontal line of `w` pixels starting at (`x`, `y`), one burst
    fn draw_fast_hline(&mut self, x: i16, y: i16, w: i16, color: Rgb565) -> Result<(), Self::Error> {
        fill_area(self, x.into(), y.into(), w.into(), 1, color)
    }

    /// Vertical line of `h` pixels starting at (`x`, `y`), one burst
    fn draw_fast_vline(&mut self, x: i16, y: i16, h: i16, color: Rgb565) -> Result<(), Self::Error> {
        fill_area(self, x.into(), y.into(), 1, h.into(), color)
    }

    /// Bresenham line between two points, both inclusive
    fn draw_line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let (mut x0, mut y0, mut x1, mut y1) =
            (i32::from(x0), i32::from(y0), i32::from(x1), i32::from(y1));

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut error = dx / 2;
        let mut y = y0;

        for x in x0..=x1 {
            if steep {
                plot(self, y, x, color)?;
            } else {
                plot(self, x, y, color)?;
            }
            error -= dy;
            if error < 0 {
                y += ystep;
                error += dx;
            }
        }
        Ok(())
    }

    /// Rectangle outline; the side lines skip the corners
    fn empty_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let (x, y, w, h) = (i32::from(x), i32::from(y), i32::from(w), i32::from(h));

        fill_area(self, x, y, w, 1, color)?;
        fill_area(self, x, y + h - 1, w, 1, color)?;
        fill_area(self, x, y + 1, 1, h - 2, color)?;
        fill_area(self, x + w - 1, y + 1, 1, h - 2, color)
    }

    /// Solid rectangle, one window and one burst
    fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        fill_area(self, x.into(), y.into(), w.into(), h.into(), color)
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        fill_area(self, 0, 0, W, H, color)
    }

    /// One 8x8 glyph, `fg` on `bg`
    ///
    /// Each pixel is streamed as its own single-pixel burst. Glyphs hanging
    /// off the panel are cut to the visible part.
    fn draw_glyph(
        &mut self,
        x: i16,
        y: i16,
        code: u8,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), Self::Error> {
        glyph_at(self, x.into(), y.into(), code, fg, bg)
    }

    /// One glyph per byte of `text`, left to right, no wrapping
    ///
    /// Stops once the pen has moved past the right edge.
    fn draw_string(
        &mut self,
        x: i16,
        y: i16,
        text: &str,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), Self::Error> {
        let mut pen = i32::from(x);
        let y = i32::from(y);
        for code in text.bytes() {
            glyph_at(self, pen, y, code, fg, bg)?;
            pen += GLYPH_SIZE;
            if pen > W {
                break;
            }
        }
        Ok(())
    }

    /// Copy a block of big-endian RGB565 pixels, row-major
    ///
    /// The block is cut at the right and bottom edges without remapping the
    /// source: the first `w' * h'` pixels of `pixels` are sent as they are.
    /// A block whose origin is off the panel is not drawn.
    fn blit(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[u8]) -> Result<(), Self::Error> {
        if x < 0 || y < 0 {
            return Ok(());
        }
        let Some(window) = Window::clip(x.into(), y.into(), w.into(), h.into()) else {
            return Ok(());
        };

        let len = (window.area() as usize * 2).min(pixels.len());
        self.set_address_window(window.x0, window.y0, window.x1, window.y1)?;
        self.stream_buffer(&pixels[..len])
    }
}

impl<T: RasterTarget + ?Sized> Rasterizer for T {}

fn plot<T: RasterTarget + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    color: Rgb565,
) -> Result<(), T::Error> {
    if !(0..W).contains(&x) || !(0..H).contains(&y) {
        return Ok(());
    }
    let (x, y) = (x as u16, y as u16);
    target.set_address_window(x, y, x + 1, y + 1)?;
    target.stream_pixels(color, 1)
}

fn fill_area<T: RasterTarget + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Rgb565,
) -> Result<(), T::Error> {
    let Some(window) = Window::clip(x, y, w, h) else {
        return Ok(());
    };
    target.set_address_window(window.x0, window.y0, window.x1, window.y1)?;
    target.stream_pixels(color, window.area())
}

fn glyph_at<T: RasterTarget + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    code: u8,
    fg: Rgb565,
    bg: Rgb565,
) -> Result<(), T::Error> {
    let Some(window) = Window::clip(x, y, GLYPH_SIZE, GLYPH_SIZE) else {
        return Ok(());
    };
    target.set_address_window(window.x0, window.y0, window.x1, window.y1)?;

    let rows = font::glyph(code);
    for py in i32::from(window.y0)..=i32::from(window.y1) {
        let bits = rows[(py - y) as usize];
        for px in i32::from(window.x0)..=i32::from(window.x1) {
            let lit = bits & (0x80 >> (px - x)) != 0;
            target.stream_pixels(if lit { fg } else { bg }, 1)?;
        }
    }
    Ok(())
}
