//! Power-on LCD demos
//!
//! Each demo is enabled from the `[demo]` section of board.toml and runs
//! once, in order, before the heartbeat loop starts.

use core::fmt::Write as _;

use defmt::{info, warn};
use embedded_hal::delay::DelayNs;
use heapless::String;
use up5k_display::{hsv2rgb, Hsv, RasterTarget, Rasterizer, Rgb565, HEIGHT, WIDTH};
use up5k_drivers::SpiFlash;
use up5k_hal::SpiTransport;

use crate::config::DemoConfig;

/// Pause after each demo
const PAUSE_MS: u32 = 1000;

/// Image rows fetched from flash per blit
const STRIP_ROWS: u16 = 4;

/// Bytes per strip, two per pixel
const STRIP_BYTES: usize = WIDTH as usize * STRIP_ROWS as usize * 2;

/// Run every demo enabled in `config`
///
/// `flash_id` is shown on the text panel when the flash answered.
pub fn run<L, S, D>(
    lcd: &mut L,
    flash: &mut SpiFlash<S>,
    delay: &mut D,
    config: &DemoConfig,
    flash_id: Option<u32>,
    image_offset: u32,
) -> Result<(), L::Error>
where
    L: RasterTarget,
    S: SpiTransport,
    S::Error: defmt::Format,
    D: DelayNs,
{
    if config.text {
        info!("demo: text");
        text_panel(lcd, flash_id)?;
        delay.delay_ms(PAUSE_MS);
    }

    if config.color_lines {
        info!("demo: color lines");
        color_lines(lcd)?;
        delay.delay_ms(PAUSE_MS);
    }

    if config.flash_image {
        info!("demo: flash image at {=u32:#x}", image_offset);
        flash_image(lcd, flash, image_offset)?;
        delay.delay_ms(PAUSE_MS);
    }

    if config.line_sweep {
        info!("demo: line sweep");
        line_sweep(lcd)?;
        delay.delay_ms(PAUSE_MS);
    }

    Ok(())
}

/// Magenta panel, greeting and the full 256-glyph font table
fn text_panel<L: RasterTarget>(lcd: &mut L, flash_id: Option<u32>) -> Result<(), L::Error> {
    let cx = (WIDTH / 2) as i16;
    let cy = (HEIGHT / 2) as i16;

    lcd.fill_rect(20, 20, 200, 280, Rgb565::MAGENTA)?;
    lcd.draw_string(cx - 44, cy - 12 * 8, "Hello World", Rgb565::WHITE, Rgb565::MAGENTA)?;

    // 16x16 grid, one row per high nibble
    for code in 0..=u8::MAX {
        let row = i16::from(code >> 4);
        let col = i16::from(code & 0x0F);
        lcd.draw_glyph(
            cx - 8 * 8 + col * 8,
            cy - 8 * 8 + row * 8,
            code,
            Rgb565::GREEN,
            Rgb565::BLACK,
        )?;
    }

    if let Some(id) = flash_id {
        let mut line: String<16> = String::new();
        if write!(line, "flash {:06X}", id).is_ok() {
            let x = cx - (line.len() as i16) * 4;
            lcd.draw_string(x, cy + 8 * 9, &line, Rgb565::WHITE, Rgb565::MAGENTA)?;
        }
    }

    Ok(())
}

/// Scroll an HSV rainbow through the panel, one hue step per frame
fn color_lines<L: RasterTarget>(lcd: &mut L) -> Result<(), L::Error> {
    lcd.fill_screen(Rgb565::BLACK)?;

    for frame in (0..=u16::from(u8::MAX)).rev() {
        for row in 0..HEIGHT {
            // Hue wraps at 256
            let hue = (row + frame) as u8;
            let color = Rgb565::from(hsv2rgb(Hsv::new(hue, 255, 255)));
            lcd.draw_fast_hline(0, row as i16, WIDTH as i16, color)?;
        }
    }

    Ok(())
}

/// Stream a full-screen image from flash in strips of [`STRIP_ROWS`] rows
///
/// A flash error ends the demo with whatever has been drawn so far.
fn flash_image<L, S>(lcd: &mut L, flash: &mut SpiFlash<S>, offset: u32) -> Result<(), L::Error>
where
    L: RasterTarget,
    S: SpiTransport,
    S::Error: defmt::Format,
{
    let mut strip = [0u8; STRIP_BYTES];
    let mut address = offset;

    for y in (0..HEIGHT).step_by(STRIP_ROWS as usize) {
        if let Err(e) = flash.read(address, &mut strip) {
            warn!("flash read at {=u32:#x} failed: {}", address, e);
            return Ok(());
        }
        lcd.blit(0, y as i16, WIDTH as i16, STRIP_ROWS as i16, &strip)?;
        address += STRIP_BYTES as u32;
    }

    Ok(())
}

/// Four lines per step pivoting around the panel edges, colored by step
fn line_sweep<L: RasterTarget>(lcd: &mut L) -> Result<(), L::Error> {
    let last = WIDTH as i16 - 1;

    lcd.fill_screen(Rgb565::BLACK)?;
    for i in 0..HEIGHT as i16 {
        let color = Rgb565::from(hsv2rgb(Hsv::new(i as u8, 255, 255)));
        lcd.draw_line(i, 0, last, i, color)?;
        lcd.draw_line(last, i, last - i, last, color)?;
        lcd.draw_line(last - i, last, 0, last - i, color)?;
        lcd.draw_line(0, last - i, i, 0, color)?;
    }

    Ok(())
}
