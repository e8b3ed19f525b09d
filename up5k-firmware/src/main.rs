//! up5k_riscv firmware
//!
//! Brings up both SPI ports, identifies the SPI flash, initializes the
//! ILI9341 and runs the demos selected in board.toml. Afterwards it loops
//! forever: the low counter bits go to the LEDs and the counter's two low
//! bytes are written to the configured I2C device.

#![no_std]
#![no_main]

mod config;
mod demo;
mod logger;

use core::panic::PanicInfo;

use defmt::{error, info, warn};
use embedded_hal::delay::DelayNs;
use up5k_display::Ili9341;
use up5k_drivers::SpiFlash;
use up5k_hal::i2c::I2cConfig;
use up5k_hal::spi::SpiConfig;
use up5k_hal::I2cBus;
use up5k_hal_soc::{
    regs, ClockCounter, GpOut, SbI2c, SbSpi, I2C_ACTIVITY_BIT, LCD_DC_BIT, LCD_RESET_BIT,
    LED_SHIFT, LED_WIDTH,
};

use crate::config::BOARD;

/// Main entry point
#[riscv_rt::entry]
fn main() -> ! {
    info!("up5k_riscv - starting up");

    // SAFETY: runs once at reset; each register block below is claimed
    // exactly once and lives for the rest of the program
    let (gp_out, clkcnt, lcd_regs, flash_regs, i2c_regs) = unsafe {
        (
            regs::gp_out(),
            regs::clkcnt(),
            regs::spi(BOARD.lcd.port),
            regs::spi(BOARD.flash.port),
            regs::i2c(BOARD.i2c.port),
        )
    };

    let gpio = GpOut::new(gp_out);
    let mut delay = ClockCounter::new(clkcnt, BOARD.sysclk_hz);

    let (Ok(dc), Ok(rst), Ok(mut leds), Ok(activity)) = (
        gpio.pin(LCD_DC_BIT),
        gpio.pin(LCD_RESET_BIT),
        gpio.field(LED_SHIFT, LED_WIDTH),
        gpio.pin(I2C_ACTIVITY_BIT),
    ) else {
        error!("gp_out bit assignment overlaps");
        halt();
    };

    // Both SPI ports
    let flash_spi = SbSpi::new(
        flash_regs,
        SpiConfig {
            frequency: BOARD.flash.spi_hz,
            ..SpiConfig::default()
        },
        BOARD.sysclk_hz,
    );
    let lcd_spi = SbSpi::new(
        lcd_regs,
        SpiConfig {
            frequency: BOARD.lcd.spi_hz,
            ..SpiConfig::default()
        },
        BOARD.sysclk_hz,
    );

    let mut flash = SpiFlash::new(flash_spi);
    let flash_id = match flash.wake().and_then(|()| flash.jedec_id()) {
        Ok(id) => {
            info!("spi flash id: {=u32:#x}", id);
            Some(id)
        }
        Err(e) => {
            warn!("spi flash not responding: {}", e);
            None
        }
    };

    let mut lcd = Ili9341::new(lcd_spi, dc, rst);
    match lcd.init(&mut delay) {
        Ok(()) => {
            info!("LCD initialized");
            if let Err(e) = demo::run(
                &mut lcd,
                &mut flash,
                &mut delay,
                &BOARD.demo,
                flash_id,
                BOARD.flash.image_offset,
            ) {
                error!("LCD demo aborted: {}", e);
            }
        }
        Err(e) => error!("LCD init failed: {}", e),
    }

    let mut i2c = SbI2c::new(
        i2c_regs,
        I2cConfig::new(BOARD.i2c.bus_hz),
        BOARD.sysclk_hz,
    )
    .with_activity_flag(activity);
    info!(
        "{} initialized, prescale {=u16}",
        BOARD.i2c.port,
        i2c.prescale()
    );

    let mut cnt: u32 = 0;
    loop {
        leds.write(cnt);

        let bytes = cnt.to_le_bytes();
        match i2c.write(BOARD.i2c.device_address, &bytes[..2]) {
            Ok(()) => info!("i2c tx {=u32}: ok", cnt),
            Err(e) => warn!("i2c tx {=u32}: {}", cnt, e),
        }

        cnt = cnt.wrapping_add(1);
        delay.delay_ms(BOARD.demo.heartbeat_ms);
    }
}

/// Park the hart
fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!("panic: {}", defmt::Display2Format(info));
    halt();
}
