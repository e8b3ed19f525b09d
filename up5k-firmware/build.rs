//! Build script for up5k-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Highest byte address of the 24-bit flash address space
const FLASH_END: u64 = 0x0100_0000;

/// Bytes in one full-screen RGB565 image
const IMAGE_BYTES: u64 = 240 * 320 * 2;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Board {
    clock: Clock,
    lcd: Lcd,
    flash: Flash,
    i2c: I2c,
    demo: Demo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Clock {
    sysclk_hz: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Lcd {
    spi_port: u8,
    spi_hz: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Flash {
    spi_port: u8,
    spi_hz: u32,
    image_offset: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct I2c {
    port: u8,
    bus_hz: u32,
    device_address: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Demo {
    text: bool,
    color_lines: bool,
    line_sweep: bool,
    flash_image: bool,
    heartbeat_ms: u32,
}

fn main() {
    setup_linker();
    let board = validate_config();
    generate_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() -> Board {
    // Re-run if board.toml changes
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the up5k-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax, missing sections and unknown keys all surface here
    let board: Board = match toml::from_str(&config_content) {
        Ok(board) => board,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = check_ranges(&board);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = truncate_line(line);
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `line` to fit the 64-column box, on a char boundary
fn truncate_line(line: &str) -> String {
    if line.chars().count() <= 64 {
        return line.to_string();
    }
    let end = line
        .char_indices()
        .nth(61)
        .map_or(line.len(), |(index, _)| index);
    format!("{}...", &line[..end])
}

/// Value checks that the schema alone cannot express
fn check_ranges(board: &Board) -> Vec<String> {
    let mut errors = Vec::new();
    let sysclk = board.clock.sysclk_hz;

    if sysclk == 0 {
        errors.push("[clock] sysclk_hz must be non-zero".to_string());
    }

    check_port(&mut errors, "[lcd] spi_port", board.lcd.spi_port);
    check_port(&mut errors, "[flash] spi_port", board.flash.spi_port);
    check_port(&mut errors, "[i2c] port", board.i2c.port);

    if board.lcd.spi_port == board.flash.spi_port {
        errors.push("[lcd] and [flash] must use different SPI ports".to_string());
    }

    check_frequency(&mut errors, "[lcd] spi_hz", board.lcd.spi_hz, sysclk);
    check_frequency(&mut errors, "[flash] spi_hz", board.flash.spi_hz, sysclk);
    check_frequency(&mut errors, "[i2c] bus_hz", board.i2c.bus_hz, sysclk);

    if board.i2c.device_address > 0x7F {
        errors.push(format!(
            "[i2c] device_address 0x{:02X} is not a 7-bit address",
            board.i2c.device_address
        ));
    }

    if board.demo.flash_image && u64::from(board.flash.image_offset) + IMAGE_BYTES > FLASH_END {
        errors.push("[flash] image_offset leaves no room for a 240x320 image".to_string());
    }

    if board.demo.heartbeat_ms == 0 {
        errors.push("[demo] heartbeat_ms must be greater than 0".to_string());
    }

    errors
}

fn check_port(errors: &mut Vec<String>, key: &str, port: u8) {
    if port > 1 {
        errors.push(format!("{} must be 0 or 1", key));
    }
}

fn check_frequency(errors: &mut Vec<String>, key: &str, hz: u32, sysclk: u32) {
    if hz == 0 {
        errors.push(format!("{} must be non-zero", key));
    } else if hz > sysclk / 2 {
        errors.push(format!("{} must be at most sysclk/2 ({} Hz)", key, sysclk / 2));
    }
}

/// Write `board_config.rs` into OUT_DIR
fn generate_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let code = format!(
        "// Generated by build.rs from board.toml\n\
         pub const BOARD: BoardConfig = BoardConfig {{\n    \
             sysclk_hz: {sysclk},\n    \
             lcd: LcdConfig {{ port: port({lcd_port}), spi_hz: {lcd_hz} }},\n    \
             flash: FlashConfig {{ port: port({flash_port}), spi_hz: {flash_hz}, image_offset: {offset:#x} }},\n    \
             i2c: I2cBusConfig {{ port: port({i2c_port}), bus_hz: {i2c_hz}, device_address: {addr:#04x} }},\n    \
             demo: DemoConfig {{\n        \
                 text: {text},\n        \
                 color_lines: {lines},\n        \
                 line_sweep: {sweep},\n        \
                 flash_image: {image},\n        \
                 heartbeat_ms: {heartbeat},\n    \
             }},\n\
         }};\n",
        sysclk = board.clock.sysclk_hz,
        lcd_port = board.lcd.spi_port,
        lcd_hz = board.lcd.spi_hz,
        flash_port = board.flash.spi_port,
        flash_hz = board.flash.spi_hz,
        offset = board.flash.image_offset,
        i2c_port = board.i2c.port,
        i2c_hz = board.i2c.bus_hz,
        addr = board.i2c.device_address,
        text = board.demo.text,
        lines = board.demo.color_lines,
        sweep = board.demo.line_sweep,
        image = board.demo.flash_image,
        heartbeat = board.demo.heartbeat_ms,
    );

    fs::write(out_dir.join("board_config.rs"), code).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_line_on_char_boundary() {
        // Box-drawing characters are three bytes each
        let line = format!("{}{}", "x".repeat(60), "═".repeat(10));
        let cut = truncate_line(&line);
        assert_eq!(cut, format!("{}═...", "x".repeat(60)));
        assert_eq!(cut.chars().count(), 64);
    }

    #[test]
    fn test_truncate_line_keeps_short_lines() {
        assert_eq!(truncate_line("missing field `spi_hz`"), "missing field `spi_hz`");
        let exact = "é".repeat(64);
        assert_eq!(truncate_line(&exact), exact);
    }
}
