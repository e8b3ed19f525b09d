//! ILI9341 protocol engine
//!
//! Every byte on the wire is framed by the command/data select line: low for
//! an opcode, high for parameters and pixel data. Commands are sent one byte
//! per chip-select cycle; pixel data goes out as a burst with chip-select
//! held for the whole stream.

use embedded_hal::delay::DelayNs;
use up5k_hal::spi::with_chip_select;
use up5k_hal::{OutputPin, SpiTransport};

use crate::color::Rgb565;
use crate::error::DisplayError;
use crate::init::{InitStep, INIT_SCRIPT};

/// ILI9341 opcodes
pub mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const GAMMASET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row (page) address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory access control
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const DFUNCTR: u8 = 0xB6;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const VMCTR1: u8 = 0xC5;
    pub const VMCTR2: u8 = 0xC7;
    pub const PWCTRA: u8 = 0xCB;
    pub const PWCTRB: u8 = 0xCF;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
    pub const DTCTRA: u8 = 0xE8;
    pub const DTCTRB: u8 = 0xEA;
    pub const PWONCTR: u8 = 0xED;
    pub const GAMMA3EN: u8 = 0xF2;
    pub const IFCTL: u8 = 0xF6;
    pub const PUMPCTR: u8 = 0xF7;
}

/// Reset pulse width and recovery time
const RESET_HOLD_MS: u32 = 50;

/// Time the controller needs after entering or leaving sleep
const SLEEP_SETTLE_MS: u32 = 120;

/// A byte tagged with the state of the command/data select line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    Command(u8),
    Data(u8),
}

/// ILI9341 on a SPI transport with command/data select and reset lines
pub struct Ili9341<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI, DC, RST> Ili9341<SPI, DC, RST>
where
    SPI: SpiTransport,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Bind the transport and control pins; nothing is sent until [`Self::init`]
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Hardware reset, then replay [`INIT_SCRIPT`]
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError<SPI::Error>> {
        self.rst.set_low();
        delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_high();
        delay.delay_ms(RESET_HOLD_MS);

        self.run_script(INIT_SCRIPT, delay)
    }

    /// Replay `script` up to its [`InitStep::End`]
    pub fn run_script<D: DelayNs>(
        &mut self,
        script: &[InitStep],
        delay: &mut D,
    ) -> Result<(), DisplayError<SPI::Error>> {
        for step in script {
            match *step {
                InitStep::Command { opcode, params } => self.command(opcode, params)?,
                InitStep::Delay(ms) => delay.delay_ms(ms),
                InitStep::End => break,
            }
        }
        Ok(())
    }

    /// Drive the select line for `frame` and send its byte
    pub fn write_framed(&mut self, frame: Frame) -> Result<(), DisplayError<SPI::Error>> {
        let byte = match frame {
            Frame::Command(opcode) => {
                self.dc.set_low();
                opcode
            }
            Frame::Data(value) => {
                self.dc.set_high();
                value
            }
        };
        with_chip_select(&mut self.spi, |spi| spi.send_byte(byte)).map_err(DisplayError::Transport)
    }

    /// Send an opcode followed by its parameters
    pub fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), DisplayError<SPI::Error>> {
        self.write_framed(Frame::Command(opcode))?;
        for &param in params {
            self.write_framed(Frame::Data(param))?;
        }
        Ok(())
    }

    /// Program the column and row range, then open memory write
    ///
    /// Coordinates are sent as given; clipping is the caller's job.
    pub fn set_address_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError<SPI::Error>> {
        let [x0_hi, x0_lo] = x0.to_be_bytes();
        let [x1_hi, x1_lo] = x1.to_be_bytes();
        let [y0_hi, y0_lo] = y0.to_be_bytes();
        let [y1_hi, y1_lo] = y1.to_be_bytes();

        self.command(cmd::CASET, &[x0_hi, x0_lo, x1_hi, x1_lo])?;
        self.command(cmd::RASET, &[y0_hi, y0_lo, y1_hi, y1_lo])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Send `count` copies of `color` as one burst
    pub fn stream_pixels(
        &mut self,
        color: Rgb565,
        count: u32,
    ) -> Result<(), DisplayError<SPI::Error>> {
        if count == 0 {
            return Ok(());
        }

        let bytes = color.to_be_bytes();
        self.dc.set_high();
        with_chip_select(&mut self.spi, |spi| {
            for _ in 0..count {
                spi.send_buffer(&bytes)?;
            }
            spi.wait_ready()
        })
        .map_err(DisplayError::Transport)
    }

    /// Send raw pixel bytes as one burst
    pub fn stream_buffer(&mut self, bytes: &[u8]) -> Result<(), DisplayError<SPI::Error>> {
        if bytes.is_empty() {
            return Ok(());
        }

        self.dc.set_high();
        with_chip_select(&mut self.spi, |spi| {
            spi.send_buffer(bytes)?;
            spi.wait_ready()
        })
        .map_err(DisplayError::Transport)
    }

    /// Turn the panel output on or off; frame memory is kept
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError<SPI::Error>> {
        self.command(if on { cmd::DISPON } else { cmd::DISPOFF }, &[])
    }

    /// Invert every displayed color
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError<SPI::Error>> {
        self.command(if inverted { cmd::INVON } else { cmd::INVOFF }, &[])
    }

    /// Enter or leave sleep mode, waiting out the settle time
    pub fn set_sleep<D: DelayNs>(
        &mut self,
        sleep: bool,
        delay: &mut D,
    ) -> Result<(), DisplayError<SPI::Error>> {
        self.command(if sleep { cmd::SLPIN } else { cmd::SLPOUT }, &[])?;
        delay.delay_ms(SLEEP_SETTLE_MS);
        Ok(())
    }

    /// Give back the transport and pins
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}
