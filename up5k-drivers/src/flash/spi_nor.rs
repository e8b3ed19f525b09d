//! SPI NOR flash (read path)
//!
//! The configuration flash on the board shares SB_SPI0 with nothing else, so
//! the driver owns the transport. Only the commands the firmware needs are
//! implemented: release from deep power-down, JEDEC id, normal read and
//! deep power-down.
//!
//! # Command framing
//!
//! Every command is one chip-select cycle: opcode, then for reads a 24-bit
//! big-endian address, then the data clocked in while sending filler bytes.

use up5k_hal::spi::with_chip_select;
use up5k_hal::SpiTransport;

/// SPI NOR opcodes
pub mod cmd {
    /// Read data (no dummy cycles)
    pub const READ: u8 = 0x03;
    /// Read JEDEC manufacturer and device id
    pub const JEDEC_ID: u8 = 0x9F;
    /// Release from deep power-down
    pub const RELEASE_POWER_DOWN: u8 = 0xAB;
    /// Deep power-down
    pub const POWER_DOWN: u8 = 0xB9;
}

/// Highest byte address reachable with a 3-byte address
pub const MAX_ADDRESS: u32 = 0x00FF_FFFF;

/// Byte sent while clocking in data
const FILL: u8 = 0x00;

/// Flash error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError<E> {
    /// Transport error
    Transport(E),
    /// The read would run past the 24-bit address space
    AddressOutOfRange,
}

/// SPI NOR flash on a dedicated transport
pub struct SpiFlash<SPI> {
    spi: SPI,
}

impl<SPI: SpiTransport> SpiFlash<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Bring the chip out of deep power-down
    ///
    /// Needed after an FPGA configuration cycle, which leaves the flash
    /// asleep on some boards.
    pub fn wake(&mut self) -> Result<(), FlashError<SPI::Error>> {
        self.command(cmd::RELEASE_POWER_DOWN)
    }

    /// Put the chip into deep power-down
    pub fn power_down(&mut self) -> Result<(), FlashError<SPI::Error>> {
        self.command(cmd::POWER_DOWN)
    }

    /// Manufacturer id in bits 23..16, device id in bits 15..0
    pub fn jedec_id(&mut self) -> Result<u32, FlashError<SPI::Error>> {
        let mut id = [0u8; 3];
        with_chip_select(&mut self.spi, |spi| {
            spi.send_byte(cmd::JEDEC_ID)?;
            spi.read(&mut id, FILL)
        })
        .map_err(FlashError::Transport)?;

        Ok(u32::from_be_bytes([0, id[0], id[1], id[2]]))
    }

    /// Fill `buf` starting at byte `address`
    pub fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<(), FlashError<SPI::Error>> {
        let end = u64::from(address) + buf.len() as u64;
        if address > MAX_ADDRESS || end > u64::from(MAX_ADDRESS) + 1 {
            return Err(FlashError::AddressOutOfRange);
        }

        let [_, a2, a1, a0] = address.to_be_bytes();
        with_chip_select(&mut self.spi, |spi| {
            spi.send_buffer(&[cmd::READ, a2, a1, a0])?;
            spi.read(buf, FILL)
        })
        .map_err(FlashError::Transport)
    }

    /// Give back the transport
    pub fn release(self) -> SPI {
        self.spi
    }

    fn command(&mut self, opcode: u8) -> Result<(), FlashError<SPI::Error>> {
        with_chip_select(&mut self.spi, |spi| spi.send_byte(opcode)).map_err(FlashError::Transport)
    }
}
