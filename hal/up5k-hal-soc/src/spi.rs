//! SB_SPI hard IP master
//!
//! Byte-at-a-time master on one of the UltraPlus SPI cores. Every byte waits
//! for TRDY before loading TXDR and for RRDY before draining RXDR, so the
//! receive side never overruns. Chip-select is driven through CSR under
//! software control.

use up5k_hal::spi::{Mode, Phase, Polarity, SpiConfig, SpiTransport};
use up5k_hal::{SpinBudget, Timeout};

use crate::regs::SpiRegisters;

// CR1
const CR1_SPE: u8 = 0x80;

// CR2
const CR2_MSTR: u8 = 0x80;
const CR2_MCSH: u8 = 0x40;
const CR2_CPOL: u8 = 0x04;
const CR2_CPHA: u8 = 0x02;

// SR
const SR_TIP: u8 = 0x80;
const SR_TRDY: u8 = 0x10;
const SR_RRDY: u8 = 0x08;

/// All four master chip-selects deasserted
const CSR_IDLE: u8 = 0x0F;

/// Master chip-select 0, the only line wired on the board
const CSR_LINE0: u8 = 0x01;

/// Largest value the 6-bit baud divider accepts
const BR_MAX: u8 = 0x3F;

/// SPI transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// A status flag never came up within the spin budget
    Timeout,
}

impl From<Timeout> for SpiError {
    fn from(_: Timeout) -> Self {
        SpiError::Timeout
    }
}

/// Master driver for one SB_SPI core
pub struct SbSpi<'a> {
    regs: &'a SpiRegisters,
    budget: SpinBudget,
}

impl<'a> SbSpi<'a> {
    /// Configure the core as a master on chip-select 0
    pub fn new(regs: &'a SpiRegisters, config: SpiConfig, sysclk_hz: u32) -> Self {
        regs.cr0.write(0xFF);
        regs.cr1.write(CR1_SPE);
        regs.cr2.write(CR2_MSTR | CR2_MCSH | mode_bits(config.mode));
        regs.br.write(baud_divider(sysclk_hz, config.frequency));
        regs.csr.write(CSR_IDLE);

        Self {
            regs,
            budget: SpinBudget::SPI_BYTE,
        }
    }

    /// Replace the per-byte spin budget
    pub fn with_budget(mut self, budget: SpinBudget) -> Self {
        self.budget = budget;
        self
    }

    fn wait_status(&self, mask: u8) -> Result<(), SpiError> {
        let sr = &self.regs.sr;
        self.budget.wait(|| sr.is_set(mask))?;
        Ok(())
    }
}

impl SpiTransport for SbSpi<'_> {
    type Error = SpiError;

    fn send_byte(&mut self, value: u8) -> Result<(), SpiError> {
        self.transfer(value).map(|_| ())
    }

    fn transfer(&mut self, value: u8) -> Result<u8, SpiError> {
        self.wait_status(SR_TRDY)?;
        self.regs.txdr.write(value);
        self.wait_status(SR_RRDY)?;
        Ok(self.regs.rxdr.read())
    }

    fn set_chip_select(&mut self, active: bool) {
        if active {
            self.regs.csr.write(CSR_IDLE & !CSR_LINE0);
        } else {
            self.regs.csr.write(CSR_IDLE);
        }
    }

    fn wait_ready(&mut self) -> Result<(), SpiError> {
        let sr = &self.regs.sr;
        self.budget.wait(|| !sr.is_set(SR_TIP))?;
        Ok(())
    }
}

fn mode_bits(mode: Mode) -> u8 {
    let (polarity, phase): (Polarity, Phase) = mode.into();
    let mut bits = 0;
    if polarity == Polarity::IdleHigh {
        bits |= CR2_CPOL;
    }
    if phase == Phase::CaptureOnSecondTransition {
        bits |= CR2_CPHA;
    }
    bits
}

/// BR value giving the fastest SCK not above `frequency`
///
/// SCK = sysclk / (BR + 1).
fn baud_divider(sysclk_hz: u32, frequency: u32) -> u8 {
    let frequency = frequency.max(1);
    let div = sysclk_hz.div_ceil(frequency).saturating_sub(1);
    div.min(u32::from(BR_MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_READY: u8 = SR_TRDY | SR_RRDY;

    fn config(frequency: u32, mode: Mode) -> SpiConfig {
        SpiConfig { frequency, mode }
    }

    #[test]
    fn test_init_registers() {
        let regs = SpiRegisters::with_status(STATUS_READY);
        let _spi = SbSpi::new(&regs, config(12_000_000, Mode::Mode0), 24_000_000);

        assert_eq!(regs.cr0.read(), 0xFF);
        assert_eq!(regs.cr1.read(), 0x80);
        assert_eq!(regs.cr2.read(), 0xC0);
        assert_eq!(regs.br.read(), 1);
        assert_eq!(regs.csr.read(), 0x0F);
    }

    #[test]
    fn test_mode_bits() {
        assert_eq!(mode_bits(Mode::Mode0), 0);
        assert_eq!(mode_bits(Mode::Mode1), CR2_CPHA);
        assert_eq!(mode_bits(Mode::Mode2), CR2_CPOL);
        assert_eq!(mode_bits(Mode::Mode3), CR2_CPOL | CR2_CPHA);
    }

    #[test]
    fn test_baud_divider() {
        assert_eq!(baud_divider(24_000_000, 24_000_000), 0);
        assert_eq!(baud_divider(24_000_000, 8_000_000), 2);
        // Never faster than requested
        assert_eq!(baud_divider(24_000_000, 7_000_000), 3);
        // Clamped to the 6-bit field
        assert_eq!(baud_divider(24_000_000, 100_000), BR_MAX);
        assert_eq!(baud_divider(24_000_000, 0), BR_MAX);
    }

    #[test]
    fn test_transfer_reads_rx() {
        let regs = SpiRegisters::with_status(STATUS_READY);
        regs.rxdr.write(0xC2);
        let mut spi = SbSpi::new(&regs, SpiConfig::default(), 24_000_000);

        assert_eq!(spi.transfer(0x9F), Ok(0xC2));
        assert_eq!(regs.txdr.read(), 0x9F);
    }

    #[test]
    fn test_send_buffer_leaves_last_byte() {
        let regs = SpiRegisters::with_status(STATUS_READY);
        let mut spi = SbSpi::new(&regs, SpiConfig::default(), 24_000_000);

        spi.send_buffer(&[0x2A, 0x00, 0xEF]).unwrap();
        assert_eq!(regs.txdr.read(), 0xEF);
    }

    #[test]
    fn test_stuck_core_times_out() {
        let regs = SpiRegisters::with_status(0);
        let mut spi = SbSpi::new(&regs, SpiConfig::default(), 24_000_000)
            .with_budget(SpinBudget::new(16));

        assert_eq!(spi.send_byte(0x55), Err(SpiError::Timeout));
        // Nothing loaded into TXDR while TRDY was low
        assert_eq!(regs.txdr.read(), 0);
    }

    #[test]
    fn test_rx_never_ready_times_out() {
        let regs = SpiRegisters::with_status(SR_TRDY);
        let mut spi = SbSpi::new(&regs, SpiConfig::default(), 24_000_000)
            .with_budget(SpinBudget::new(16));

        assert_eq!(spi.transfer(0x55), Err(SpiError::Timeout));
        assert_eq!(regs.txdr.read(), 0x55);
    }

    #[test]
    fn test_chip_select_line_zero() {
        let regs = SpiRegisters::with_status(STATUS_READY);
        let mut spi = SbSpi::new(&regs, SpiConfig::default(), 24_000_000);

        spi.set_chip_select(true);
        assert_eq!(regs.csr.read(), 0x0E);
        spi.set_chip_select(false);
        assert_eq!(regs.csr.read(), 0x0F);
    }

    #[test]
    fn test_wait_ready() {
        let regs = SpiRegisters::with_status(SR_TIP);
        let mut spi =
            SbSpi::new(&regs, SpiConfig::default(), 24_000_000).with_budget(SpinBudget::new(4));
        assert_eq!(spi.wait_ready(), Err(SpiError::Timeout));

        regs.sr.write(0);
        assert_eq!(spi.wait_ready(), Ok(()));
    }
}
