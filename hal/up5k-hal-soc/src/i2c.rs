//! SB_I2C hard IP master
//!
//! Write-only master. A transaction is START + address, each data byte, then
//! STOP, with a bounded TRRDY wait before every byte and before the STOP.

use up5k_hal::i2c::I2cConfig;
use up5k_hal::{I2cBus, OutputPin, SpinBudget};

use crate::gpio::GpioBit;
use crate::regs::I2cRegisters;

const CR1_EN: u8 = 0x80;
/// SDA output delay, in core clocks
const CR1_SDA_DELAY: u8 = 12;

// CMDR
const CMD_STA: u8 = 0x80;
const CMD_STO: u8 = 0x40;
const CMD_WR: u8 = 0x10;
const CMD_CKSDIS: u8 = 0x04;

// SR
const SR_RARC: u8 = 0x20;
const SR_TRRDY: u8 = 0x04;
const SR_TROE: u8 = 0x02;

/// I2C transaction error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// The device did not acknowledge
    Nack,
    /// No acknowledge and the transmit register overran; the core was reset
    Overrun,
    /// TRRDY never came up within the spin budget
    Timeout,
}

/// Master driver for one SB_I2C core
pub struct SbI2c<'a> {
    regs: &'a I2cRegisters,
    prescale: u16,
    activity: Option<GpioBit<'a>>,
    budget: SpinBudget,
}

impl<'a> SbI2c<'a> {
    /// Enable the core and program the prescaler for `config.frequency`
    pub fn new(regs: &'a I2cRegisters, config: I2cConfig, sysclk_hz: u32) -> Self {
        let prescale = prescaler(sysclk_hz, config.frequency);

        regs.cr1.write(CR1_EN | CR1_SDA_DELAY);
        // BRMSB write resets the core, so it goes first
        regs.brmsb.write((prescale >> 8) as u8);
        regs.brlsb.write(prescale as u8);

        Self {
            regs,
            prescale,
            activity: None,
            budget: SpinBudget::I2C_BYTE,
        }
    }

    /// Raise `flag` for the duration of every transaction
    pub fn with_activity_flag(mut self, flag: GpioBit<'a>) -> Self {
        self.activity = Some(flag);
        self
    }

    /// Replace the per-byte spin budget
    pub fn with_budget(mut self, budget: SpinBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Programmed 10-bit prescaler
    pub fn prescale(&self) -> u16 {
        self.prescale
    }

    fn wait_trrdy(&self) -> Result<(), I2cError> {
        let sr = &self.regs.sr;
        self.budget
            .wait(|| sr.is_set(SR_TRRDY))
            .map_err(|_| I2cError::Timeout)
    }

    fn transmit(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        self.regs.txdr.write(address << 1);
        self.regs.cmdr.write(CMD_STA | CMD_WR | CMD_CKSDIS);

        for &byte in data {
            self.wait_trrdy()?;
            self.regs.txdr.write(byte);
            self.regs.cmdr.write(CMD_WR | CMD_CKSDIS);
        }

        self.wait_trrdy()
    }

    fn check_status(&self) -> Result<(), I2cError> {
        let status = self.regs.sr.read();
        if status & SR_RARC == 0 {
            return Ok(());
        }
        if status & SR_TROE != 0 {
            self.regs.brmsb.write((self.prescale >> 8) as u8);
            return Err(I2cError::Overrun);
        }
        Err(I2cError::Nack)
    }
}

impl I2cBus for SbI2c<'_> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        if let Some(flag) = self.activity.as_mut() {
            flag.set_high();
        }

        let sent = self.transmit(address, data);
        // STOP goes out even after a timeout so the bus is released
        self.regs.cmdr.write(CMD_STO | CMD_CKSDIS);
        let result = sent.and_then(|()| self.check_status());

        if let Some(flag) = self.activity.as_mut() {
            flag.set_low();
        }
        result
    }
}

/// Prescaler value: sysclk / (4 * bus frequency), clamped to 10 bits
fn prescaler(sysclk_hz: u32, frequency: u32) -> u16 {
    let div = sysclk_hz / frequency.max(1).saturating_mul(4);
    div.clamp(1, 0x3FF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::GpOut;
    use vcell::VolatileCell;

    const SYSCLK: u32 = 24_000_000;

    #[test]
    fn test_init_standard_mode() {
        let regs = I2cRegisters::with_status(0);
        let i2c = SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK);

        assert_eq!(regs.cr1.read(), 0x80 | 12);
        assert_eq!(regs.brmsb.read(), 0);
        assert_eq!(regs.brlsb.read(), 60);
        assert_eq!(i2c.prescale(), 60);
    }

    #[test]
    fn test_prescaler_uses_high_bits() {
        assert_eq!(prescaler(SYSCLK, 20_000), 300);
        assert_eq!(prescaler(SYSCLK, 1_000), 0x3FF);
        assert_eq!(prescaler(SYSCLK, 24_000_000), 1);
        assert_eq!(prescaler(SYSCLK, 0), 0x3FF);

        let regs = I2cRegisters::with_status(0);
        let _i2c = SbI2c::new(&regs, I2cConfig { frequency: 20_000 }, SYSCLK);
        assert_eq!(regs.brmsb.read(), 1);
        assert_eq!(regs.brlsb.read(), 44);
    }

    #[test]
    fn test_write_acknowledged() {
        let regs = I2cRegisters::with_status(SR_TRRDY);
        let mut i2c = SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK);

        assert_eq!(i2c.write(0x1A, &[0x12, 0x34]), Ok(()));
        assert_eq!(regs.txdr.read(), 0x34);
        assert_eq!(regs.cmdr.read(), CMD_STO | CMD_CKSDIS);
    }

    #[test]
    fn test_probe_sends_shifted_address() {
        let regs = I2cRegisters::with_status(SR_TRRDY);
        let mut i2c = SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK);

        assert_eq!(i2c.probe(0x1A), Ok(()));
        assert_eq!(regs.txdr.read(), 0x34);
    }

    #[test]
    fn test_nack() {
        let regs = I2cRegisters::with_status(SR_TRRDY | SR_RARC);
        let mut i2c = SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK);

        assert_eq!(i2c.write(0x1A, &[0x00]), Err(I2cError::Nack));
    }

    #[test]
    fn test_overrun_resets_core() {
        let regs = I2cRegisters::with_status(SR_TRRDY | SR_RARC | SR_TROE);
        let mut i2c = SbI2c::new(&regs, I2cConfig { frequency: 20_000 }, SYSCLK);
        regs.brmsb.write(0xFF);

        assert_eq!(i2c.write(0x1A, &[0x00]), Err(I2cError::Overrun));
        assert_eq!(regs.brmsb.read(), 1);
    }

    #[test]
    fn test_timeout_still_sends_stop() {
        let regs = I2cRegisters::with_status(0);
        let mut i2c =
            SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK).with_budget(SpinBudget::new(8));

        assert_eq!(i2c.write(0x1A, &[0xAA, 0xBB]), Err(I2cError::Timeout));
        // Stopped at the first byte
        assert_eq!(regs.txdr.read(), 0x34);
        assert_eq!(regs.cmdr.read(), CMD_STO | CMD_CKSDIS);
    }

    #[test]
    fn test_activity_flag_dropped_after_error() {
        let gp = VolatileCell::new(0);
        let out = GpOut::new(&gp);
        let regs = I2cRegisters::with_status(0);
        let mut i2c = SbI2c::new(&regs, I2cConfig::STANDARD, SYSCLK)
            .with_budget(SpinBudget::new(2))
            .with_activity_flag(out.pin(0).unwrap());

        assert!(i2c.write(0x1A, &[]).is_err());
        assert_eq!(gp.get() & 1, 0);
    }
}
