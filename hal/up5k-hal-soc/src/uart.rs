//! ACIA serial console
//!
//! Polled 6850-style serial port. The baud rate is fixed in the gateware.

use up5k_hal::{SpinBudget, Timeout, UartRx, UartTx};

use crate::regs::AciaRegisters;

// Status bits
const STAT_RDRF: u8 = 0x01;
const STAT_TDRE: u8 = 0x02;

/// Transmit budget: a byte at 9600 baud is about 25k clocks at 24 MHz
const TX_BUDGET: SpinBudget = SpinBudget::new(100_000);

/// ACIA error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AciaError {
    /// The transmit register never emptied
    Timeout,
}

impl From<Timeout> for AciaError {
    fn from(_: Timeout) -> Self {
        AciaError::Timeout
    }
}

impl embedded_io::Error for AciaError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            AciaError::Timeout => embedded_io::ErrorKind::TimedOut,
        }
    }
}

/// Polled ACIA driver
pub struct Acia<'a> {
    regs: &'a AciaRegisters,
    budget: SpinBudget,
}

impl<'a> Acia<'a> {
    pub fn new(regs: &'a AciaRegisters) -> Self {
        Self {
            regs,
            budget: TX_BUDGET,
        }
    }

    /// Replace the transmit spin budget
    pub fn with_budget(mut self, budget: SpinBudget) -> Self {
        self.budget = budget;
        self
    }

    fn put(&mut self, byte: u8) -> Result<(), AciaError> {
        self.wait_tx_empty()?;
        self.regs.data.write(byte);
        Ok(())
    }

    fn wait_tx_empty(&self) -> Result<(), AciaError> {
        let status = &self.regs.ctlstat;
        self.budget.wait(|| status.is_set(STAT_TDRE))?;
        Ok(())
    }
}

impl UartTx for Acia<'_> {
    type Error = AciaError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), AciaError> {
        for &byte in data {
            self.put(byte)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AciaError> {
        self.wait_tx_empty()
    }
}

impl UartRx for Acia<'_> {
    type Error = AciaError;

    fn try_read_byte(&mut self) -> Result<Option<u8>, AciaError> {
        if self.regs.ctlstat.is_set(STAT_RDRF) {
            Ok(Some(self.regs.data.read()))
        } else {
            Ok(None)
        }
    }
}

impl embedded_io::ErrorType for Acia<'_> {
    type Error = AciaError;
}

impl embedded_io::Write for Acia<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, AciaError> {
        self.write_blocking(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), AciaError> {
        self.wait_tx_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Write;

    #[test]
    fn test_write_when_empty() {
        let regs = AciaRegisters::with_status(STAT_TDRE);
        let mut acia = Acia::new(&regs);

        acia.write_blocking(b"ok").unwrap();
        assert_eq!(regs.data.read(), b'k');
        assert_eq!(UartTx::flush(&mut acia), Ok(()));
    }

    #[test]
    fn test_write_times_out_when_full() {
        let regs = AciaRegisters::with_status(0);
        let mut acia = Acia::new(&regs).with_budget(SpinBudget::new(10));

        assert_eq!(acia.write_blocking(b"x"), Err(AciaError::Timeout));
        assert_eq!(regs.data.read(), 0);
    }

    #[test]
    fn test_embedded_io_write_all() {
        let regs = AciaRegisters::with_status(STAT_TDRE);
        let mut acia = Acia::new(&regs);

        acia.write_all(b"id\r\n").unwrap();
        assert_eq!(regs.data.read(), b'\n');
    }

    #[test]
    fn test_error_kind() {
        use embedded_io::Error;
        assert_eq!(AciaError::Timeout.kind(), embedded_io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_receive() {
        let regs = AciaRegisters::with_status(STAT_TDRE);
        let mut acia = Acia::new(&regs);
        assert_eq!(acia.try_read_byte(), Ok(None));

        regs.data.write(b'a');
        regs.ctlstat.write(STAT_RDRF | STAT_TDRE);
        assert_eq!(acia.try_read_byte(), Ok(Some(b'a')));
    }
}
