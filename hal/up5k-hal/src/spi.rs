//! SPI transport abstractions
//!
//! The SoC's SPI cores are byte-at-a-time masters with software-controlled
//! chip-select. Drivers decide when chip-select is held across several bytes
//! (a burst), so the trait exposes chip-select separately from the data path.

/// Byte-oriented SPI master
///
/// All calls are synchronous: when a send returns `Ok`, the core has
/// accepted the byte. Implementations bound every wait and report an
/// exhausted wait through `Self::Error`.
pub trait SpiTransport {
    /// Error type for SPI operations
    type Error;

    /// Transmit one byte, discarding whatever is clocked in
    fn send_byte(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Transmit a buffer in order
    fn send_buffer(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    /// Transmit one byte and return the byte clocked in
    fn transfer(&mut self, value: u8) -> Result<u8, Self::Error>;

    /// Fill `buf` with bytes clocked in while transmitting `fill`
    fn read(&mut self, buf: &mut [u8], fill: u8) -> Result<(), Self::Error> {
        for byte in buf.iter_mut() {
            *byte = self.transfer(fill)?;
        }
        Ok(())
    }

    /// Assert (`true`) or release (`false`) the device's chip-select
    fn set_chip_select(&mut self, active: bool);

    /// Block until the core has finished shifting out the last byte
    fn wait_ready(&mut self) -> Result<(), Self::Error>;
}

impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    type Error = T::Error;

    fn send_byte(&mut self, value: u8) -> Result<(), Self::Error> {
        T::send_byte(self, value)
    }

    fn send_buffer(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::send_buffer(self, data)
    }

    fn transfer(&mut self, value: u8) -> Result<u8, Self::Error> {
        T::transfer(self, value)
    }

    fn read(&mut self, buf: &mut [u8], fill: u8) -> Result<(), Self::Error> {
        T::read(self, buf, fill)
    }

    fn set_chip_select(&mut self, active: bool) {
        T::set_chip_select(self, active)
    }

    fn wait_ready(&mut self) -> Result<(), Self::Error> {
        T::wait_ready(self)
    }
}

/// Run `f` with chip-select asserted, releasing it afterwards even on error
pub fn with_chip_select<S, T, E, F>(spi: &mut S, f: F) -> Result<T, E>
where
    S: SpiTransport + ?Sized,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    spi.set_chip_select(true);
    let result = f(spi);
    spi.set_chip_select(false);
    result
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 8_000_000, // sysclk / 3
            mode: Mode::Mode0,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Cs(bool),
        Tx(u8),
    }

    #[derive(Default)]
    struct LoopbackSpi {
        ops: Vec<Op>,
        fail_on: Option<u8>,
    }

    impl SpiTransport for LoopbackSpi {
        type Error = ();

        fn send_byte(&mut self, value: u8) -> Result<(), ()> {
            self.transfer(value).map(|_| ())
        }

        fn transfer(&mut self, value: u8) -> Result<u8, ()> {
            if self.fail_on == Some(value) {
                return Err(());
            }
            self.ops.push(Op::Tx(value));
            Ok(!value)
        }

        fn set_chip_select(&mut self, active: bool) {
            self.ops.push(Op::Cs(active));
        }

        fn wait_ready(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_buffer_in_order() {
        let mut spi = LoopbackSpi::default();
        spi.send_buffer(&[1, 2, 3]).unwrap();
        assert_eq!(spi.ops, [Op::Tx(1), Op::Tx(2), Op::Tx(3)]);
    }

    #[test]
    fn test_read_uses_fill_byte() {
        let mut spi = LoopbackSpi::default();
        let mut buf = [0u8; 2];
        spi.read(&mut buf, 0xFF).unwrap();
        assert_eq!(buf, [0x00, 0x00]);
        assert_eq!(spi.ops, [Op::Tx(0xFF), Op::Tx(0xFF)]);
    }

    #[test]
    fn test_chip_select_released_on_error() {
        let mut spi = LoopbackSpi {
            fail_on: Some(0x42),
            ..Default::default()
        };

        let result = with_chip_select(&mut spi, |s| s.send_buffer(&[0x41, 0x42, 0x43]));

        assert_eq!(result, Err(()));
        assert_eq!(spi.ops, [Op::Cs(true), Op::Tx(0x41), Op::Cs(false)]);
    }

    #[test]
    fn test_mode_split() {
        let (pol, pha): (Polarity, Phase) = Mode::Mode3.into();
        assert_eq!(pol, Polarity::IdleHigh);
        assert_eq!(pha, Phase::CaptureOnSecondTransition);
    }
}
