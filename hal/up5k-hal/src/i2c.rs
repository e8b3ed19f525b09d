//! I2C bus abstractions
//!
//! The firmware only ever writes to I2C peripherals, so the bus trait is
//! limited to master writes. A transfer is one START, the address byte, the
//! data bytes and one STOP.

/// I2C bus master
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Send `data` to the device at 7-bit `address`
    ///
    /// Implementations issue STOP even when the transfer fails, so the bus
    /// is idle again when this returns.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Address a device without sending data
    ///
    /// Returns `Ok(())` if the device acknowledged its address.
    fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        self.write(address, &[])
    }
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        B::write(self, address, data)
    }
}

/// I2C bus timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// SCL frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self::new(100_000);

    /// SCL at `frequency` Hz; the SB_I2C block is rated up to 400 kHz
    pub const fn new(frequency: u32) -> Self {
        Self { frequency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl I2cBus for Recorder {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            if address > 0x7F {
                return Err(());
            }
            self.writes.push((address, data.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_probe_sends_address_only() {
        let mut bus = Recorder::default();
        assert_eq!(bus.probe(0x1A), Ok(()));
        assert_eq!(bus.writes, [(0x1A, Vec::new())]);
    }

    fn heartbeat<B: I2cBus>(mut bus: B, count: u16) -> Result<(), B::Error> {
        bus.write(0x1A, &count.to_le_bytes())
    }

    #[test]
    fn test_write_through_reference() {
        let mut bus = Recorder::default();
        heartbeat(&mut bus, 0x0102).unwrap();
        heartbeat(&mut bus, 3).unwrap();
        assert_eq!(
            bus.writes,
            [(0x1A, std::vec![0x02, 0x01]), (0x1A, std::vec![0x03, 0x00])]
        );
    }

    #[test]
    fn test_default_is_standard_mode() {
        assert_eq!(I2cConfig::default(), I2cConfig::STANDARD);
        assert_eq!(I2cConfig::new(400_000).frequency, 400_000);
    }
}
