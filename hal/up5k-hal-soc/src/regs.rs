//! Register block layouts
//!
//! The hard IP blocks decode a 4-bit register index on a 32-bit word
//! stride, with only the low byte of each word implemented.

use vcell::VolatileCell;

/// Base address of the `gp_out` register
pub const GP_OUT_ADDR: usize = 0x2000_0000;
/// Base address of the ACIA
pub const ACIA_ADDR: usize = 0x3000_0000;
/// Base address of SB_SPI0
pub const SPI0_ADDR: usize = 0x4000_0000;
/// Base address of SB_I2C0
pub const I2C0_ADDR: usize = 0x4000_0040;
/// Base address of SB_SPI1
pub const SPI1_ADDR: usize = 0x4000_0080;
/// Base address of SB_I2C1
pub const I2C1_ADDR: usize = 0x4000_00C0;
/// Address of the free-running clock counter
pub const CLKCNT_ADDR: usize = 0x5000_0000;

/// One byte-wide register on a word stride
#[repr(C)]
pub struct Reg8 {
    value: VolatileCell<u8>,
    _pad: [u8; 3],
}

impl Reg8 {
    /// A register holding `value`, for register blocks placed in RAM
    pub const fn new(value: u8) -> Self {
        Self {
            value: VolatileCell::new(value),
            _pad: [0; 3],
        }
    }

    #[inline]
    pub fn read(&self) -> u8 {
        self.value.get()
    }

    #[inline]
    pub fn write(&self, value: u8) {
        self.value.set(value)
    }

    #[inline]
    pub fn is_set(&self, mask: u8) -> bool {
        self.read() & mask != 0
    }
}

/// A reserved word in a register block
#[repr(C)]
pub struct Reserved([u8; 4]);

impl Reserved {
    pub const fn new() -> Self {
        Self([0; 4])
    }
}

/// SB_SPI register block (registers 8..15 of a 16-word window)
#[repr(C)]
pub struct SpiRegisters {
    _reserved: [Reserved; 8],
    /// Control 0: chip-select timing counters
    pub cr0: Reg8,
    /// Control 1: enable
    pub cr1: Reg8,
    /// Control 2: master mode, CS hold, clock polarity/phase, bit order
    pub cr2: Reg8,
    /// Baud rate divider
    pub br: Reg8,
    /// Status
    pub sr: Reg8,
    /// Transmit data
    pub txdr: Reg8,
    /// Receive data
    pub rxdr: Reg8,
    /// Master chip-select outputs (active low)
    pub csr: Reg8,
}

impl SpiRegisters {
    /// A register block in RAM with the given status value
    pub const fn with_status(sr: u8) -> Self {
        Self {
            _reserved: [
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
                Reserved::new(),
            ],
            cr0: Reg8::new(0),
            cr1: Reg8::new(0),
            cr2: Reg8::new(0),
            br: Reg8::new(0),
            sr: Reg8::new(sr),
            txdr: Reg8::new(0),
            rxdr: Reg8::new(0),
            csr: Reg8::new(0),
        }
    }
}

/// SB_I2C register block
#[repr(C)]
pub struct I2cRegisters {
    _reserved0: [Reserved; 3],
    /// Slave address
    pub saddr: Reg8,
    _reserved1: [Reserved; 2],
    /// Interrupt status
    pub irq: Reg8,
    /// Interrupt enable
    pub irqen: Reg8,
    /// Control 1: enable, SDA delay
    pub cr1: Reg8,
    /// Command
    pub cmdr: Reg8,
    /// Prescaler low 8 bits
    pub brlsb: Reg8,
    /// Prescaler high 2 bits (writing resets the core)
    pub brmsb: Reg8,
    /// Status
    pub sr: Reg8,
    /// Transmit data
    pub txdr: Reg8,
    /// Receive data
    pub rxdr: Reg8,
    /// General call data
    pub gcdr: Reg8,
}

impl I2cRegisters {
    /// A register block in RAM with the given status value
    pub const fn with_status(sr: u8) -> Self {
        Self {
            _reserved0: [Reserved::new(), Reserved::new(), Reserved::new()],
            saddr: Reg8::new(0),
            _reserved1: [Reserved::new(), Reserved::new()],
            irq: Reg8::new(0),
            irqen: Reg8::new(0),
            cr1: Reg8::new(0),
            cmdr: Reg8::new(0),
            brlsb: Reg8::new(0),
            brmsb: Reg8::new(0),
            sr: Reg8::new(sr),
            txdr: Reg8::new(0),
            rxdr: Reg8::new(0),
            gcdr: Reg8::new(0),
        }
    }
}

/// ACIA register block
#[repr(C)]
pub struct AciaRegisters {
    /// Control (write) / status (read)
    pub ctlstat: Reg8,
    /// Transmit (write) / receive (read) data
    pub data: Reg8,
}

impl AciaRegisters {
    /// A register block in RAM with the given status value
    pub const fn with_status(status: u8) -> Self {
        Self {
            ctlstat: Reg8::new(status),
            data: Reg8::new(0),
        }
    }
}

/// Which of the two hard IP instances to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    Port0,
    Port1,
}

impl Port {
    /// Port from its index, as written in the board configuration
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Port::Port0),
            1 => Some(Port::Port1),
            _ => None,
        }
    }
}

/// SB_SPI register block of `port`
///
/// # Safety
/// Only valid on the up5k_riscv SoC. The caller must not create a second
/// driver for the same port.
pub unsafe fn spi(port: Port) -> &'static SpiRegisters {
    let addr = match port {
        Port::Port0 => SPI0_ADDR,
        Port::Port1 => SPI1_ADDR,
    };
    &*(addr as *const SpiRegisters)
}

/// SB_I2C register block of `port`
///
/// # Safety
/// Only valid on the up5k_riscv SoC. The caller must not create a second
/// driver for the same port.
pub unsafe fn i2c(port: Port) -> &'static I2cRegisters {
    let addr = match port {
        Port::Port0 => I2C0_ADDR,
        Port::Port1 => I2C1_ADDR,
    };
    &*(addr as *const I2cRegisters)
}

/// ACIA register block
///
/// # Safety
/// Only valid on the up5k_riscv SoC.
pub unsafe fn acia() -> &'static AciaRegisters {
    &*(ACIA_ADDR as *const AciaRegisters)
}

/// `gp_out` register
///
/// # Safety
/// Only valid on the up5k_riscv SoC. The caller must not create a second
/// [`crate::GpOut`] for it.
pub unsafe fn gp_out() -> &'static VolatileCell<u32> {
    &*(GP_OUT_ADDR as *const VolatileCell<u32>)
}

/// Clock counter register
///
/// # Safety
/// Only valid on the up5k_riscv SoC.
pub unsafe fn clkcnt() -> &'static VolatileCell<u32> {
    &*(CLKCNT_ADDR as *const VolatileCell<u32>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn test_spi_layout() {
        assert_eq!(offset_of!(SpiRegisters, cr0), 0x20);
        assert_eq!(offset_of!(SpiRegisters, sr), 0x30);
        assert_eq!(offset_of!(SpiRegisters, txdr), 0x34);
        assert_eq!(offset_of!(SpiRegisters, csr), 0x3C);
        assert_eq!(size_of::<SpiRegisters>(), 0x40);
    }

    #[test]
    fn test_i2c_layout() {
        assert_eq!(offset_of!(I2cRegisters, saddr), 0x0C);
        assert_eq!(offset_of!(I2cRegisters, cr1), 0x20);
        assert_eq!(offset_of!(I2cRegisters, cmdr), 0x24);
        assert_eq!(offset_of!(I2cRegisters, sr), 0x30);
        assert_eq!(offset_of!(I2cRegisters, gcdr), 0x3C);
        assert_eq!(size_of::<I2cRegisters>(), 0x40);
    }

    #[test]
    fn test_acia_layout() {
        assert_eq!(offset_of!(AciaRegisters, data), 0x04);
    }

    #[test]
    fn test_port_from_index() {
        assert_eq!(Port::from_index(0), Some(Port::Port0));
        assert_eq!(Port::from_index(1), Some(Port::Port1));
        assert_eq!(Port::from_index(2), None);
    }
}
