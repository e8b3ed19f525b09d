//! `gp_out` parallel output register
//!
//! One 32-bit write-only-in-spirit register drives every control line on the
//! board. [`GpOut`] hands out single bits ([`GpioBit`]) and bit fields
//! ([`GpioField`]) and tracks which bits are already claimed, so two drivers
//! never fight over the same line.

use core::cell::Cell;

use up5k_hal::OutputPin;
use vcell::VolatileCell;

/// Allocation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Bit index 32 or above, or a field running past bit 31
    OutOfRange,
    /// At least one requested bit is already claimed
    AlreadyAllocated,
}

/// Owner of the `gp_out` register
pub struct GpOut<'a> {
    reg: &'a VolatileCell<u32>,
    /// Bitmask of claimed bits
    allocated: Cell<u32>,
}

impl<'a> GpOut<'a> {
    /// Wrap the register; the current contents are kept
    pub fn new(reg: &'a VolatileCell<u32>) -> Self {
        Self {
            reg,
            allocated: Cell::new(0),
        }
    }

    /// Claim a single bit
    pub fn pin(&self, bit: u8) -> Result<GpioBit<'a>, GpioError> {
        let mask = self.claim(bit, 1)?;
        Ok(GpioBit {
            reg: self.reg,
            mask,
        })
    }

    /// Claim `width` adjacent bits starting at `shift`
    pub fn field(&self, shift: u8, width: u8) -> Result<GpioField<'a>, GpioError> {
        let mask = self.claim(shift, width)?;
        Ok(GpioField {
            reg: self.reg,
            shift,
            mask,
        })
    }

    /// Check if a bit is claimed
    pub fn is_allocated(&self, bit: u8) -> bool {
        if bit >= 32 {
            return false;
        }
        self.allocated.get() & (1 << bit) != 0
    }

    /// Raw register value
    pub fn read(&self) -> u32 {
        self.reg.get()
    }

    fn claim(&self, shift: u8, width: u8) -> Result<u32, GpioError> {
        if width == 0 || u32::from(shift) + u32::from(width) > 32 {
            return Err(GpioError::OutOfRange);
        }
        let mask = (u32::MAX >> (32 - u32::from(width))) << shift;
        if self.allocated.get() & mask != 0 {
            return Err(GpioError::AlreadyAllocated);
        }
        self.allocated.set(self.allocated.get() | mask);
        Ok(mask)
    }
}

/// One claimed `gp_out` bit
pub struct GpioBit<'a> {
    reg: &'a VolatileCell<u32>,
    mask: u32,
}

impl OutputPin for GpioBit<'_> {
    fn set_high(&mut self) {
        self.reg.set(self.reg.get() | self.mask);
    }

    fn set_low(&mut self) {
        self.reg.set(self.reg.get() & !self.mask);
    }

    fn is_set_high(&self) -> bool {
        self.reg.get() & self.mask != 0
    }
}

/// A claimed run of adjacent `gp_out` bits, written as one value
pub struct GpioField<'a> {
    reg: &'a VolatileCell<u32>,
    shift: u8,
    mask: u32,
}

impl GpioField<'_> {
    /// Replace the field with the low bits of `value`
    pub fn write(&mut self, value: u32) {
        let bits = (value << self.shift) & self.mask;
        self.reg.set((self.reg.get() & !self.mask) | bits);
    }

    /// Current field value
    pub fn read(&self) -> u32 {
        (self.reg.get() & self.mask) >> self.shift
    }
}
