//! Clock counter delay
//!
//! `clkcnt` is a free-running 32-bit counter of system clocks. Delays spin on
//! the wrapping difference, split into chunks well below the wrap period.

use embedded_hal::delay::DelayNs;
use vcell::VolatileCell;

/// Largest wait measured against a single start value
const CHUNK: u32 = u32::MAX / 2;

/// Delay provider backed by the clock counter
pub struct ClockCounter<'a> {
    reg: &'a VolatileCell<u32>,
    sysclk_hz: u32,
}

impl<'a> ClockCounter<'a> {
    pub fn new(reg: &'a VolatileCell<u32>, sysclk_hz: u32) -> Self {
        Self { reg, sysclk_hz }
    }

    /// Current counter value
    #[inline]
    pub fn now(&self) -> u32 {
        self.reg.get()
    }

    /// Clocks elapsed since `start`, across one wrap
    #[inline]
    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }

    /// Clocks in `ns` nanoseconds, rounded up
    pub fn cycles_for_ns(&self, ns: u32) -> u64 {
        (u64::from(ns) * u64::from(self.sysclk_hz)).div_ceil(1_000_000_000)
    }

    /// Clocks in `ms` milliseconds
    pub fn cycles_for_ms(&self, ms: u32) -> u64 {
        u64::from(ms) * u64::from(self.sysclk_hz / 1000)
    }

    /// Spin for `cycles` system clocks
    pub fn wait_cycles(&self, mut cycles: u64) {
        while cycles > 0 {
            let chunk = cycles.min(u64::from(CHUNK)) as u32;
            let start = self.now();
            while self.elapsed_since(start) < chunk {
                core::hint::spin_loop();
            }
            cycles -= u64::from(chunk);
        }
    }
}

impl DelayNs for ClockCounter<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.wait_cycles(self.cycles_for_ns(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait_cycles(self.cycles_for_ms(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_math() {
        let reg = VolatileCell::new(0);
        let clk = ClockCounter::new(&reg, 24_000_000);

        assert_eq!(clk.cycles_for_ms(1), 24_000);
        assert_eq!(clk.cycles_for_ms(120), 2_880_000);
        assert_eq!(clk.cycles_for_ns(1_000), 24);
        // Rounded up so short delays are never skipped
        assert_eq!(clk.cycles_for_ns(1), 1);
        // A full-range millisecond delay does not overflow
        assert_eq!(clk.cycles_for_ms(u32::MAX), u64::from(u32::MAX) * 24_000);
    }

    #[test]
    fn test_elapsed_wraps() {
        let reg = VolatileCell::new(5);
        let clk = ClockCounter::new(&reg, 24_000_000);
        assert_eq!(clk.elapsed_since(u32::MAX - 4), 10);
    }

    #[test]
    fn test_zero_delay_returns() {
        let reg = VolatileCell::new(0);
        let mut clk = ClockCounter::new(&reg, 24_000_000);
        clk.delay_ns(0);
        clk.delay_ms(0);
    }
}
