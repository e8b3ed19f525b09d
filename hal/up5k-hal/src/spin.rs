//! Bounded busy-wait polling
//!
//! The hard IP blocks on the SoC only expose status flags, so every transfer
//! waits by polling. A [`SpinBudget`] caps the number of polls; running out
//! yields [`Timeout`] to the caller instead of spinning forever.

/// A polled condition did not become true within its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

/// Maximum number of polls allowed for a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpinBudget {
    polls: u32,
}

impl SpinBudget {
    /// Budget used by the I2C core between bytes
    pub const I2C_BYTE: Self = Self::new(3000);

    /// Budget used by the SPI core per byte
    pub const SPI_BYTE: Self = Self::new(10_000);

    /// Create a budget allowing `polls` status reads
    pub const fn new(polls: u32) -> Self {
        Self { polls }
    }

    /// Number of polls this budget allows
    pub const fn polls(&self) -> u32 {
        self.polls
    }

    /// Poll `ready` until it returns true or the budget is spent
    ///
    /// A zero budget still polls once.
    pub fn wait<F>(self, mut ready: F) -> Result<(), Timeout>
    where
        F: FnMut() -> bool,
    {
        let mut remaining = self.polls.max(1);
        while remaining > 0 {
            if ready() {
                return Ok(());
            }
            remaining -= 1;
            core::hint::spin_loop();
        }
        Err(Timeout)
    }
}

impl Default for SpinBudget {
    fn default() -> Self {
        Self::SPI_BYTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_immediately() {
        let mut polls = 0;
        let result = SpinBudget::new(5).wait(|| {
            polls += 1;
            true
        });
        assert_eq!(result, Ok(()));
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_ready_after_some_polls() {
        let mut polls = 0;
        let result = SpinBudget::new(10).wait(|| {
            polls += 1;
            polls == 4
        });
        assert_eq!(result, Ok(()));
        assert_eq!(polls, 4);
    }

    #[test]
    fn test_budget_exhausted() {
        let mut polls = 0;
        let result = SpinBudget::new(7).wait(|| {
            polls += 1;
            false
        });
        assert_eq!(result, Err(Timeout));
        assert_eq!(polls, 7);
    }

    #[test]
    fn test_zero_budget_polls_once() {
        let mut polls = 0;
        assert_eq!(
            SpinBudget::new(0).wait(|| {
                polls += 1;
                false
            }),
            Err(Timeout)
        );
        assert_eq!(polls, 1);
    }
}
