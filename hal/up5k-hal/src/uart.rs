//! UART serial communication abstractions
//!
//! Polled serial console. Transmit blocks until every byte is accepted;
//! receive never blocks and reports an empty receiver as `None`.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Take one received byte, if any is waiting
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Read as many waiting bytes as fit in `buf`
    ///
    /// Returns the number of bytes stored; stops at the first empty poll.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.try_read_byte()? {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        pending: &'static [u8],
    }

    impl UartRx for Scripted {
        type Error = ();

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            match self.pending.split_first() {
                Some((&first, rest)) => {
                    self.pending = rest;
                    Ok(Some(first))
                }
                None => Ok(None),
            }
        }
    }

    #[test]
    fn test_read_available_stops_when_empty() {
        let mut rx = Scripted { pending: b"ok" };
        let mut buf = [0u8; 8];
        assert_eq!(rx.read_available(&mut buf), Ok(2));
        assert_eq!(&buf[..2], b"ok");
        assert_eq!(rx.read_available(&mut buf), Ok(0));
    }

    #[test]
    fn test_read_available_respects_buffer() {
        let mut rx = Scripted { pending: b"hello" };
        let mut buf = [0u8; 3];
        assert_eq!(rx.read_available(&mut buf), Ok(3));
        assert_eq!(&buf, b"hel");
    }
}
