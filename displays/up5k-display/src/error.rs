//! Display errors

/// Display error
///
/// The controller has no readback path on this board, so the only failure
/// the display layer can observe is the transport's. It is handed back
/// unchanged and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Transport error while sending to the controller
    Transport(E),
}
