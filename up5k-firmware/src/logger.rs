//! defmt transport over the ACIA
//!
//! The board has no debug probe, so defmt frames go out the serial console
//! and are decoded on the host with `defmt-print`.
//!
//! The SoC never enables interrupts, which makes the critical section a
//! no-op: nothing can preempt the single hart.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_io::Write;
use up5k_hal_soc::{regs, Acia};

struct NoInterrupts;

critical_section::set_impl!(NoInterrupts);

// SAFETY: no interrupt source is ever enabled on this SoC and there is one
// hart, so code between acquire and release cannot be preempted
unsafe impl critical_section::Impl for NoInterrupts {
    unsafe fn acquire() -> critical_section::RawRestoreState {}

    unsafe fn release(_restore: critical_section::RawRestoreState) {}
}

#[defmt::global_logger]
struct Logger;

/// Encoder state, only touched between `acquire` and `release`
struct State {
    encoder: UnsafeCell<defmt::Encoder>,
    restore: UnsafeCell<critical_section::RestoreState>,
}

// SAFETY: every access happens inside the logger's critical section
unsafe impl Sync for State {}

static TAKEN: AtomicBool = AtomicBool::new(false);

static STATE: State = State {
    encoder: UnsafeCell::new(defmt::Encoder::new()),
    restore: UnsafeCell::new(critical_section::RestoreState::invalid()),
};

// SAFETY: defmt serializes acquire/write/flush/release per its contract and
// TAKEN rejects reentrant use
unsafe impl defmt::Logger for Logger {
    fn acquire() {
        // SAFETY: paired with the release in `release`
        let restore = unsafe { critical_section::acquire() };

        if TAKEN.load(Ordering::Relaxed) {
            panic!("defmt logger taken reentrantly");
        }
        TAKEN.store(true, Ordering::Relaxed);

        // SAFETY: inside the critical section
        unsafe {
            *STATE.restore.get() = restore;
            (*STATE.encoder.get()).start_frame(write);
        }
    }

    unsafe fn flush() {}

    unsafe fn release() {
        (*STATE.encoder.get()).end_frame(write);
        TAKEN.store(false, Ordering::Relaxed);
        critical_section::release(*STATE.restore.get());
    }

    unsafe fn write(bytes: &[u8]) {
        (*STATE.encoder.get()).write(bytes, write);
    }
}

/// Push encoded bytes to the console
///
/// A console that stops draining drops the rest of the frame.
fn write(bytes: &[u8]) {
    // SAFETY: the ACIA is only written from the logger
    let mut acia = Acia::new(unsafe { regs::acia() });
    let _ = acia.write_all(bytes);
}
