//! Recording fakes for the SPI transport, control pins and delay
//!
//! Every fake writes into one shared log, so tests see the interleaving of
//! select-line changes, chip-select edges, bytes and delays exactly as the
//! panel would.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use up5k_hal::{OutputPin, SpiTransport};

use crate::protocol::{cmd, Ili9341};
use crate::raster::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Raw bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Command/data select: `true` is data
    Dc(bool),
    /// Reset line level
    Reset(bool),
    /// Chip-select: `true` is asserted
    Cs(bool),
    Tx(u8),
    Delay(u32),
}

/// Bus events grouped into controller transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Reset(bool),
    Delay(u32),
    Command(u8, Vec<u8>),
    /// Data burst following RAMWR
    Burst(Vec<u8>),
}

/// Transactions with address windows and pixels decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    Window(Window),
    Pixels(Vec<u16>),
    Other(Op),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    fail_after: Option<usize>,
    sent: usize,
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<State>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }

    /// Fail every byte after the first `n`
    pub fn fail_after(&self, n: usize) {
        let mut state = self.0.borrow_mut();
        state.fail_after = Some(n);
        state.sent = 0;
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay { log: self.clone() }
    }

    pub fn ops(&self) -> Vec<Op> {
        let mut ops: Vec<Op> = Vec::new();
        let mut dc = false;
        let mut burst: Option<(bool, Vec<u8>)> = None;

        for event in self.events() {
            match event {
                Event::Dc(level) => dc = level,
                Event::Reset(level) => ops.push(Op::Reset(level)),
                Event::Delay(ms) => ops.push(Op::Delay(ms)),
                Event::Cs(true) => burst = Some((dc, Vec::new())),
                Event::Tx(byte) => {
                    let (_, bytes) = burst.as_mut().expect("byte sent without chip-select");
                    bytes.push(byte);
                }
                Event::Cs(false) => {
                    let (is_data, bytes) = burst.take().expect("chip-select released twice");
                    if bytes.is_empty() {
                        continue;
                    }
                    if !is_data {
                        ops.extend(bytes.into_iter().map(|b| Op::Command(b, Vec::new())));
                        continue;
                    }
                    match ops.last_mut() {
                        Some(Op::Command(opcode, params)) if *opcode != cmd::RAMWR => {
                            params.extend(bytes)
                        }
                        _ => ops.push(Op::Burst(bytes)),
                    }
                }
            }
        }
        ops
    }

    pub fn draws(&self) -> Vec<Draw> {
        let ops = self.ops();
        let mut draws = Vec::new();
        let mut i = 0;

        while i < ops.len() {
            if let Some(window) = decode_window(&ops[i..]) {
                draws.push(Draw::Window(window));
                i += 3;
                continue;
            }
            match &ops[i] {
                Op::Burst(bytes) => draws.push(Draw::Pixels(
                    bytes
                        .chunks(2)
                        .map(|p| u16::from_be_bytes([p[0], p[1]]))
                        .collect(),
                )),
                other => draws.push(Draw::Other(other.clone())),
            }
            i += 1;
        }
        draws
    }

    /// Windows programmed, in order
    pub fn windows(&self) -> Vec<Window> {
        self.draws()
            .into_iter()
            .filter_map(|d| match d {
                Draw::Window(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    /// Every pixel streamed, bursts concatenated
    pub fn pixels(&self) -> Vec<u16> {
        self.draws()
            .into_iter()
            .filter_map(|d| match d {
                Draw::Pixels(p) => Some(p),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Number of pixel bursts
    pub fn bursts(&self) -> usize {
        self.draws()
            .iter()
            .filter(|d| matches!(d, Draw::Pixels(_)))
            .count()
    }

    /// Raw bytes of every data burst, concatenated
    pub fn burst_bytes(&self) -> Vec<u8> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Burst(b) => Some(b),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

fn decode_window(ops: &[Op]) -> Option<Window> {
    match ops {
        [Op::Command(cmd::CASET, x), Op::Command(cmd::RASET, y), Op::Command(cmd::RAMWR, end), ..]
            if x.len() == 4 && y.len() == 4 && end.is_empty() =>
        {
            Some(Window {
                x0: u16::from_be_bytes([x[0], x[1]]),
                x1: u16::from_be_bytes([x[2], x[3]]),
                y0: u16::from_be_bytes([y[0], y[1]]),
                y1: u16::from_be_bytes([y[2], y[3]]),
            })
        }
        _ => None,
    }
}

pub struct MockSpi {
    log: Log,
}

impl SpiTransport for MockSpi {
    type Error = MockError;

    fn send_byte(&mut self, value: u8) -> Result<(), MockError> {
        {
            let mut state = self.log.0.borrow_mut();
            if let Some(limit) = state.fail_after {
                if state.sent >= limit {
                    return Err(MockError);
                }
            }
            state.sent += 1;
        }
        self.log.push(Event::Tx(value));
        Ok(())
    }

    fn transfer(&mut self, value: u8) -> Result<u8, MockError> {
        self.send_byte(value).map(|()| 0)
    }

    fn set_chip_select(&mut self, active: bool) {
        self.log.push(Event::Cs(active));
    }

    fn wait_ready(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Line {
    Dc,
    Reset,
}

pub struct MockPin {
    log: Log,
    line: Line,
    high: bool,
}

impl MockPin {
    fn record(&self) {
        self.log.push(match self.line {
            Line::Dc => Event::Dc(self.high),
            Line::Reset => Event::Reset(self.high),
        });
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.record();
    }

    fn set_low(&mut self) {
        self.high = false;
        self.record();
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub struct MockDelay {
    log: Log,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(ns.div_ceil(1_000_000)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}

pub type MockDisplay = Ili9341<MockSpi, MockPin, MockPin>;

/// A display wired to fresh fakes, and their shared log
pub fn display() -> (MockDisplay, Log) {
    let log = Log::default();
    let spi = MockSpi { log: log.clone() };
    let dc = MockPin {
        log: log.clone(),
        line: Line::Dc,
        high: false,
    };
    let rst = MockPin {
        log: log.clone(),
        line: Line::Reset,
        high: false,
    };
    (Ili9341::new(spi, dc, rst), log)
}
