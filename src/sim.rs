// ProxAlert - Simulated Hardware
//
// Stand-ins for every capability the controller drives. They back the host
// build of the firmware and the test suite. Each device appends what it was
// asked to do to a shared `Journal`, so a whole control-loop run can be
// inspected afterwards (or just logged, for long simulations).

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, NoAcknowledgeSource, Operation};

use crate::config::*;
use crate::events::Rgb;
use crate::hal::{AdcBoard, AdcChannel, BoardStatus, ToneGenerator};

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    Pin { name: &'static str, high: bool },
    Released(&'static str),
    ButtonRead(bool),
    ToneFrequency(u32),
    ToneStart(u8),
    ToneStop,
    BusWrite { addr: u8, bytes: Vec<u8> },
    BusFault { addr: u8 },
    Delay(u32),
    AdcRead(u16),
}

#[derive(Debug)]
struct JournalInner {
    traces: Vec<Trace>,
    recording: bool,
}

#[derive(Debug, Clone)]
pub struct Journal {
    inner: Rc<RefCell<JournalInner>>,
}

impl Default for Journal {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(JournalInner {
                traces: Vec::new(),
                recording: true,
            })),
        }
    }
}

impl Journal {
    /// A journal that only logs, for open-ended simulation runs.
    pub fn log_only() -> Self {
        let journal = Self::default();
        journal.inner.borrow_mut().recording = false;
        journal
    }

    pub fn record(&self, trace: Trace) {
        log::trace!("sim: {:?}", trace);
        let mut inner = self.inner.borrow_mut();
        if inner.recording {
            inner.traces.push(trace);
        }
    }

    pub fn traces(&self) -> Vec<Trace> {
        self.inner.borrow().traces.clone()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().traces.clear();
    }

    pub fn bus_writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.inner
            .borrow()
            .traces
            .iter()
            .filter_map(|t| match t {
                Trace::BusWrite { addr, bytes } => Some((*addr, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.inner
            .borrow()
            .traces
            .iter()
            .filter_map(|t| match t {
                Trace::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn total_delay_ms(&self) -> u64 {
        self.delays_ms().into_iter().map(u64::from).sum()
    }

    /// Last level written to the named pin.
    pub fn pin_level(&self, name: &str) -> Option<bool> {
        self.inner.borrow().traces.iter().rev().find_map(|t| match t {
            Trace::Pin { name: n, high } if *n == name => Some(*high),
            _ => None,
        })
    }

    /// What the character display shows, replayed from the bus traffic.
    pub fn lcd_rows(&self) -> [String; 2] {
        let mut rows = [String::new(), String::new()];
        let mut row = 0;
        for (addr, bytes) in self.bus_writes() {
            if addr != I2C_ADDR_LCD {
                continue;
            }
            match bytes.as_slice() {
                [LCD_MODE_COMMAND, LCD_CMD_CLEAR] => {
                    rows = [String::new(), String::new()];
                    row = 0;
                }
                [LCD_MODE_COMMAND, LCD_CMD_ROW_1] => row = 1,
                [LCD_MODE_DATA, byte] => rows[row].push(char::from(*byte)),
                _ => {}
            }
        }
        rows
    }

    /// Last color fully written to the backlight controller.
    pub fn backlight(&self) -> Option<Rgb> {
        let mut pending = Rgb::default();
        let mut shown = None;
        for (addr, bytes) in self.bus_writes() {
            if addr != I2C_ADDR_RGB {
                continue;
            }
            match bytes.as_slice() {
                [RGB_REG_RED, v] => pending.r = *v,
                [RGB_REG_GREEN, v] => pending.g = *v,
                [RGB_REG_BLUE, v] => {
                    pending.b = *v;
                    shown = Some(pending);
                }
                _ => {}
            }
        }
        shown
    }
}

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------
pub struct SimPin {
    journal: Journal,
    name: &'static str,
}

impl SimPin {
    pub fn new(journal: &Journal, name: &'static str) -> Self {
        Self {
            journal: journal.clone(),
            name,
        }
    }
}

impl digital::ErrorType for SimPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Trace::Pin { name: self.name, high: false });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Trace::Pin { name: self.name, high: true });
        Ok(())
    }
}

impl Drop for SimPin {
    fn drop(&mut self) {
        self.journal.record(Trace::Released(self.name));
    }
}

enum ButtonScript {
    Levels {
        levels: VecDeque<bool>,
        stop: Option<Arc<AtomicBool>>,
    },
    Periodic {
        period: u32,
        reads: u32,
    },
}

/// Push-button with a pull-down: reads HIGH while pressed.
pub struct SimButton {
    journal: Journal,
    script: ButtonScript,
}

impl SimButton {
    /// Never pressed.
    pub fn released(journal: &Journal) -> Self {
        Self::scripted(journal, Vec::new())
    }

    /// Returns `levels` one read at a time, then LOW forever.
    pub fn scripted(journal: &Journal, levels: impl IntoIterator<Item = bool>) -> Self {
        Self {
            journal: journal.clone(),
            script: ButtonScript::Levels {
                levels: levels.into_iter().collect(),
                stop: None,
            },
        }
    }

    /// Raise `stop` on the first read after the script runs out.
    pub fn then_stop(mut self, flag: &Arc<AtomicBool>) -> Self {
        if let ButtonScript::Levels { stop, .. } = &mut self.script {
            *stop = Some(Arc::clone(flag));
        }
        self
    }

    /// Pressed for one read out of every `period`.
    pub fn periodic(journal: &Journal, period: u32) -> Self {
        Self {
            journal: journal.clone(),
            script: ButtonScript::Periodic {
                period: period.max(1),
                reads: 0,
            },
        }
    }

    fn next_level(&mut self) -> bool {
        match &mut self.script {
            ButtonScript::Levels { levels, stop } => match levels.pop_front() {
                Some(level) => level,
                None => {
                    if let Some(flag) = stop {
                        flag.store(true, Ordering::SeqCst);
                    }
                    false
                }
            },
            ButtonScript::Periodic { period, reads } => {
                *reads += 1;
                *reads % *period == 0
            }
        }
    }
}

impl digital::ErrorType for SimButton {
    type Error = digital::ErrorKind;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self.next_level();
        self.journal.record(Trace::ButtonRead(level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ---------------------------------------------------------------------------
// PWM tone generator
// ---------------------------------------------------------------------------
pub struct SimTone {
    journal: Journal,
    failing: bool,
}

impl SimTone {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            failing: false,
        }
    }

    /// Every call errors and nothing is recorded.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing {
            bail!("simulated PWM fault");
        }
        Ok(())
    }
}

impl ToneGenerator for SimTone {
    fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()> {
        self.check()?;
        self.journal.record(Trace::ToneFrequency(hz));
        Ok(())
    }

    fn start(&mut self, duty_percent: u8) -> anyhow::Result<()> {
        self.check()?;
        self.journal.record(Trace::ToneStart(duty_percent));
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.check()?;
        self.journal.record(Trace::ToneStop);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------
/// Accepts every write; reads are answered from a register map, and only
/// addresses with at least one register acknowledge a read.
pub struct SimI2c {
    journal: Journal,
    registers: BTreeMap<(u8, u8), u8>,
    failing: Vec<u8>,
}

impl SimI2c {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            registers: BTreeMap::new(),
            failing: Vec::new(),
        }
    }

    pub fn with_register(mut self, addr: u8, reg: u8, value: u8) -> Self {
        self.registers.insert((addr, reg), value);
        self
    }

    /// Every transfer to `addr` fails with a NACK.
    pub fn failing(mut self, addr: u8) -> Self {
        self.failing.push(addr);
        self
    }

    fn present(&self, addr: u8) -> bool {
        self.registers.keys().any(|(a, _)| *a == addr)
    }
}

impl i2c::ErrorType for SimI2c {
    type Error = i2c::ErrorKind;
}

impl i2c::I2c for SimI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.failing.contains(&address) {
            self.journal.record(Trace::BusFault { addr: address });
            return Err(i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pointer: u8 = 0;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some(reg) = bytes.first() {
                        pointer = *reg;
                    }
                    self.journal.record(Trace::BusWrite {
                        addr: address,
                        bytes: bytes.to_vec(),
                    });
                }
                Operation::Read(buf) => {
                    if !self.present(address) {
                        return Err(i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
                    }
                    for slot in buf.iter_mut() {
                        *slot = self.registers.get(&(address, pointer)).copied().unwrap_or(0);
                        pointer = pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ADC board
// ---------------------------------------------------------------------------
pub struct SimBoard {
    journal: Journal,
    samples: Vec<u16>,
    next: usize,
    failed_begins: u32,
}

impl SimBoard {
    /// Reads cycle through `samples`; an empty list makes every read fail.
    pub fn new(journal: &Journal, samples: impl IntoIterator<Item = u16>) -> Self {
        Self {
            journal: journal.clone(),
            samples: samples.into_iter().collect(),
            next: 0,
            failed_begins: 0,
        }
    }

    /// `begin` reports the board missing this many times before succeeding.
    pub fn failing_begins(mut self, count: u32) -> Self {
        self.failed_begins = count;
        self
    }
}

impl AdcBoard for SimBoard {
    fn detect(&mut self) -> Vec<u8> {
        vec![I2C_ADDR_ADC_BOARD_DEFAULT]
    }

    fn begin(&mut self) -> BoardStatus {
        if self.failed_begins > 0 {
            self.failed_begins -= 1;
            return BoardStatus::DeviceNotDetected;
        }
        BoardStatus::Ok
    }

    fn enable_adc(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn read_channel(&mut self, channel: AdcChannel) -> anyhow::Result<u16> {
        if self.samples.is_empty() {
            bail!("no signal on {:?}", channel);
        }
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        self.journal.record(Trace::AdcRead(value));
        Ok(value)
    }
}

/// Raw samples for an object approaching from ~100 cm to touching, then
/// backing off. Coarse steps far out, 10-count steps below 100 so every
/// severity band is crossed.
pub fn approach_and_retreat() -> Vec<u16> {
    let far = (100..=500u16).rev().step_by(50);
    let near = (0..100u16).rev().step_by(10);
    let approach: Vec<u16> = far.chain(near).collect();
    let retreat = approach.iter().rev().skip(1).copied();
    approach.iter().copied().chain(retreat).collect()
}

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------
pub struct SimDelay {
    journal: Journal,
    realtime: bool,
}

impl SimDelay {
    /// Records delays without sleeping.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            realtime: false,
        }
    }

    /// Records delays and actually sleeps for them.
    pub fn realtime(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            realtime: true,
        }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.journal.record(Trace::Delay(ns / 1_000_000));
        if self.realtime {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.journal.record(Trace::Delay(ms));
        if self.realtime {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}
