//! Test support utilities - only compiled in test builds.

use core::time::Duration;
use std::{
    sync::{Arc, Mutex},
    vec::Vec,
};

use crate::mmio::{
    Access, AllowAllPolicy, Attribute, AttributeTarget, Delay, DeviceCore, MmioError, Register,
    RegisterBus, RegisterWindow, SimBus, SpinSerializer, StreamTarget, ValueFormat,
};

/// Simulated bus large enough for every window in the crate (64 bytes).
pub type TestBus = SimBus<16>;

/// Window over a fresh simulated bus with no access restrictions.
pub fn sim_window<const SPAN: usize>() -> RegisterWindow<TestBus, AllowAllPolicy, SPAN> {
    RegisterWindow::new(TestBus::new(), AllowAllPolicy::default())
}

/// One observable hardware interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Read(usize),
    Write(usize, u32),
    Delay(Duration),
}

/// Simulated bus that logs every register access and settle delay.
///
/// Clones share the same registers and log, so one clone can serve as the
/// bus and another as the delay provider of the same device.
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    regs: Arc<TestBus>,
    log: Arc<Mutex<Vec<BusEvent>>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<BusEvent> {
        self.log.lock().unwrap().clone()
    }

    /// Only the register writes, in order.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BusEvent::Write(offset, value) => Some((offset, value)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Current register value, without logging.
    pub fn peek(&self, offset: usize) -> u32 {
        self.regs.peek(offset)
    }

    /// Sets a register value from the hardware side, without logging.
    pub fn poke(&self, offset: usize, value: u32) {
        self.regs.poke(offset, value)
    }

    fn record(&self, event: BusEvent) {
        self.log.lock().unwrap().push(event);
    }
}

impl RegisterBus for RecordingBus {
    const CAPACITY: usize = TestBus::CAPACITY;

    fn read32(&self, offset: usize) -> u32 {
        self.record(BusEvent::Read(offset));
        self.regs.read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.record(BusEvent::Write(offset, value));
        self.regs.write32(offset, value)
    }
}

impl Delay for RecordingBus {
    fn delay(&self, duration: Duration) {
        self.record(BusEvent::Delay(duration));
    }
}

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay(&self, _duration: Duration) {}
}

/// Four plain read-write registers exercising the generic adapters.
pub struct ScratchTarget {
    window: RegisterWindow<TestBus, AllowAllPolicy, 16>,
    core: DeviceCore<SpinSerializer>,
}

impl ScratchTarget {
    const WORD0: Register = Register::new("word0", 0x0, Access::ReadWrite, u32::MAX);
    const WORD1: Register = Register::new("word1", 0x4, Access::ReadWrite, u32::MAX);
    const GO: Register = Register::new("go", 0x8, Access::WriteOnly, 1);
    const SMALL: Register = Register::new("small", 0xC, Access::ReadWrite, 0xFF);
    const STATUS: Register = Register::new("status", 0x0, Access::ReadOnly, u32::MAX);

    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute::register(Self::WORD0, ValueFormat::U32),
        Attribute::register(Self::WORD1, ValueFormat::U32),
        Attribute::trigger(Self::GO),
        Attribute::register(Self::SMALL, ValueFormat::U8),
        Attribute::register(Self::STATUS, ValueFormat::U32),
        Attribute::constant("scale", 1),
    ];

    pub fn with_words(words: [u32; 4]) -> Self {
        let window = sim_window::<16>();
        for (idx, word) in words.iter().enumerate() {
            window.bus().poke(idx * 4, *word);
        }
        Self {
            window,
            core: DeviceCore::new(SpinSerializer::new()),
        }
    }

    pub fn words(&self) -> [u32; 4] {
        core::array::from_fn(|idx| self.window.bus().peek(idx * 4))
    }

    pub fn detach(&self) {
        self.core.retire(|| Ok(())).unwrap();
    }
}

impl StreamTarget for ScratchTarget {
    const SPAN: usize = 16;

    fn ensure_attached(&self) -> Result<(), MmioError> {
        self.core.ensure_attached()
    }

    fn read_word(&self, offset: usize) -> Result<u32, MmioError> {
        self.window.read(offset)
    }

    fn write_word(&self, offset: usize, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.window.write(offset, value))
    }
}

impl AttributeTarget for ScratchTarget {
    fn attributes(&self) -> &'static [Attribute] {
        Self::ATTRIBUTES
    }

    fn ensure_attached(&self) -> Result<(), MmioError> {
        self.core.ensure_attached()
    }

    fn read_register(&self, reg: Register) -> Result<u32, MmioError> {
        self.window.read_reg(reg)
    }

    fn write_register(&self, reg: Register, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.window.write_reg(reg, value))
    }
}

/// Asserts that the result is a DeviceGone error.
pub fn assert_gone<T: core::fmt::Debug>(result: Result<T, MmioError>) {
    assert_eq!(result.unwrap_err(), MmioError::DeviceGone);
}
