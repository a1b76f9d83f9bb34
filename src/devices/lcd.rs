//! Character LCD controller.
//!
//! The FPGA bridge exposes the display's bus as two registers: `data`
//! holds the byte to latch and `control` drives the enable and
//! register-select lines. Every byte is latched with a three-phase
//! handshake, each phase followed by [`SETTLE`]:
//!
//! ```text
//! data    <- byte
//! control <- strobe   (enable, plus register-select for display data)
//! control <- 0
//! ```
//!
//! A handshake is never interleaved with another one on the same device.

use core::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crate::mmio::{
    Attribute, AttributeTarget, Delay, DeviceCore, MmioError, Register, RegisterBus,
    RegisterMapPolicy, RegisterWindow, Serializer, SpinSerializer, StreamTarget, ValueFormat,
    helpers::cursor_offset,
};

crate::register_map! {
    /// LCD bridge register layout.
    pub mod regs: 8 {
        CONTROL @ 0x0 => rw(8),
        DATA @ 0x4 => rw(8),
    }
}

/// Settle time the controller needs after each bus transition.
pub const SETTLE: Duration = Duration::from_millis(5);

/// Visible columns; the text cursor never goes past this.
pub const COLUMNS: usize = 16;

const CTRL_ENABLE: u32 = 0x1;
const CTRL_REGISTER_SELECT: u32 = 0x4;

/// Kind of byte being latched, selecting the strobe pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Controller instruction (register-select low).
    Instruction,
    /// Character data (register-select high).
    Data,
}

impl Transfer {
    pub const fn strobe(self) -> u32 {
        match self {
            Transfer::Instruction => CTRL_ENABLE,
            Transfer::Data => CTRL_ENABLE | CTRL_REGISTER_SELECT,
        }
    }
}

/// Power-on configuration, in order.
pub const INIT_SEQUENCE: [(u8, Transfer); 5] = [
    // Function set: 8-bit bus, 2 lines, 5x8 font
    (0x38, Transfer::Instruction),
    // Display on, cursor on, blink on
    (0x0F, Transfer::Instruction),
    // Entry mode: increment, no display shift
    (0x06, Transfer::Instruction),
    // Clear display
    (0x01, Transfer::Instruction),
    // Return home
    (0x02, Transfer::Instruction),
];

/// Whether a transaction currently holds the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdState {
    Idle,
    Busy,
}

const ATTRIBUTES: &[Attribute] = &[
    Attribute::register(regs::CONTROL, ValueFormat::U8),
    Attribute::register(regs::DATA, ValueFormat::U8),
    Attribute::constant("columns", COLUMNS as u32),
    Attribute::constant("settle_ms", SETTLE.as_millis() as u32),
];

/// Character LCD driver.
///
/// # Type Parameters
/// - `B`: Bus carrying the control/data registers
/// - `D`: Settle delay provider
/// - `S`: Serializer guarding handshakes
pub struct Lcd<B, D, S = SpinSerializer>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    window: RegisterWindow<B, RegisterMapPolicy<{ regs::WORDS }>, { regs::SPAN }>,
    delay: D,
    core: DeviceCore<S>,
    busy: AtomicBool,
}

impl<B, D, S> Lcd<B, D, S>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    /// Takes ownership of the register window and initializes the display.
    ///
    /// The handle is only returned after the init sequence has completed,
    /// so no caller write can precede it.
    pub fn attach(bus: B, delay: D, serializer: S) -> Result<Self, MmioError> {
        let lcd = Self {
            window: RegisterWindow::new(bus, RegisterMapPolicy::new(regs::REGISTERS)),
            delay,
            core: DeviceCore::new(serializer),
            busy: AtomicBool::new(false),
        };
        lcd.initialize()?;
        log::info!("lcd attached");
        Ok(lcd)
    }

    /// Runs the power-on instruction sequence and clears both registers.
    ///
    /// Safe to repeat: the final register state is the same every time.
    pub fn initialize(&self) -> Result<(), MmioError> {
        self.core.serialized(|| {
            let _busy = BusyGuard::enter(&self.busy);
            self.window.write_reg(regs::CONTROL, 0)?;
            for (byte, transfer) in INIT_SEQUENCE {
                self.latch(byte, transfer)?;
            }
            self.window.write_reg(regs::DATA, 0)?;
            self.window.write_reg(regs::CONTROL, 0)
        })
    }

    /// Writes characters starting at display `column`.
    ///
    /// At most `COLUMNS - column` bytes are taken from the front of
    /// `bytes`; the count actually written is returned. A column at or past
    /// the end of the display is not an error and writes nothing.
    ///
    /// The bytes are copied out before the guard is taken, so an empty
    /// buffer fails with `TransferFailed` without touching the display.
    pub fn submit(&self, column: i64, bytes: &[u8]) -> Result<usize, MmioError> {
        self.core.ensure_attached()?;
        let column = cursor_offset(column)?;
        if column >= COLUMNS {
            log::warn!("lcd: cursor past end of display ({column})");
            return Ok(0);
        }

        let take = bytes.len().min(COLUMNS - column);
        let staged = heapless::Vec::<u8, COLUMNS>::from_slice(&bytes[..take])
            .map_err(|_| MmioError::TransferFailed)?;
        if staged.is_empty() {
            log::warn!("lcd: zero bytes copied from caller");
            return Err(MmioError::TransferFailed);
        }

        self.core.serialized(|| {
            let _busy = BusyGuard::enter(&self.busy);
            for &byte in &staged {
                self.latch(byte, Transfer::Data)?;
            }
            Ok(staged.len())
        })
    }

    /// Opens a column cursor at column 0.
    pub fn text_cursor(&self) -> TextCursor<'_, B, D, S> {
        TextCursor {
            lcd: self,
            column: 0,
        }
    }

    pub fn state(&self) -> LcdState {
        if self.busy.load(Ordering::Acquire) {
            LcdState::Busy
        } else {
            LcdState::Idle
        }
    }

    /// Detaches the device. Later calls fail with `DeviceGone`.
    pub fn detach(&self) -> Result<(), MmioError> {
        self.core.retire(|| Ok(()))?;
        log::info!("lcd detached");
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.core.is_attached()
    }

    /// One handshake. Caller holds the guard.
    fn latch(&self, byte: u8, transfer: Transfer) -> Result<(), MmioError> {
        log::trace!("lcd: latch {byte:#04x} as {transfer:?}");
        self.window.write_reg(regs::DATA, u32::from(byte))?;
        self.delay.delay(SETTLE);
        self.window.write_reg(regs::CONTROL, transfer.strobe())?;
        self.delay.delay(SETTLE);
        self.window.write_reg(regs::CONTROL, 0)?;
        self.delay.delay(SETTLE);
        Ok(())
    }
}

/// Marks the device busy for the lifetime of the guard.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stream-style text handle: writes advance a display column.
pub struct TextCursor<'a, B, D, S>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    lcd: &'a Lcd<B, D, S>,
    column: i64,
}

impl<B, D, S> TextCursor<'_, B, D, S>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    pub fn position(&self) -> i64 {
        self.column
    }

    pub fn seek(&mut self, column: i64) -> i64 {
        self.column = column;
        self.column
    }

    /// Writes as much of `bytes` as fits and advances by that amount.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, MmioError> {
        let written = self.lcd.submit(self.column, bytes)?;
        self.column += written as i64;
        Ok(written)
    }
}

/// Raw register access for tools that drive the bridge themselves.
impl<B, D, S> StreamTarget for Lcd<B, D, S>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    const SPAN: usize = regs::SPAN;

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

impl<B, D, S> AttributeTarget for Lcd<B, D, S>
where
    B: RegisterBus,
    D: Delay,
    S: Serializer,
{
    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
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
