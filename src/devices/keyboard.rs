//! PS/2 keyboard scan-code buffer.

use crate::mmio::{
    DeviceCore, MmioError, RegisterBus, RegisterMapPolicy, RegisterWindow, Serializer,
    SpinSerializer, StreamTarget,
};

crate::register_map! {
    pub mod regs: 4 {
        BUFFER @ 0x0 => ro(32),
    }
}

/// Read-only keyboard driver. The only register is the scan-code buffer.
pub struct Keyboard<B, S = SpinSerializer>
where
    B: RegisterBus,
    S: Serializer,
{
    window: RegisterWindow<B, RegisterMapPolicy<{ regs::WORDS }>, { regs::SPAN }>,
    core: DeviceCore<S>,
}

impl<B, S> Keyboard<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    pub fn attach(bus: B, serializer: S) -> Result<Self, MmioError> {
        let kbd = Self {
            window: RegisterWindow::new(bus, RegisterMapPolicy::new(regs::REGISTERS)),
            core: DeviceCore::new(serializer),
        };
        log::info!("keyboard attached");
        Ok(kbd)
    }

    /// Current contents of the scan-code buffer.
    pub fn scan_codes(&self) -> Result<u32, MmioError> {
        self.core.ensure_attached()?;
        self.window.read_reg(regs::BUFFER)
    }

    pub fn detach(&self) -> Result<(), MmioError> {
        self.core.retire(|| Ok(()))?;
        log::info!("keyboard detached");
        Ok(())
    }
}

impl<B, S> StreamTarget for Keyboard<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    const SPAN: usize = regs::SPAN;

    fn ensure_attached(&self) -> Result<(), MmioError> {
        self.core.ensure_attached()
    }

    fn read_word(&self, offset: usize) -> Result<u32, MmioError> {
        self.window.read(offset)
    }

    fn write_word(&self, _offset: usize, _value: u32) -> Result<(), MmioError> {
        Err(MmioError::NotWritable)
    }
}
