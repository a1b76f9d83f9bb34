//! Eight-channel ADC.
//!
//! Conversion results live in a read-only data window; conversions are
//! controlled through a separate window of write-only registers. The
//! auto-update flag cannot be read back from hardware, so the driver keeps
//! a software copy that is only changed under the device guard, together
//! with the hardware write.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::mmio::{
    Attribute, AttributeTarget, DeviceCore, MmioError, Register, RegisterBus, RegisterMapPolicy,
    RegisterWindow, Serializer, SpinSerializer, StreamTarget, ValueFormat,
};

crate::register_map! {
    /// Conversion results, 12 bits per channel.
    pub mod channels: 32 {
        CH0_RAW @ 0x00 => ro(12),
        CH1_RAW @ 0x04 => ro(12),
        CH2_RAW @ 0x08 => ro(12),
        CH3_RAW @ 0x0C => ro(12),
        CH4_RAW @ 0x10 => ro(12),
        CH5_RAW @ 0x14 => ro(12),
        CH6_RAW @ 0x18 => ro(12),
        CH7_RAW @ 0x1C => ro(12),
    }
}

crate::register_map! {
    /// Conversion control.
    pub mod control: 8 {
        UPDATE @ 0x0 => wo(1),
        AUTO_UPDATE @ 0x4 => wo(1),
    }
}

/// Bits of a channel register that carry the conversion result.
pub const VALUE_MASK: u32 = 0xFFF;

/// Millivolts per count.
pub const VOLTAGE_SCALE_MV: u32 = 1;

const ATTRIBUTES: &[Attribute] = &[
    Attribute::trigger(control::UPDATE),
    Attribute::shadow(control::AUTO_UPDATE, ValueFormat::Bool),
    Attribute::register(channels::CH0_RAW, ValueFormat::U32),
    Attribute::register(channels::CH1_RAW, ValueFormat::U32),
    Attribute::register(channels::CH2_RAW, ValueFormat::U32),
    Attribute::register(channels::CH3_RAW, ValueFormat::U32),
    Attribute::register(channels::CH4_RAW, ValueFormat::U32),
    Attribute::register(channels::CH5_RAW, ValueFormat::U32),
    Attribute::register(channels::CH6_RAW, ValueFormat::U32),
    Attribute::register(channels::CH7_RAW, ValueFormat::U32),
    Attribute::constant("voltage_scale_mv", VOLTAGE_SCALE_MV),
];

/// ADC driver.
pub struct Adc<B, S = SpinSerializer>
where
    B: RegisterBus,
    S: Serializer,
{
    data: RegisterWindow<B, RegisterMapPolicy<{ channels::WORDS }>, { channels::SPAN }>,
    control: RegisterWindow<B, RegisterMapPolicy<{ control::WORDS }>, { control::SPAN }>,
    core: DeviceCore<S>,
    auto_update: AtomicBool,
}

impl<B, S> Adc<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    /// Takes ownership of both windows and turns auto-update off so the
    /// software copy matches the hardware.
    pub fn attach(data_bus: B, control_bus: B, serializer: S) -> Result<Self, MmioError> {
        let adc = Self {
            data: RegisterWindow::new(data_bus, RegisterMapPolicy::new(channels::REGISTERS)),
            control: RegisterWindow::new(control_bus, RegisterMapPolicy::new(control::REGISTERS)),
            core: DeviceCore::new(serializer),
            auto_update: AtomicBool::new(false),
        };
        adc.set_auto_update(false)?;
        log::info!("adc attached");
        Ok(adc)
    }

    /// Latest conversion result for `channel` (0..8).
    pub fn read_channel(&self, channel: usize) -> Result<u32, MmioError> {
        self.core.ensure_attached()?;
        let reg = channels::REGISTERS
            .get(channel)
            .copied()
            .ok_or(MmioError::InvalidOffset)?;
        self.data.read_reg(reg)
    }

    /// Starts a new round of conversions.
    pub fn trigger_update(&self) -> Result<(), MmioError> {
        self.core
            .serialized(|| self.control.write_reg(control::UPDATE, 1))
    }

    pub fn set_auto_update(&self, enabled: bool) -> Result<(), MmioError> {
        self.core.serialized(|| {
            self.control
                .write_reg(control::AUTO_UPDATE, u32::from(enabled))?;
            self.auto_update.store(enabled, Ordering::Release);
            Ok(())
        })
    }

    /// Last auto-update setting written.
    pub fn auto_update(&self) -> Result<bool, MmioError> {
        self.core.ensure_attached()?;
        Ok(self.auto_update.load(Ordering::Acquire))
    }

    pub fn detach(&self) -> Result<(), MmioError> {
        self.core.retire(|| Ok(()))?;
        log::info!("adc detached");
        Ok(())
    }
}

/// Reads come from the channel window; writes go to the control window and
/// stop short of `AUTO_UPDATE`.
impl<B, S> StreamTarget for Adc<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    const SPAN: usize = channels::SPAN;
    const WRITABLE_END: usize = control::AUTO_UPDATE.offset;

    fn ensure_attached(&self) -> Result<(), MmioError> {
        self.core.ensure_attached()
    }

    fn read_word(&self, offset: usize) -> Result<u32, MmioError> {
        self.data.read(offset).map(|value| value & VALUE_MASK)
    }

    fn write_word(&self, offset: usize, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.control.write(offset, value))
    }
}

impl<B, S> AttributeTarget for Adc<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn ensure_attached(&self) -> Result<(), MmioError> {
        self.core.ensure_attached()
    }

    fn read_register(&self, reg: Register) -> Result<u32, MmioError> {
        self.data.read_reg(reg)
    }

    fn write_register(&self, reg: Register, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.control.write_reg(reg, value))
    }

    fn read_shadow(&self, reg: Register) -> Result<u32, MmioError> {
        if reg != control::AUTO_UPDATE {
            return Err(MmioError::NotReadable);
        }
        self.auto_update().map(u32::from)
    }

    fn write_shadow(&self, reg: Register, value: u32) -> Result<(), MmioError> {
        if reg != control::AUTO_UPDATE {
            return Err(MmioError::NotWritable);
        }
        self.set_auto_update(value != 0)
    }
}
