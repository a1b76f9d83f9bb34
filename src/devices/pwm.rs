//! Three-channel PWM driver for an RGB LED.

use crate::mmio::{
    Attribute, AttributeTarget, DeviceCore, MmioError, Register, RegisterBus, RegisterMapPolicy,
    RegisterWindow, Serializer, SpinSerializer, StreamTarget, ValueFormat,
};

crate::register_map! {
    /// PWM register layout. Duty cycles are fixed-point fractions of the period.
    pub mod regs: 16 {
        RED_DUTY_CYCLE @ 0x0 => rw(32),
        GREEN_DUTY_CYCLE @ 0x4 => rw(32),
        BLUE_DUTY_CYCLE @ 0x8 => rw(32),
        PERIOD @ 0xC => rw(32),
    }
}

/// Colour and period programmed at attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub period: u32,
}

impl Default for PwmConfig {
    /// Pink: full red, 1/64 green, 1/128 blue, 5 ms period.
    fn default() -> Self {
        Self {
            red: 0x800,
            green: 0x20,
            blue: 0x10,
            period: 0x2800,
        }
    }
}

const ATTRIBUTES: &[Attribute] = &[
    Attribute::register(regs::RED_DUTY_CYCLE, ValueFormat::U32),
    Attribute::register(regs::GREEN_DUTY_CYCLE, ValueFormat::U32),
    Attribute::register(regs::BLUE_DUTY_CYCLE, ValueFormat::U32),
    Attribute::register(regs::PERIOD, ValueFormat::U32),
];

pub struct Pwm<B, S = SpinSerializer>
where
    B: RegisterBus,
    S: Serializer,
{
    window: RegisterWindow<B, RegisterMapPolicy<{ regs::WORDS }>, { regs::SPAN }>,
    core: DeviceCore<S>,
}

impl<B, S> Pwm<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    /// Takes ownership of the window and programs `config`.
    pub fn attach(bus: B, serializer: S, config: PwmConfig) -> Result<Self, MmioError> {
        let pwm = Self {
            window: RegisterWindow::new(bus, RegisterMapPolicy::new(regs::REGISTERS)),
            core: DeviceCore::new(serializer),
        };
        pwm.apply(config)?;
        log::info!("pwm attached");
        Ok(pwm)
    }

    /// Writes all four registers as one transaction.
    pub fn apply(&self, config: PwmConfig) -> Result<(), MmioError> {
        self.core.serialized(|| {
            self.window.write_reg(regs::RED_DUTY_CYCLE, config.red)?;
            self.window.write_reg(regs::GREEN_DUTY_CYCLE, config.green)?;
            self.window.write_reg(regs::BLUE_DUTY_CYCLE, config.blue)?;
            self.window.write_reg(regs::PERIOD, config.period)
        })
    }

    /// Reads back the current settings.
    pub fn config(&self) -> Result<PwmConfig, MmioError> {
        self.core.serialized(|| {
            Ok(PwmConfig {
                red: self.window.read_reg(regs::RED_DUTY_CYCLE)?,
                green: self.window.read_reg(regs::GREEN_DUTY_CYCLE)?,
                blue: self.window.read_reg(regs::BLUE_DUTY_CYCLE)?,
                period: self.window.read_reg(regs::PERIOD)?,
            })
        })
    }

    pub fn detach(&self) -> Result<(), MmioError> {
        self.core.retire(|| Ok(()))?;
        log::info!("pwm detached");
        Ok(())
    }
}

impl<B, S> StreamTarget for Pwm<B, S>
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

    fn write_word(&self, offset: usize, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.window.write(offset, value))
    }
}

impl<B, S> AttributeTarget for Pwm<B, S>
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
        self.window.read_reg(reg)
    }

    fn write_register(&self, reg: Register, value: u32) -> Result<(), MmioError> {
        self.core.serialized(|| self.window.write_reg(reg, value))
    }
}
