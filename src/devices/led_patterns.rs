//! LED pattern generator.
//!
//! With `hps_led_control` clear the fabric runs its own patterns, paced by
//! `base_period`. With it set, `led_reg` drives the LEDs directly.

use crate::mmio::{
    Attribute, AttributeTarget, DeviceCore, MmioError, Register, RegisterBus, RegisterMapPolicy,
    RegisterWindow, Serializer, SpinSerializer, StreamTarget, ValueFormat,
};

crate::register_map! {
    pub mod regs: 16 {
        HPS_LED_CONTROL @ 0x0 => rw(1),
        LED_REG @ 0x4 => rw(8),
        BASE_PERIOD @ 0x8 => rw(8),
        // Raw word with no attribute.
        SPARE @ 0xC => rw(32),
    }
}

/// Every LED lit.
pub const ALL_ON: u8 = 0xFF;

const ATTRIBUTES: &[Attribute] = &[
    Attribute::register(regs::HPS_LED_CONTROL, ValueFormat::Bool),
    Attribute::register(regs::LED_REG, ValueFormat::U8),
    Attribute::register(regs::BASE_PERIOD, ValueFormat::U8),
];

pub struct LedPatterns<B, S = SpinSerializer>
where
    B: RegisterBus,
    S: Serializer,
{
    window: RegisterWindow<B, RegisterMapPolicy<{ regs::WORDS }>, { regs::SPAN }>,
    core: DeviceCore<S>,
}

impl<B, S> LedPatterns<B, S>
where
    B: RegisterBus,
    S: Serializer,
{
    /// Takes software control and lights every LED.
    pub fn attach(bus: B, serializer: S) -> Result<Self, MmioError> {
        let leds = Self {
            window: RegisterWindow::new(bus, RegisterMapPolicy::new(regs::REGISTERS)),
            core: DeviceCore::new(serializer),
        };
        leds.core.serialized(|| {
            leds.window.write_reg(regs::HPS_LED_CONTROL, 1)?;
            leds.window.write_reg(regs::LED_REG, u32::from(ALL_ON))
        })?;
        log::info!("led patterns attached");
        Ok(leds)
    }

    pub fn set_software_control(&self, enabled: bool) -> Result<(), MmioError> {
        self.core
            .serialized(|| self.window.write_reg(regs::HPS_LED_CONTROL, u32::from(enabled)))
    }

    /// Drives the LEDs directly. Only visible under software control.
    pub fn set_leds(&self, pattern: u8) -> Result<(), MmioError> {
        self.core
            .serialized(|| self.window.write_reg(regs::LED_REG, u32::from(pattern)))
    }

    pub fn leds(&self) -> Result<u8, MmioError> {
        self.core.ensure_attached()?;
        let value = self.window.read_reg(regs::LED_REG)?;
        // masked to 8 bits by the register map
        Ok(value as u8)
    }

    /// Hands the LEDs back to the fabric, then detaches.
    pub fn detach(&self) -> Result<(), MmioError> {
        self.core
            .retire(|| self.window.write_reg(regs::HPS_LED_CONTROL, 0))?;
        log::info!("led patterns detached");
        Ok(())
    }
}

impl<B, S> StreamTarget for LedPatterns<B, S>
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

impl<B, S> AttributeTarget for LedPatterns<B, S>
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::{
        ParseError, StreamHandle,
        test_support::{RecordingBus, assert_gone},
    };
    use std::vec;

    fn attach() -> (LedPatterns<RecordingBus>, RecordingBus) {
        let bus = RecordingBus::new();
        let leds = LedPatterns::attach(bus.clone(), SpinSerializer::new()).unwrap();
        (leds, bus)
    }

    #[test]
    fn attach_takes_control_and_lights_all() {
        let (leds, bus) = attach();
        assert_eq!(bus.writes(), vec![(0x0, 1), (0x4, 0xFF)]);
        assert_eq!(leds.leds(), Ok(ALL_ON));
    }

    #[test]
    fn detach_returns_control_to_fabric() {
        let (leds, bus) = attach();
        bus.clear();

        leds.detach().unwrap();
        assert_eq!(bus.writes(), vec![(0x0, 0)]);

        bus.clear();
        assert_gone(leds.set_leds(0x0F));
        assert_gone(leds.leds());
        assert_gone(leds.show("led_reg"));
        assert_gone(StreamHandle::open(&leds).write(&[0; 4]));
        assert_gone(leds.detach());
        assert!(bus.events().is_empty());
    }

    #[test]
    fn attributes_parse_per_format() {
        let (leds, bus) = attach();

        leds.store("hps_led_control", "off\n").unwrap();
        assert_eq!(bus.peek(0x0), 0);
        assert_eq!(leds.show("hps_led_control").unwrap().as_str(), "0\n");

        leds.store("base_period", "0x10").unwrap();
        assert_eq!(leds.show("base_period").unwrap().as_str(), "16\n");

        assert_eq!(
            leds.store("led_reg", "256"),
            Err(MmioError::Parse(ParseError::Overflow))
        );
        assert_eq!(leds.leds(), Ok(ALL_ON));
    }

    #[test]
    fn stream_covers_pattern_registers() {
        let (leds, bus) = attach();
        let mut stream = StreamHandle::open(&leds);

        stream.seek(0x8);
        assert_eq!(stream.write(&0x3Cu32.to_le_bytes()), Ok(4));
        assert_eq!(bus.peek(0x8), 0x3C);

        assert_eq!(stream.write(&0xDEAD_BEEFu32.to_le_bytes()), Ok(4));
        assert_eq!(bus.peek(0xC), 0xDEAD_BEEF);
        assert_eq!(stream.write(&1u32.to_le_bytes()), Err(MmioError::NotWritable));
    }

    #[test]
    fn sequential_read_reaches_eof() {
        let (leds, bus) = attach();
        bus.poke(0x8, 0x20);
        bus.poke(0xC, 0x1234_5678);

        let mut stream = StreamHandle::open(&leds);
        let mut buf = [0u8; 4];
        let mut seen = vec![];
        while stream.read(&mut buf).unwrap() == 4 {
            seen.push(u32::from_le_bytes(buf));
        }
        assert_eq!(seen, vec![1, 0xFF, 0x20, 0x1234_5678]);
        assert_eq!(stream.position(), regs::SPAN as i64);
    }
}
