use crate::mmio::{
    AccessPolicy, MmioError, Register, RegisterBus,
    helpers::{check_offset, is_valid_span},
};

/// A fixed-size block of 32-bit registers.
///
/// Every access is validated against `SPAN` and the access policy before
/// it is issued on the bus, and every accepted access reaches the bus
/// exactly once. A window is owned by exactly one device instance.
///
/// # Const Generics
/// - `SPAN`: Window size in bytes (non-zero multiple of 4)
///
/// # Type Parameters
/// - `B`: Bus the registers live on
/// - `P`: Access policy deciding which offsets are readable/writable
pub struct RegisterWindow<B, P, const SPAN: usize>
where
    B: RegisterBus,
    P: AccessPolicy,
{
    bus: B,
    policy: P,
}

impl<B, P, const SPAN: usize> RegisterWindow<B, P, SPAN>
where
    B: RegisterBus,
    P: AccessPolicy,
{
    /// Wraps `bus` as a window of `SPAN` bytes.
    ///
    /// The bus must back the whole window:
    ///
    /// ```compile_fail
    /// use fpga_mmio::mmio::{AllowAllPolicy, RegisterWindow, SimBus};
    ///
    /// // 8 bytes of registers cannot back a 16-byte window
    /// let _ = RegisterWindow::<_, _, 16>::new(SimBus::<2>::new(), AllowAllPolicy::default());
    /// ```
    pub fn new(bus: B, policy: P) -> Self {
        const { assert!(is_valid_span(SPAN), "window span must be a non-zero multiple of 4") };
        const { assert!(SPAN <= B::CAPACITY, "bus does not back the whole window") };
        Self { bus, policy }
    }

    /// Window size in bytes.
    pub const fn span(&self) -> usize {
        SPAN
    }

    /// Reads the raw register at `offset`.
    ///
    /// Returns `InvalidOffset` past the end, `Unaligned` for misaligned
    /// offsets and `NotReadable` if the policy rejects the read. No bus
    /// access happens on error.
    pub fn read(&self, offset: usize) -> Result<u32, MmioError> {
        self.check(offset)?;
        if !self.policy.can_read(offset) {
            return Err(MmioError::NotReadable);
        }
        Ok(self.bus.read32(offset))
    }

    /// Writes the raw register at `offset`.
    ///
    /// Returns `InvalidOffset` past the end, `Unaligned` for misaligned
    /// offsets and `NotWritable` if the policy rejects the write. No bus
    /// access happens on error.
    pub fn write(&self, offset: usize, value: u32) -> Result<(), MmioError> {
        self.check(offset)?;
        if !self.policy.can_write(offset) {
            return Err(MmioError::NotWritable);
        }
        self.bus.write32(offset, value);
        Ok(())
    }

    /// Reads a named register, truncated to its implemented bits.
    pub fn read_reg(&self, reg: Register) -> Result<u32, MmioError> {
        if !reg.access.readable() {
            return Err(MmioError::NotReadable);
        }
        self.read(reg.offset).map(|value| reg.truncate(value))
    }

    /// Writes a named register, truncated to its implemented bits.
    pub fn write_reg(&self, reg: Register, value: u32) -> Result<(), MmioError> {
        if !reg.access.writable() {
            return Err(MmioError::NotWritable);
        }
        self.write(reg.offset, reg.truncate(value))
    }

    /// Borrows the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn check(&self, offset: usize) -> Result<(), MmioError> {
        check_offset::<SPAN>(offset).map(|_| ()).inspect_err(|err| {
            if *err == MmioError::Unaligned {
                log::warn!("unaligned register access at {offset:#x}");
            }
        })
    }
}

impl<B, P, const SPAN: usize> core::fmt::Debug for RegisterWindow<B, P, SPAN>
where
    B: RegisterBus,
    P: AccessPolicy,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterWindow")
            .field("span", &SPAN)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::{
        Access, AllowAllPolicy, RegisterMapPolicy, SimBus,
        test_support::{RecordingBus, sim_window},
    };

    #[test]
    fn write_then_read_round_trips_every_register() {
        let window = sim_window::<32>();

        for offset in (0..32).step_by(4) {
            let value = 0xA5A5_0000 | offset as u32;
            window.write(offset, value).unwrap();
            assert_eq!(window.read(offset).unwrap(), value);
        }
    }

    #[test]
    fn past_end_is_rejected_without_bus_traffic() {
        let window = RegisterWindow::<_, _, 16>::new(RecordingBus::new(), AllowAllPolicy::default());

        for offset in [16, 20, 64, usize::MAX - 3] {
            assert_eq!(window.read(offset), Err(MmioError::InvalidOffset));
            assert_eq!(window.write(offset, 1), Err(MmioError::InvalidOffset));
        }

        assert!(window.bus().events().is_empty());
    }

    #[test]
    fn unaligned_is_rejected_without_bus_traffic() {
        let window = RegisterWindow::<_, _, 16>::new(RecordingBus::new(), AllowAllPolicy::default());

        for offset in [1, 2, 3, 6, 13] {
            assert_eq!(window.read(offset), Err(MmioError::Unaligned));
            assert_eq!(window.write(offset, 1), Err(MmioError::Unaligned));
        }

        assert!(window.bus().events().is_empty());
    }

    #[test]
    fn policy_gates_raw_access() {
        const REGS: &[Register] = &[
            Register::new("status", 0x0, Access::ReadOnly, u32::MAX),
            Register::new("go", 0x4, Access::WriteOnly, 1),
        ];
        let window =
            RegisterWindow::<_, _, 8>::new(SimBus::<2>::new(), RegisterMapPolicy::<2>::new(REGS));

        assert_eq!(window.write(0x0, 5), Err(MmioError::NotWritable));
        assert_eq!(window.read(0x4), Err(MmioError::NotReadable));
        assert!(window.write(0x4, 1).is_ok());
        assert_eq!(window.bus().peek(0x0), 0);
    }

    #[test]
    fn named_register_access_masks_value() {
        let window = sim_window::<8>();
        let reg = Register::new("ch", 0x4, Access::ReadWrite, 0xFFF);

        window.bus().poke(0x4, 0x1F23);
        assert_eq!(window.read_reg(reg).unwrap(), 0xF23);

        window.write_reg(reg, 0xFFFF_FFFF).unwrap();
        assert_eq!(window.bus().peek(0x4), 0xFFF);
    }

    #[test]
    fn named_register_access_respects_direction() {
        let window = sim_window::<8>();
        let ro = Register::new("ro", 0x0, Access::ReadOnly, u32::MAX);
        let wo = Register::new("wo", 0x4, Access::WriteOnly, u32::MAX);

        assert_eq!(window.write_reg(ro, 1), Err(MmioError::NotWritable));
        assert_eq!(window.read_reg(wo), Err(MmioError::NotReadable));
    }
}
