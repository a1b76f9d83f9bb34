/// Direction(s) in which a register may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    #[inline]
    pub const fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    #[inline]
    pub const fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// A named 32-bit register at a fixed offset in a window.
///
/// `mask` selects the bits the hardware actually implements; reads are
/// truncated to it and writes are truncated before they reach the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    pub name: &'static str,
    pub offset: usize,
    pub access: Access,
    pub mask: u32,
}

impl Register {
    pub const fn new(name: &'static str, offset: usize, access: Access, mask: u32) -> Self {
        Self {
            name,
            offset,
            access,
            mask,
        }
    }

    /// Keeps only the implemented bits of `value`.
    #[inline]
    pub const fn truncate(&self, value: u32) -> u32 {
        value & self.mask
    }
}

/// Mask for a register that implements the low `bits` bits.
pub const fn low_bits(bits: u32) -> u32 {
    if bits >= 32 { u32::MAX } else { (1 << bits) - 1 }
}

/// Declares the register layout of one peripheral window.
///
/// Generates a module holding one [`Register`] constant per entry (named
/// after the entry, with its lowercase form as the register name), a
/// `REGISTERS` table in declaration order, `SPAN` and `WORDS`.
///
/// ```
/// fpga_mmio::register_map! {
///     /// Two-register example.
///     pub mod demo_regs: 8 {
///         CONTROL @ 0x0 => rw(32),
///         STATUS @ 0x4 => ro(12),
///     }
/// }
///
/// assert_eq!(demo_regs::STATUS.name, "status");
/// assert_eq!(demo_regs::STATUS.mask, 0xFFF);
/// assert_eq!(demo_regs::REGISTERS.len(), 2);
/// assert_eq!(demo_regs::WORDS, 2);
/// ```
#[macro_export]
macro_rules! register_map {
    (@access ro) => { $crate::mmio::Access::ReadOnly };
    (@access wo) => { $crate::mmio::Access::WriteOnly };
    (@access rw) => { $crate::mmio::Access::ReadWrite };
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident : $span:literal {
            $( $reg:ident @ $offset:literal => $access:ident ( $bits:literal ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $module {
            /// Window size in bytes.
            pub const SPAN: usize = $span;
            /// Window size in registers.
            pub const WORDS: usize = $span / 4;

            $crate::__paste! {
                $(
                    #[doc = "`" $reg "` register."]
                    pub const $reg: $crate::mmio::Register = $crate::mmio::Register::new(
                        stringify!([<$reg:lower>]),
                        $offset,
                        $crate::register_map!(@access $access),
                        $crate::mmio::register::low_bits($bits),
                    );
                )+
            }

            /// All registers in declaration order.
            pub const REGISTERS: &[$crate::mmio::Register] = &[$($reg),+];

            const _: () = assert!($crate::mmio::helpers::is_valid_span(SPAN));
            $(
                const _: () = assert!($offset % 4 == 0 && $offset < SPAN);
            )+
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::register_map! {
        pub mod sample: 12 {
            FIRST @ 0x0 => rw(32),
            SECOND_REG @ 0x4 => ro(12),
            THIRD @ 0x8 => wo(1),
        }
    }

    #[test]
    fn generated_constants() {
        assert_eq!(sample::SPAN, 12);
        assert_eq!(sample::WORDS, 3);
        assert_eq!(sample::SECOND_REG.name, "second_reg");
        assert_eq!(sample::SECOND_REG.offset, 4);
        assert_eq!(sample::SECOND_REG.access, Access::ReadOnly);
        assert_eq!(sample::THIRD.mask, 1);
        assert_eq!(sample::FIRST.mask, u32::MAX);
        assert_eq!(
            sample::REGISTERS,
            &[sample::FIRST, sample::SECOND_REG, sample::THIRD]
        );
    }

    #[test]
    fn truncate_applies_mask() {
        let reg = Register::new("adc", 0, Access::ReadOnly, low_bits(12));
        assert_eq!(reg.truncate(0x1F23), 0xF23);
        assert_eq!(low_bits(8), 0xFF);
        assert_eq!(low_bits(0), 0);
    }

    #[test]
    fn access_directions() {
        assert!(Access::ReadOnly.readable() && !Access::ReadOnly.writable());
        assert!(!Access::WriteOnly.readable() && Access::WriteOnly.writable());
        assert!(Access::ReadWrite.readable() && Access::ReadWrite.writable());
    }
}
