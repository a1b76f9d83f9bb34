use bitmaps::{Bitmap, Bits, BitsImpl};

use crate::mmio::{Register, helpers::WORD};

/// Controls read/write access to the registers of a window.
pub trait AccessPolicy {
    /// Returns true if the register at byte `offset` may be read.
    fn can_read(&self, offset: usize) -> bool;
    /// Returns true if the register at byte `offset` may be written.
    fn can_write(&self, offset: usize) -> bool;
}

/// Policy that allows all reads and writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllPolicy {}

impl AccessPolicy for AllowAllPolicy {
    fn can_read(&self, _offset: usize) -> bool {
        true
    }

    fn can_write(&self, _offset: usize) -> bool {
        true
    }
}

/// Policy derived from a register table.
///
/// Each of the `WORDS` registers in the window gets a readable and a
/// writable bit; words not named in the table get neither.
pub struct RegisterMapPolicy<const WORDS: usize>
where
    BitsImpl<WORDS>: Bits,
{
    readable: Bitmap<WORDS>,
    writable: Bitmap<WORDS>,
}

impl<const WORDS: usize> RegisterMapPolicy<WORDS>
where
    BitsImpl<WORDS>: Bits,
{
    pub fn new(registers: &[Register]) -> Self {
        let mut readable = Bitmap::new();
        let mut writable = Bitmap::new();
        for reg in registers {
            let word = reg.offset / WORD;
            debug_assert!(word < WORDS, "register {} outside window", reg.name);
            if word >= WORDS {
                continue;
            }
            readable.set(word, reg.access.readable());
            writable.set(word, reg.access.writable());
        }
        Self { readable, writable }
    }

    fn bit(map: &Bitmap<WORDS>, offset: usize) -> bool {
        let word = offset / WORD;
        word < WORDS && map.get(word)
    }
}

impl<const WORDS: usize> AccessPolicy for RegisterMapPolicy<WORDS>
where
    BitsImpl<WORDS>: Bits,
{
    fn can_read(&self, offset: usize) -> bool {
        Self::bit(&self.readable, offset)
    }

    fn can_write(&self, offset: usize) -> bool {
        Self::bit(&self.writable, offset)
    }
}

impl<const WORDS: usize> core::fmt::Debug for RegisterMapPolicy<WORDS>
where
    BitsImpl<WORDS>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterMapPolicy")
            .field("words", &WORDS)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::{Access, register::low_bits};

    const TABLE: &[Register] = &[
        Register::new("control", 0x0, Access::ReadWrite, u32::MAX),
        Register::new("status", 0x4, Access::ReadOnly, low_bits(12)),
        Register::new("trigger", 0xC, Access::WriteOnly, 1),
    ];

    #[test]
    fn map_policy_follows_register_access() {
        let policy = RegisterMapPolicy::<4>::new(TABLE);

        assert!(policy.can_read(0x0) && policy.can_write(0x0));
        assert!(policy.can_read(0x4) && !policy.can_write(0x4));
        assert!(!policy.can_read(0xC) && policy.can_write(0xC));
    }

    #[test]
    fn unmapped_and_out_of_window_words_are_denied() {
        let policy = RegisterMapPolicy::<4>::new(TABLE);

        // 0x8 is inside the window but not declared
        assert!(!policy.can_read(0x8));
        assert!(!policy.can_write(0x8));

        // Past the window
        assert!(!policy.can_read(0x10));
        assert!(!policy.can_write(0x40));
    }

    #[test]
    fn allow_all_allows_everything() {
        let policy = AllowAllPolicy::default();
        assert!(policy.can_read(0x1000));
        assert!(policy.can_write(0));
    }
}
