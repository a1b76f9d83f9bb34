#![allow(unsafe_code)]

use core::{
    ptr::{read_volatile, write_volatile},
    sync::atomic::{AtomicU32, Ordering},
};

/// Word-wide access to a block of hardware registers.
///
/// Every call is a distinct hardware transaction: implementations must not
/// cache, coalesce or reorder accesses. Offsets are byte offsets and have
/// already been validated by the owning [`RegisterWindow`](crate::mmio::RegisterWindow).
pub trait RegisterBus {
    /// Bytes of register space behind the bus. Windows larger than this are
    /// rejected at compile time.
    const CAPACITY: usize = usize::MAX;

    /// Loads the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;
    /// Stores `value` into the 32-bit register at `offset`.
    fn write32(&self, offset: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    const CAPACITY: usize = B::CAPACITY;

    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Memory-mapped register block on a 32-bit bus.
#[derive(Debug)]
pub struct Mmio32 {
    base: *mut u32,
}

impl Mmio32 {
    /// Wraps a mapped register block.
    ///
    /// # Safety
    /// `base` must point to a mapped, 4-byte aligned register block that
    /// stays mapped for the lifetime of this value and covers every offset
    /// the owning window will pass in. No other code may hold a `Mmio32`
    /// over the same block.
    pub const unsafe fn new(base: *mut u32) -> Self {
        Self { base }
    }
}

// The block is device memory, not Rust-owned data; all access is volatile.
unsafe impl Send for Mmio32 {}
unsafe impl Sync for Mmio32 {}

impl RegisterBus for Mmio32 {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // Safety: the window only passes aligned offsets inside its span,
        // which the constructor's contract guarantees is mapped.
        unsafe { read_volatile(self.base.byte_add(offset)) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // Safety: see `read32`.
        unsafe { write_volatile(self.base.byte_add(offset), value) }
    }
}

/// Simulated register block of `WORDS` 32-bit registers.
///
/// Reads return the last stored value, so it behaves like plain memory.
/// Useful for host-side testing and for driving the drivers without an
/// FPGA attached.
#[derive(Debug)]
pub struct SimBus<const WORDS: usize> {
    regs: [AtomicU32; WORDS],
}

impl<const WORDS: usize> SimBus<WORDS> {
    pub fn new() -> Self {
        Self {
            regs: core::array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    /// Reads a register directly, bypassing any window or policy.
    ///
    /// # Panics
    /// Panics if `offset / 4 >= WORDS`.
    pub fn peek(&self, offset: usize) -> u32 {
        self.regs[offset / 4].load(Ordering::SeqCst)
    }

    /// Writes a register directly, bypassing any window or policy.
    ///
    /// Stands in for the hardware side of a register, e.g. a fresh ADC
    /// conversion result.
    ///
    /// # Panics
    /// Panics if `offset / 4 >= WORDS`.
    pub fn poke(&self, offset: usize, value: u32) {
        self.regs[offset / 4].store(value, Ordering::SeqCst);
    }
}

impl<const WORDS: usize> Default for SimBus<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> RegisterBus for SimBus<WORDS> {
    const CAPACITY: usize = WORDS * 4;

    fn read32(&self, offset: usize) -> u32 {
        self.peek(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.poke(offset, value)
    }
}
