//! Mutual exclusion for multi-step register sequences.
//!
//! A serializer runs a closure with exclusive access to one device
//! instance. Acquisition is scoped to the closure, so the guard is released
//! on every exit path, including early returns through `?`.

/// Runs critical sections one at a time.
pub trait Serializer {
    /// Runs `f` while holding the guard.
    fn serialize<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Per-instance spin lock.
///
/// Only one device instance is blocked while a holder runs, so long
/// sequences on one peripheral (LCD settle delays) do not stall others.
#[derive(Debug, Default)]
pub struct SpinSerializer {
    lock: spin::Mutex<()>,
}

impl SpinSerializer {
    pub const fn new() -> Self {
        Self {
            lock: spin::Mutex::new(()),
        }
    }
}

impl Serializer for SpinSerializer {
    fn serialize<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock.lock();
        f()
    }
}

/// Serializes through the platform critical section.
///
/// On single-core targets this masks interrupts for the duration of the
/// closure; with the `critical-section/std` implementation it is a global
/// lock. Every instance using it shares the same section.
#[derive(Debug, Default, Clone, Copy)]
pub struct CriticalSectionSerializer;

impl Serializer for CriticalSectionSerializer {
    fn serialize<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}
