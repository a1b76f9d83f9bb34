use core::sync::atomic::{AtomicBool, Ordering};

use crate::mmio::{MmioError, Serializer};

/// Lifecycle state and access guard shared by every driver.
///
/// A core starts attached. [`DeviceCore::retire`] detaches it under the
/// guard, after which every entry point reports [`MmioError::DeviceGone`].
#[derive(Debug)]
pub struct DeviceCore<S: Serializer> {
    serializer: S,
    attached: AtomicBool,
}

impl<S: Serializer> DeviceCore<S> {
    pub fn new(serializer: S) -> Self {
        Self {
            serializer,
            attached: AtomicBool::new(true),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Fails with `DeviceGone` once the device has been detached.
    ///
    /// Used by unguarded single-register reads.
    pub fn ensure_attached(&self) -> Result<(), MmioError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(MmioError::DeviceGone)
        }
    }

    /// Runs `f` under the guard if the device is still attached.
    pub fn serialized<R>(
        &self,
        f: impl FnOnce() -> Result<R, MmioError>,
    ) -> Result<R, MmioError> {
        self.serializer.serialize(|| {
            self.ensure_attached()?;
            f()
        })
    }

    /// Runs the quiesce closure `f` under the guard and marks the device
    /// detached. Returns `DeviceGone` if it was already detached.
    ///
    /// The device is detached even if `f` fails.
    pub fn retire(&self, f: impl FnOnce() -> Result<(), MmioError>) -> Result<(), MmioError> {
        self.serializer.serialize(|| {
            self.ensure_attached()?;
            let result = f();
            self.attached.store(false, Ordering::Release);
            result
        })
    }
}
