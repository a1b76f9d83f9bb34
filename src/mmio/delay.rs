use core::time::Duration;

/// Blocking wall-clock wait used for hardware settle times.
///
/// Implementations must actually let `duration` of real time pass; busy
/// counting of CPU cycles is not a substitute.
pub trait Delay {
    fn delay(&self, duration: Duration);
}

impl<D: Delay + ?Sized> Delay for &D {
    fn delay(&self, duration: Duration) {
        (**self).delay(duration)
    }
}

/// Sleeps the calling thread.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
