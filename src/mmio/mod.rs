pub mod attr;
pub mod bus;
pub mod delay;
pub mod error;
pub mod helpers;
pub mod lifecycle;
pub mod policy;
pub mod register;
pub mod serializer;
pub mod stream;
pub mod text;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use attr::{AttrKind, Attribute, AttributeTarget, ValueFormat};
pub use bus::{Mmio32, RegisterBus, SimBus};
#[cfg(feature = "std")]
pub use delay::StdDelay;
pub use delay::Delay;
pub use error::{MmioError, ParseError};
pub use lifecycle::DeviceCore;
pub use policy::{AccessPolicy, AllowAllPolicy, RegisterMapPolicy};
pub use register::{Access, Register};
pub use serializer::{CriticalSectionSerializer, Serializer, SpinSerializer};
pub use stream::{StreamHandle, StreamTarget};
pub use text::AttrText;
pub use window::RegisterWindow;

pub mod prelude {
    pub use super::{
        Access, AccessPolicy, AllowAllPolicy, AttrText, Attribute, AttributeTarget,
        CriticalSectionSerializer, Delay, DeviceCore, MmioError, Mmio32, ParseError, Register,
        RegisterBus, RegisterMapPolicy, RegisterWindow, Serializer, SimBus, SpinSerializer,
        StreamHandle, StreamTarget, ValueFormat,
    };
    #[cfg(feature = "std")]
    pub use super::StdDelay;
}
