//! A `no_std` core for memory-mapped FPGA soft peripherals.
//!
//! Each peripheral is a small block of 32-bit registers. This crate
//! validates and serializes access to those blocks and exposes them the
//! two ways host tools expect: as a byte stream with a cursor, and as a
//! set of named text attributes.
//!
//! # Features
//!
//! - **Checked windows** - Range, alignment and access direction are
//!   verified before any bus access
//! - **Serialized devices** - Multi-register transactions never interleave
//! - **Detach safety** - Every entry point of a detached device reports
//!   `DeviceGone` instead of touching the bus
//! - **LCD protocol** - Data/strobe handshake with settle delays
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ StreamHandle │   │ show() / store() │   │ Lcd::submit()    │
//! └──────┬───────┘   └────────┬─────────┘   └────────┬─────────┘
//!        │                    │                      │
//!        ▼                    ▼                      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Driver: DeviceCore (serializer + attached flag)              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ RegisterWindow: offset -> alignment -> policy checks         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//!                 RegisterBus (Mmio32 on hardware)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fpga_mmio::prelude::*;
//!
//! let pwm = Pwm::attach(SimBus::<4>::new(), SpinSerializer::new(), PwmConfig::default()).unwrap();
//!
//! pwm.store("period", "5000").unwrap();
//! assert_eq!(pwm.show("period").unwrap().as_str(), "5000\n");
//!
//! let mut stream = StreamHandle::open(&pwm);
//! let mut buf = [0u8; 4];
//! stream.read(&mut buf).unwrap();
//! assert_eq!(u32::from_le_bytes(buf), 0x800);
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod devices;
pub mod mmio;

#[doc(hidden)]
pub use paste::paste as __paste;

pub mod prelude {
    pub use crate::devices::{
        Adc, Keyboard, Lcd, LcdState, LedPatterns, Pwm, PwmConfig, TextCursor, Transfer,
    };
    pub use crate::mmio::prelude::*;
}
