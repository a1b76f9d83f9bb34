//! Drivers for the individual soft peripherals.

pub mod adc;
pub mod keyboard;
pub mod lcd;
pub mod led_patterns;
pub mod pwm;

pub use adc::Adc;
pub use keyboard::Keyboard;
pub use lcd::{Lcd, LcdState, TextCursor, Transfer};
pub use led_patterns::LedPatterns;
pub use pwm::{Pwm, PwmConfig};
