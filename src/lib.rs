#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod color;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod gu900;
pub mod gui;
pub mod layout;
pub mod shared;
pub mod ssd1306;
pub mod transport;

#[cfg(feature = "esp32s3-oled")]
pub mod display;
#[cfg(feature = "esp32s3-oled")]
pub mod wiring;

#[cfg(test)]
mod testbus;

pub use color::Brightness;
pub use config::{ConfigError, PanelConfig};
pub use error::DriverError;
pub use framebuffer::{CodecError, MonoFramebuffer, PageSpan, TransmitPlan};
pub use layout::{AddressingLayout, BitOrder, BitPolarity};
pub use transport::{DiTransport, DisplayTransport};
