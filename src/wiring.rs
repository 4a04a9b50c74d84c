// Board-specific pin mappings for the SSD1306 demo.
// The default profile targets an ESP32-S3 DevKitC with a 0.96" SPI OLED module.
// Enable the `devkit-alt` feature for the second mapping below.
//! Default wiring (4-wire SPI, D/C pin):
//! - OLED SCK  => GPIO12
//! - OLED MOSI => GPIO11
//! - OLED CS   => GPIO10
//! - OLED DC   => GPIO9
//! - OLED RST  => GPIO14
//! - BUTTON    => GPIO0 (BOOT, active low)
//! - 3.3V => VCC, GND => GND

use esp_hal::gpio::{Event, Input, InputConfig, Io, Level, Output, OutputConfig, Pull};
use esp_hal::peripherals::{Peripherals, SPI2};

/// Everything the OLED needs, handed over to `display::setup_display`.
pub struct OledPins<'a> {
    pub spi2: SPI2<'a>,
    pub sck: esp_hal::gpio::AnyPin<'a>,
    pub mosi: esp_hal::gpio::AnyPin<'a>,
    pub cs: Output<'a>,
    pub dc: Output<'a>,
    pub rst: Output<'a>,
}

pub struct BoardPins<'a> {
    pub oled: OledPins<'a>,
    pub button: Input<'a>,
}

pub fn init_board_pins<'a>(p: Peripherals) -> (Io<'a>, BoardPins<'a>) {
    let io = Io::new(p.IO_MUX);

    cfg_if::cfg_if! {
        if #[cfg(feature = "devkit-alt")] {
            let (sck, mosi) = (p.GPIO36.into(), p.GPIO35.into());
            let cs  = Output::new(p.GPIO34, Level::High, OutputConfig::default());
            let dc  = Output::new(p.GPIO33, Level::Low,  OutputConfig::default());
            let rst = Output::new(p.GPIO21, Level::High, OutputConfig::default());
        } else {
            let (sck, mosi) = (p.GPIO12.into(), p.GPIO11.into());
            let cs  = Output::new(p.GPIO10, Level::High, OutputConfig::default());
            let dc  = Output::new(p.GPIO9,  Level::Low,  OutputConfig::default());
            let rst = Output::new(p.GPIO14, Level::High, OutputConfig::default());
        }
    }

    let mut button = Input::new(p.GPIO0, InputConfig::default().with_pull(Pull::Up));
    button.listen(Event::FallingEdge);

    (
        io,
        BoardPins {
            oled: OledPins { spi2: p.SPI2, sck, mosi, cs, dc, rst },
            button,
        },
    )
}
