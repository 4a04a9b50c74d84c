//! SSD1306 bring-up over 4-wire SPI on the ESP32-S3.
//
// - SPI2 @ 8 MHz, mode 0; CS owned by an `ExclusiveDevice`.
// - D/C handled by `display-interface-spi`, wrapped in `DiTransport`.
// - Pins come from `wiring::OledPins`.

use core::convert::Infallible;
use core::fmt;

use display_interface::DisplayError;
use display_interface_spi::SPIInterface;
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::delay::Delay;
use esp_hal::gpio::Output;
use esp_hal::spi::master::{Config as SpiConfig, ConfigError as SpiConfigError, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::Blocking;

use crate::config::{ConfigError, PanelConfig};
use crate::error::DriverError;
use crate::ssd1306::Ssd1306;
use crate::transport::DiTransport;
use crate::wiring::OledPins;

pub type OledBus<'a> = ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, NoDelay>;
pub type DisplayType<'a> = Ssd1306<DiTransport<SPIInterface<OledBus<'a>, Output<'a>>>>;

#[derive(Debug)]
pub enum SetupError {
    Spi(SpiConfigError),
    Panel(ConfigError),
    Init(DriverError<DisplayError>),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Spi(e) => write!(f, "SPI config rejected: {e:?}"),
            SetupError::Panel(e) => write!(f, "{e}"),
            SetupError::Init(e) => write!(f, "OLED init failed: {e}"),
        }
    }
}

pub fn setup_display<'a>(pins: OledPins<'a>, config: PanelConfig) -> Result<DisplayType<'a>, SetupError> {
    let OledPins { spi2, sck, mosi, cs, dc, mut rst } = pins;
    let mut delay = Delay::new();

    // hardware reset, the module needs >3 us low
    rst.set_low();
    delay.delay_ms(1);
    rst.set_high();
    delay.delay_ms(10);

    let spi = Spi::new(
        spi2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(8))
            .with_mode(Mode::_0),
    )
    .map_err(SetupError::Spi)?
    .with_sck(sck)
    .with_mosi(mosi);

    let spi_dev = ExclusiveDevice::new(spi, cs, NoDelay).map_err(|e: Infallible| -> SetupError { match e {} })?;
    let di = SPIInterface::new(spi_dev, dc);

    let mut oled = Ssd1306::new(DiTransport::new(di), config).map_err(SetupError::Panel)?;
    oled.init().map_err(SetupError::Init)?;
    Ok(oled)
}
