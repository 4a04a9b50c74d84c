//! monopanel demo
//! ========================================
//! needs to be run in WSL2 terminal
//! source ~/export-esp.sh
//! cargo run --release --features esp32s3-oled
//! ========================================
//!
//! Bounces a ball across a 128x64 SSD1306 and only resends the pages it
//! touched. The BOOT button toggles hardware inversion from the GPIO interrupt.

//% CHIPS: esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
esp_bootloader_esp_idf::esp_app_desc!();

// Core imports
use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use critical_section::Mutex;
use esp_backtrace as _;

// ESP-HAL imports
use esp_hal::{delay::Delay, gpio::Input, handler, main, ram, Config};
use esp_println::println;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::Text,
};

use monopanel::{
    config::PanelConfig,
    display::{setup_display, DisplayType},
    shared::SharedPanel,
    wiring::{init_board_pins, BoardPins},
};

// Panel shared between the main loop and the button interrupt
static OLED: SharedPanel<DisplayType<'static>> = SharedPanel::new();

static BUTTON: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));
static INVERTED: AtomicBool = AtomicBool::new(false);

const BALL: u32 = 16;
// rows 24..56 = pages 3..6
const BAND_TOP: i32 = 24;
const BAND_HEIGHT: u32 = 32;
const FRAME_MS: u32 = 30;

#[handler]
#[ram]
fn handler() {
    let pressed = critical_section::with(|cs| {
        let mut slot = BUTTON.borrow_ref_mut(cs);
        let Some(btn) = slot.as_mut() else {
            return false;
        };
        if !btn.is_interrupt_set() {
            return false;
        }
        btn.clear_interrupt();
        true
    });

    if pressed {
        let next = !INVERTED.load(Ordering::Relaxed);
        // the flag follows the panel, a dropped command leaves both unchanged
        if let Some(Ok(())) = OLED.with(|oled| oled.set_inverted(next)) {
            INVERTED.store(next, Ordering::Relaxed);
        }
    }
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());

    // framebuffer lives on the heap
    esp_alloc::heap_allocator!(size: 32 * 1024);

    let (mut io, pins) = init_board_pins(peripherals);
    let BoardPins { oled, button } = pins;

    critical_section::with(|cs| BUTTON.borrow_ref_mut(cs).replace(button));
    io.set_interrupt_handler(handler);

    let display = setup_display(oled, PanelConfig::ssd1306_128x64()).expect("OLED setup failed");
    OLED.install(display);
    println!("OLED up, 128x64");

    // static title, sent once by the first redraw
    let title = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    OLED.with(|oled| {
        let _ = Text::new("monopanel", Point::new(37, 12), title).draw(oled);
    });

    let band = Rectangle::new(Point::new(0, BAND_TOP), Size::new(128, BAND_HEIGHT));
    let delay = Delay::new();
    let mut x: i32 = 0;
    let mut dx: i32 = 2;
    let mut frames: u32 = 0;

    loop {
        let result = OLED.with(|oled| {
            let _ = band.into_styled(PrimitiveStyle::with_fill(BinaryColor::Off)).draw(oled);
            let _ = Circle::new(Point::new(x, BAND_TOP + 8), BALL)
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(oled);
            oled.redraw()
        });

        match result {
            Some(Ok(pages)) => {
                frames = frames.wrapping_add(1);
                if frames % 200 == 0 {
                    println!("frame {}: {} pages sent", frames, pages);
                }
            }
            Some(Err(e)) => println!("redraw failed, retrying next frame: {}", e),
            None => {}
        }

        x += dx;
        if x <= 0 || x >= 128 - BALL as i32 {
            dx = -dx;
        }
        delay.delay_millis(FRAME_MS);
    }
}
