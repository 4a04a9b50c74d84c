//! Noritake GU-series dot-matrix VFD (GU128x32D-7900 and friends).
//!
//! The module takes a single byte stream of ESC/US sequences; there is no
//! command/data split, so every byte goes out through
//! [`DisplayTransport::write_data`]. Display RAM is column-major, 4 bytes per
//! column, MSB at the top of each byte.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::config::{ConfigError, PanelConfig};
use crate::error::DriverError;
use crate::framebuffer::{MonoFramebuffer, PageSpan};
use crate::gui::{Capabilities, GuiDisplay};
use crate::layout::AddressingLayout;
use crate::transport::DisplayTransport;

const INITIALIZE: [u8; 2] = [0x1B, 0x40];
const CLEAR: [u8; 1] = [0x0C];
const DISPLAY_OFF: [u8; 5] = [0x1F, 0x28, 0x61, 0x40, 0x00];
const DISPLAY_ON: [u8; 5] = [0x1F, 0x28, 0x61, 0x40, 0x01];
const INVERT_OFF: [u8; 3] = [0x1F, 0x72, 0x00];
const INVERT_ON: [u8; 3] = [0x1F, 0x72, 0x01];
const BRIGHTNESS: [u8; 2] = [0x1F, 0x58];

/// Columns gathered per real-time image when resending a single page.
pub const PAGE_CHUNK: usize = 128;

/// `US ( d 0x21` real-time dot-unit image header; data follows.
fn image_header(x: u16, y: u16, w: u16, h: u16) -> [u8; 13] {
    let [xl, xh] = x.to_le_bytes();
    let [yl, yh] = y.to_le_bytes();
    let [wl, wh] = w.to_le_bytes();
    let [hl, hh] = h.to_le_bytes();
    [0x1F, 0x28, 0x64, 0x21, xl, xh, yl, yh, wl, wh, hl, hh, 0x01]
}

/// Brightness level (1..=8) for a percentage.
pub fn brightness_level(percent: u8) -> u8 {
    let p = percent.min(100) as u16;
    ((p * 10 + 120) / 125) as u8
}

pub struct Gu900<T> {
    transport: T,
    fb: MonoFramebuffer,
}

impl<T: DisplayTransport> Gu900<T> {
    pub fn new(transport: T, config: PanelConfig) -> Result<Self, ConfigError> {
        if config.layout != AddressingLayout::ColumnMajor4Byte {
            return Err(ConfigError::UnsupportedGeometry {
                layout: config.layout,
                width: config.width,
                height: config.height,
            });
        }
        Ok(Self { transport, fb: MonoFramebuffer::new(config)? })
    }

    /// `ESC @`: reset the module to power-on defaults.
    pub fn init(&mut self) -> Result<(), DriverError<T::Error>> {
        self.send(&INITIALIZE)?;
        log::debug!("gu900 {}x{} initialized", self.fb.width(), self.fb.height());
        Ok(())
    }

    /// Resend columns `x1..=x2` in full height as one image.
    ///
    /// The module addresses whole 4-byte columns, so the rows of the request
    /// only have to be valid; all 32 rows of each column go out.
    pub fn flush_area(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<(), DriverError<T::Error>> {
        self.fb.flush_region(x1, y1, x2, y2)?;
        let plan = self.fb.flush_region(x1, 0, x2, self.fb.height() - 1)?;
        log::debug!("gu900 flush columns {:?} bytes {:?}", plan.columns, plan.bytes);

        let header = image_header(x1, 0, x2 - x1 + 1, self.fb.height());
        self.send(&header)?;
        self.transport
            .write_data(&self.fb.as_bytes()[plan.bytes.clone()])
            .map_err(DriverError::Transport)?;

        if x1 == 0 && x2 == self.fb.width() - 1 {
            for page in plan.pages {
                self.fb.clear_page_dirty(page);
            }
        }
        Ok(())
    }

    /// Send every dirty page as 8-row images and clear its flag. Returns the
    /// number of pages sent; a transport error leaves the failing page dirty.
    pub fn redraw(&mut self) -> Result<usize, DriverError<T::Error>> {
        let mut sent = 0;
        let mut from = 0;
        while let Some(span) = self.fb.next_dirty_page(from) {
            if let Err(e) = send_page(&mut self.transport, &self.fb, &span) {
                log::warn!("gu900 redraw aborted at page {}: {:?}", span.page, e);
                return Err(DriverError::Transport(e));
            }
            log::trace!("gu900 page {} sent", span.page);
            self.fb.clear_page_dirty(span.page);
            from = span.page + 1;
            sent += 1;
        }
        Ok(sent)
    }

    /// Blank the module and the buffer. Nothing is left dirty since both agree.
    pub fn clear_screen(&mut self) -> Result<(), DriverError<T::Error>> {
        self.send(&CLEAR)?;
        self.fb.fill(false);
        for page in 0..self.fb.page_count() {
            self.fb.clear_page_dirty(page);
        }
        Ok(())
    }

    /// `0` switches the display off, anything else switches it on at the
    /// nearest of the module's 8 levels. Values above 100 count as 100.
    pub fn set_brightness(&mut self, percent: u8) -> Result<(), DriverError<T::Error>> {
        if percent == 0 {
            return self.display_off();
        }
        self.display_on()?;
        let [a, b] = BRIGHTNESS;
        self.send(&[a, b, brightness_level(percent)])
    }

    pub fn display_on(&mut self) -> Result<(), DriverError<T::Error>> {
        self.send(&DISPLAY_ON)
    }

    pub fn display_off(&mut self) -> Result<(), DriverError<T::Error>> {
        self.send(&DISPLAY_OFF)
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError<T::Error>> {
        self.send(if inverted { &INVERT_ON } else { &INVERT_OFF })
    }

    #[inline]
    pub fn framebuffer(&self) -> &MonoFramebuffer {
        &self.fb
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut MonoFramebuffer {
        &mut self.fb
    }

    pub fn release(self) -> T {
        self.transport
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), DriverError<T::Error>> {
        self.transport.write_data(bytes).map_err(DriverError::Transport)
    }
}

// Page bytes sit 4 apart in RAM; collect them column by column.
fn send_page<T: DisplayTransport>(transport: &mut T, fb: &MonoFramebuffer, span: &PageSpan) -> Result<(), T::Error> {
    let bytes = fb.as_bytes();
    let y = (span.page * 8) as u16;
    let mut col = 0;
    while col < span.len {
        let chunk: Vec<u8, PAGE_CHUNK> = span
            .byte_indices()
            .skip(col)
            .take(PAGE_CHUNK)
            .map(|i| bytes[i])
            .collect();
        transport.write_data(&image_header(col as u16, y, chunk.len() as u16, 8))?;
        transport.write_data(&chunk)?;
        col += chunk.len();
    }
    Ok(())
}

impl<T> OriginDimensions for Gu900<T> {
    fn size(&self) -> Size {
        self.fb.size()
    }
}

impl<T> DrawTarget for Gu900<T> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        self.fb.draw_iter(pixels)
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.fb.fill(color.is_on());
        Ok(())
    }
}

impl<T: DisplayTransport> GuiDisplay for Gu900<T> {
    type Error = DriverError<T::Error>;

    fn resolution(&self) -> Size {
        self.fb.size()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ROUNDER | Capabilities::SET_PIXEL | Capabilities::GPU_FILL
    }

    fn flush<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = BinaryColor>,
    {
        let _ = self.fb.fill_contiguous(area, colors);
        let clipped = area.intersection(&self.fb.bounding_box());
        let Some(br) = clipped.bottom_right() else {
            return Ok(());
        };
        let tl = clipped.top_left;
        self.flush_area(tl.x as u16, tl.y as u16, br.x as u16, br.y as u16)
    }

    // whole columns
    fn round_area(&self, area: &Rectangle) -> Rectangle {
        let clipped = area.intersection(&self.fb.bounding_box());
        let Some(br) = clipped.bottom_right() else {
            return Rectangle::zero();
        };
        Rectangle::with_corners(
            Point::new(clipped.top_left.x, 0),
            Point::new(br.x, self.fb.height() as i32 - 1),
        )
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: BinaryColor) -> bool {
        self.fb.set_lit(x, y, color.is_on()).is_ok()
    }

    fn fill_area(&mut self, area: &Rectangle, color: BinaryColor) {
        let _ = self.fb.fill_solid(area, color);
    }
}
