// SSD1306 page-addressed OLED driver (128 x 32/64, horizontal addressing mode).
//
// RAM layout: 8 pages of 128 bytes, bit 0 = top row of the page.
// Every RAM transfer is bracketed by a column window (0x21) and a page
// window (0x22); the controller then auto-increments within that window.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{ConfigError, PanelConfig};
use crate::error::DriverError;
use crate::framebuffer::{MonoFramebuffer, PageSpan};
use crate::gui::{Capabilities, GuiDisplay};
use crate::layout::AddressingLayout;
use crate::transport::DisplayTransport;

const DISPLAY_OFF: u8 = 0xAE;
const DISPLAY_ON: u8 = 0xAF;
const MULTIPLEX_RATIO: u8 = 0xA8;
const COM_PINS: u8 = 0xDA;
const CHARGE_PUMP: u8 = 0x8D;
const MEMORY_MODE: u8 = 0x20;
const COLUMN_ADDR: u8 = 0x21;
const PAGE_ADDR: u8 = 0x22;
const CONTRAST: u8 = 0x81;
const NORMAL_DISPLAY: u8 = 0xA6;
const INVERT_DISPLAY: u8 = 0xA7;

pub struct Ssd1306<T> {
    transport: T,
    fb: MonoFramebuffer,
}

impl<T: DisplayTransport> Ssd1306<T> {
    /// Wrap `transport`. Nothing is sent until [`init`](Self::init).
    pub fn new(transport: T, config: PanelConfig) -> Result<Self, ConfigError> {
        if config.layout != AddressingLayout::RowMajorPage128 {
            return Err(ConfigError::UnsupportedGeometry {
                layout: config.layout,
                width: config.width,
                height: config.height,
            });
        }
        Ok(Self { transport, fb: MonoFramebuffer::new(config)? })
    }

    /// Mux and COM wiring for the panel height, horizontal addressing, full
    /// window, whole RAM from the buffer, panel on.
    pub fn init(&mut self) -> Result<(), DriverError<T::Error>> {
        let last_col = (self.fb.width() - 1) as u8;
        let last_page = (self.fb.page_count() - 1) as u8;
        let last_row = (self.fb.height() - 1) as u8;
        // 128x64 modules use alternative COM pins, 128x32 sequential
        let com_pins = if self.fb.height() > 32 { 0x12 } else { 0x02 };

        self.command(DISPLAY_OFF, &[])?;
        self.command(MULTIPLEX_RATIO, &[last_row])?;
        self.command(COM_PINS, &[com_pins])?;
        self.command(CHARGE_PUMP, &[0x14])?;
        self.command(MEMORY_MODE, &[0x00])?;
        self.command(COLUMN_ADDR, &[0, last_col])?;
        self.command(PAGE_ADDR, &[0, last_page])?;
        self.transport
            .write_data(self.fb.as_bytes())
            .map_err(DriverError::Transport)?;
        for page in 0..self.fb.page_count() {
            self.fb.clear_page_dirty(page);
        }
        self.command(DISPLAY_ON, &[])?;

        log::debug!("ssd1306 {}x{} up", self.fb.width(), self.fb.height());
        Ok(())
    }

    /// Resend the inclusive rectangle `(x1, y1)..(x2, y2)`.
    ///
    /// Every page the rectangle touches is sent with its own window, limited to
    /// `x1..=x2`. A page flag is cleared only when the whole page width went out.
    pub fn flush_area(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<(), DriverError<T::Error>> {
        let plan = self.fb.flush_region(x1, y1, x2, y2)?;
        let full_width = x1 == 0 && x2 == self.fb.width() - 1;
        log::debug!("ssd1306 flush x {:?} pages {:?}", plan.columns, plan.pages);

        for span in plan.page_spans() {
            send_span(&mut self.transport, &self.fb, &span, x1, x2).map_err(DriverError::Transport)?;
            if full_width {
                self.fb.clear_page_dirty(span.page);
            }
        }
        Ok(())
    }

    /// Send every dirty page and clear its flag. Returns the number of pages sent.
    ///
    /// Stops at the first transport error; that page and the ones after it
    /// stay dirty for the next call.
    pub fn redraw(&mut self) -> Result<usize, DriverError<T::Error>> {
        let last_col = self.fb.width() - 1;
        let mut sent = 0;
        let mut from = 0;
        while let Some(span) = self.fb.next_dirty_page(from) {
            if let Err(e) = send_span(&mut self.transport, &self.fb, &span, 0, last_col) {
                log::warn!("ssd1306 redraw aborted at page {}: {:?}", span.page, e);
                return Err(DriverError::Transport(e));
            }
            log::trace!("ssd1306 page {} sent", span.page);
            self.fb.clear_page_dirty(span.page);
            from = span.page + 1;
            sent += 1;
        }
        Ok(sent)
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DriverError<T::Error>> {
        self.command(if on { DISPLAY_ON } else { DISPLAY_OFF }, &[])
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DriverError<T::Error>> {
        self.command(CONTRAST, &[contrast])
    }

    /// Hardware inversion; the buffer is left as is.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError<T::Error>> {
        self.command(if inverted { INVERT_DISPLAY } else { NORMAL_DISPLAY }, &[])
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

    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DriverError<T::Error>> {
        self.transport
            .write_command_with_params(cmd, params)
            .map_err(DriverError::Transport)
    }
}

fn send_span<T: DisplayTransport>(
    transport: &mut T,
    fb: &MonoFramebuffer,
    span: &PageSpan,
    first_col: u16,
    last_col: u16,
) -> Result<(), T::Error> {
    let page = span.page as u8;
    transport.write_command_with_params(COLUMN_ADDR, &[first_col as u8, last_col as u8])?;
    transport.write_command_with_params(PAGE_ADDR, &[page, page])?;
    // row-major pages are always contiguous
    let range = span.as_range().unwrap_or(span.start..span.start);
    transport.write_data(&fb.as_bytes()[range])
}

// -------------------- embedded-graphics integration --------------------

impl<T> OriginDimensions for Ssd1306<T> {
    fn size(&self) -> Size {
        self.fb.size()
    }
}

impl<T> DrawTarget for Ssd1306<T> {
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

impl<T: DisplayTransport> GuiDisplay for Ssd1306<T> {
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

    fn round_area(&self, area: &Rectangle) -> Rectangle {
        self.fb.round_area(area)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: BinaryColor) -> bool {
        self.fb.set_lit(x, y, color.is_on()).is_ok()
    }

    fn fill_area(&mut self, area: &Rectangle, color: BinaryColor) {
        let _ = self.fb.fill_solid(area, color);
    }
}
