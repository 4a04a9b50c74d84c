//! Monochrome bit-packed framebuffer with per-page dirty tracking.
//!
//! The buffer never talks to hardware. Drivers ask it for a [`TransmitPlan`]
//! (explicit region flush) or walk [`DirtyPages`] (lazy resync), send the bytes,
//! and only then clear the page flags. A failed transmit therefore leaves the
//! page dirty and the next redraw picks it up again.

use core::convert::Infallible;
use core::fmt;
use core::ops::{Range, RangeInclusive};

use alloc::boxed::Box;
use alloc::vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Brightness;
use crate::config::{ConfigError, PanelConfig};
use crate::layout::AddressingLayout;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Pixel outside `[0, width) x [0, height)`.
    OutOfRange { x: u16, y: u16 },
    /// Region corners not ordered (`x1 > x2` or `y1 > y2`).
    InvalidRegion,
    /// Page index past the last page.
    InvalidPage(usize),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::OutOfRange { x, y } => write!(f, "pixel ({x}, {y}) is outside the panel"),
            CodecError::InvalidRegion => f.write_str("region corners are not ordered"),
            CodecError::InvalidPage(p) => write!(f, "page {p} does not exist"),
        }
    }
}

impl core::error::Error for CodecError {}

/// The bytes of one page, optionally restricted to a column range.
///
/// Row-major pages are contiguous (`stride == 1`); column-major pages hold one
/// byte per column spaced `stride` bytes apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageSpan {
    pub page: usize,
    pub start: usize,
    pub len: usize,
    pub stride: usize,
}

impl PageSpan {
    fn new(layout: AddressingLayout, page: usize, first_col: u16, last_col: u16) -> Self {
        let (origin, stride) = layout.page_origin(page);
        Self {
            page,
            start: origin + first_col as usize * stride,
            len: (last_col - first_col) as usize + 1,
            stride,
        }
    }

    /// Contiguous byte range, if the span has no gaps.
    pub fn as_range(&self) -> Option<Range<usize>> {
        (self.stride == 1).then(|| self.start..self.start + self.len)
    }

    /// Buffer index of every byte in the span, left to right.
    pub fn byte_indices(&self) -> impl Iterator<Item = usize> {
        let (start, stride) = (self.start, self.stride);
        (0..self.len).map(move |i| start + i * stride)
    }
}

/// What a driver must send to resync an inclusive rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransmitPlan {
    /// `byte_index(x1, y1) ..= byte_index(x2, y2)` under the active layout.
    pub bytes: RangeInclusive<usize>,
    /// `y1 >> 3 ..= y2 >> 3`.
    pub pages: RangeInclusive<usize>,
    /// `x1 ..= x2`.
    pub columns: RangeInclusive<u16>,
    layout: AddressingLayout,
}

impl TransmitPlan {
    /// One span per page, each restricted to the plan's columns.
    pub fn page_spans(&self) -> PageSpans {
        PageSpans {
            layout: self.layout,
            pages: self.pages.clone(),
            first_col: *self.columns.start(),
            last_col: *self.columns.end(),
        }
    }
}

pub struct PageSpans {
    layout: AddressingLayout,
    pages: RangeInclusive<usize>,
    first_col: u16,
    last_col: u16,
}

impl Iterator for PageSpans {
    type Item = PageSpan;

    fn next(&mut self) -> Option<PageSpan> {
        let page = self.pages.next()?;
        Some(PageSpan::new(self.layout, page, self.first_col, self.last_col))
    }
}

/// Lazy walk over pages that are still dirty, in ascending order.
pub struct DirtyPages<'a> {
    fb: &'a MonoFramebuffer,
    next: usize,
}

impl Iterator for DirtyPages<'_> {
    type Item = PageSpan;

    fn next(&mut self) -> Option<PageSpan> {
        let span = self.fb.next_dirty_page(self.next)?;
        self.next = span.page + 1;
        Some(span)
    }
}

/// 1-bit-per-pixel display RAM mirror.
pub struct MonoFramebuffer {
    config: PanelConfig,
    buf: Box<[u8]>,
    dirty: Box<[bool]>,
}

impl MonoFramebuffer {
    /// Allocate a buffer with every pixel unlit under the configured polarity.
    /// Every page starts clean.
    pub fn new(config: PanelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let blank = if config.polarity.bit_for(false) { 0xFF } else { 0x00 };
        Ok(Self {
            config,
            buf: vec![blank; config.buffer_len()].into_boxed_slice(),
            dirty: vec![false; config.page_count()].into_boxed_slice(),
        })
    }

    #[inline]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.config.height
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.dirty.len()
    }

    /// Raw display RAM image.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    fn check(&self, x: u16, y: u16) -> Result<(), CodecError> {
        if x >= self.config.width || y >= self.config.height {
            return Err(CodecError::OutOfRange { x, y });
        }
        Ok(())
    }

    /// `(byte_index, bit_index)` of a pixel.
    pub fn pack(&self, x: u16, y: u16) -> Result<(usize, u8), CodecError> {
        self.check(x, y)?;
        Ok(self.config.layout.pack(x, y))
    }

    /// Pixel addressed by `(byte_index, bit_index)`, if it lies on the panel.
    pub fn unpack(&self, byte_index: usize, bit_index: u8) -> Option<(u16, u16)> {
        if byte_index >= self.buf.len() {
            return None;
        }
        self.config
            .layout
            .unpack(byte_index, bit_index)
            .filter(|&(x, y)| x < self.config.width && y < self.config.height)
    }

    /// Threshold `color` and store it. Any write marks the page dirty, even when
    /// the bit already had that value.
    pub fn set_pixel<C: Brightness>(&mut self, x: u16, y: u16, color: C) -> Result<(), CodecError> {
        let lit = color.brightness() > self.config.threshold;
        self.set_lit(x, y, lit)
    }

    pub fn set_lit(&mut self, x: u16, y: u16, lit: bool) -> Result<(), CodecError> {
        self.check(x, y)?;
        let (byte, bit) = self.config.layout.pack(x, y);
        let mask = self.config.bit_order.mask(bit);
        if self.config.polarity.bit_for(lit) {
            self.buf[byte] |= mask;
        } else {
            self.buf[byte] &= !mask;
        }
        self.dirty[(y >> 3) as usize] = true;
        Ok(())
    }

    /// Raw bit at `(x, y)`, before polarity is applied.
    pub fn raw_bit(&self, x: u16, y: u16) -> Result<bool, CodecError> {
        let (byte, bit) = self.pack(x, y)?;
        Ok(self.buf[byte] & self.config.bit_order.mask(bit) != 0)
    }

    /// Whether `(x, y)` is lit.
    pub fn pixel(&self, x: u16, y: u16) -> Result<bool, CodecError> {
        let raw = self.raw_bit(x, y)?;
        Ok(self.config.polarity.bit_for(raw))
    }

    /// Set every pixel lit or unlit and dirty every page.
    pub fn fill(&mut self, lit: bool) {
        let byte = if self.config.polarity.bit_for(lit) { 0xFF } else { 0x00 };
        self.buf.fill(byte);
        self.mark_all_dirty();
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    pub fn is_page_dirty(&self, page: usize) -> bool {
        self.dirty.get(page).copied().unwrap_or(false)
    }

    pub fn clear_page_dirty(&mut self, page: usize) {
        if let Some(flag) = self.dirty.get_mut(page) {
            *flag = false;
        }
    }

    /// Byte and page ranges covering the inclusive rectangle `(x1, y1)..(x2, y2)`.
    pub fn flush_region(&self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<TransmitPlan, CodecError> {
        if x1 > x2 || y1 > y2 {
            return Err(CodecError::InvalidRegion);
        }
        let (first, _) = self.pack(x1, y1)?;
        let (last, _) = self.pack(x2, y2)?;
        Ok(TransmitPlan {
            bytes: first..=last,
            pages: (y1 >> 3) as usize..=(y2 >> 3) as usize,
            columns: x1..=x2,
            layout: self.config.layout,
        })
    }

    /// Full-width span of a page.
    pub fn page_span(&self, page: usize) -> Result<PageSpan, CodecError> {
        if page >= self.dirty.len() {
            return Err(CodecError::InvalidPage(page));
        }
        Ok(PageSpan::new(self.config.layout, page, 0, self.config.width - 1))
    }

    /// First dirty page at or after `from`.
    pub fn next_dirty_page(&self, from: usize) -> Option<PageSpan> {
        let page = (from..self.dirty.len()).find(|&p| self.dirty[p])?;
        self.page_span(page).ok()
    }

    /// Pages written since their last clear. Flags are left alone; the caller
    /// clears each page once it has been transmitted.
    pub fn redraw_dirty_pages(&self) -> DirtyPages<'_> {
        DirtyPages { fb: self, next: 0 }
    }

    /// Widen `area` to whole pages, clipped to the panel. Controllers that address
    /// RAM a page at a time cannot update part of a page's rows.
    pub fn round_area(&self, area: &Rectangle) -> Rectangle {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Rectangle::zero();
        };
        let top = clipped.top_left.y & !7;
        let bottom = (bottom_right.y | 7).min(self.config.height as i32 - 1);
        Rectangle::with_corners(
            Point::new(clipped.top_left.x, top),
            Point::new(bottom_right.x, bottom),
        )
    }
}

impl OriginDimensions for MonoFramebuffer {
    fn size(&self) -> Size {
        Size::new(self.config.width as u32, self.config.height as u32)
    }
}

impl DrawTarget for MonoFramebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        let (w, h) = (self.config.width as i32, self.config.height as i32);
        for Pixel(p, c) in pixels {
            // clip, primitives may overhang the panel
            if p.x < 0 || p.y < 0 || p.x >= w || p.y >= h {
                continue;
            }
            let _ = self.set_lit(p.x as u16, p.y as u16, c.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
