//! Glue between a GUI library's display callbacks and a panel driver.
//!
//! The GUI side holds a [`Registration`] per display. It carries the driver as
//! explicit context, so callbacks never go through a global instance, and it
//! only forwards optional callbacks the driver advertises in its
//! [`Capabilities`]. Several displays live in a [`DisplayRegistry`] owned by
//! the caller, one of them marked as the default.

use core::fmt::Debug;
use core::ops::BitOr;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

/// Optional callbacks a display supports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Widens invalidated areas to what the controller can address.
    pub const ROUNDER: Self = Self(1 << 0);
    /// Writes single pixels straight into the panel buffer.
    pub const SET_PIXEL: Self = Self(1 << 1);
    /// Wants per-refresh timing reports.
    pub const MONITOR: Self = Self(1 << 2);
    /// Fills solid areas itself instead of taking a rendered buffer.
    pub const GPU_FILL: Self = Self(1 << 3);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A display as seen by the GUI library.
///
/// Off-panel pixels are clipped on every path, as `DrawTarget` does:
/// `flush` and `fill_area` drop the part outside the panel, and `set_pixel`
/// reports `false` without storing anything.
pub trait GuiDisplay {
    type Error: Debug;

    fn resolution(&self) -> Size;

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Store `colors` (row-major over `area`) and push `area` to the panel.
    fn flush<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = BinaryColor>;

    fn round_area(&self, area: &Rectangle) -> Rectangle {
        *area
    }

    /// Store one pixel. `false` when `(x, y)` is off the panel.
    fn set_pixel(&mut self, _x: u16, _y: u16, _color: BinaryColor) -> bool {
        false
    }

    /// Paint `area` with `color` in the panel buffer. Nothing is sent.
    fn fill_area(&mut self, _area: &Rectangle, _color: BinaryColor) {}

    fn monitor(&mut self, _elapsed_ms: u32, _pixels: u32) {}
}

/// Per-display context handed to the GUI library.
pub struct Registration<'d, D: GuiDisplay> {
    display: &'d mut D,
    caps: Capabilities,
}

impl<'d, D: GuiDisplay> Registration<'d, D> {
    pub fn new(display: &'d mut D) -> Self {
        let caps = display.capabilities();
        log::debug!("registering {:?} display, caps {:#05b}", display.resolution(), caps.0);
        Self { display, caps }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn resolution(&self) -> Size {
        self.display.resolution()
    }

    pub fn flush<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), D::Error>
    where
        I: IntoIterator<Item = BinaryColor>,
    {
        self.display.flush(area, colors)
    }

    /// Area the GUI should invalidate instead of `area`.
    pub fn round(&self, area: &Rectangle) -> Rectangle {
        if self.caps.contains(Capabilities::ROUNDER) {
            self.display.round_area(area)
        } else {
            *area
        }
    }

    /// Returns `false` when the display has no direct pixel path or the pixel
    /// is off the panel; the GUI then renders into its own buffer and calls
    /// [`flush`](Self::flush).
    pub fn set_pixel(&mut self, x: u16, y: u16, color: BinaryColor) -> bool {
        self.caps.contains(Capabilities::SET_PIXEL) && self.display.set_pixel(x, y, color)
    }

    /// Returns `false` when the display cannot fill by itself.
    pub fn gpu_fill(&mut self, area: &Rectangle, color: BinaryColor) -> bool {
        if !self.caps.contains(Capabilities::GPU_FILL) {
            return false;
        }
        self.display.fill_area(area, color);
        true
    }

    pub fn monitor(&mut self, elapsed_ms: u32, pixels: u32) -> bool {
        if !self.caps.contains(Capabilities::MONITOR) {
            return false;
        }
        self.display.monitor(elapsed_ms, pixels);
        true
    }

    pub fn display(&mut self) -> &mut D {
        self.display
    }
}

/// Handle returned by [`DisplayRegistry::add`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayId(usize);

/// Up to `N` displays registered with the GUI, plus which one is the default.
///
/// The first display added becomes the default until
/// [`set_default`](Self::set_default) picks another.
pub struct DisplayRegistry<'d, D: GuiDisplay, const N: usize> {
    slots: Vec<Registration<'d, D>, N>,
    default: Option<usize>,
}

impl<'d, D: GuiDisplay, const N: usize> DisplayRegistry<'d, D, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new(), default: None }
    }

    /// Register `display`. Hands it back when all `N` slots are taken.
    pub fn add(&mut self, display: &'d mut D) -> Result<DisplayId, &'d mut D> {
        let id = self.slots.len();
        if let Err(rejected) = self.slots.push(Registration::new(display)) {
            log::warn!("display registry full ({} slots)", N);
            return Err(rejected.display);
        }
        self.default.get_or_insert(id);
        Ok(DisplayId(id))
    }

    /// `false` when `id` is not from this registry.
    pub fn set_default(&mut self, id: DisplayId) -> bool {
        if id.0 >= self.slots.len() {
            return false;
        }
        self.default = Some(id.0);
        true
    }

    pub fn default_id(&self) -> Option<DisplayId> {
        self.default.map(DisplayId)
    }

    pub fn default_display(&mut self) -> Option<&mut Registration<'d, D>> {
        let idx = self.default?;
        self.slots.get_mut(idx)
    }

    pub fn get(&mut self, id: DisplayId) -> Option<&mut Registration<'d, D>> {
        self.slots.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (DisplayId, &mut Registration<'d, D>)> {
        self.slots.iter_mut().enumerate().map(|(i, r)| (DisplayId(i), r))
    }
}

impl<'d, D: GuiDisplay, const N: usize> Default for DisplayRegistry<'d, D, N> {
    fn default() -> Self {
        Self::new()
    }
}
