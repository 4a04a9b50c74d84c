//! Brightness predicate for colors written into a monochrome panel.

use embedded_graphics::pixelcolor::{BinaryColor, Gray8, Rgb565, Rgb888};
use embedded_graphics::prelude::{GrayColor, RgbColor};

/// A color that can be reduced to a 0..=255 brightness and thresholded.
pub trait Brightness {
    fn brightness(&self) -> u8;
}

impl Brightness for BinaryColor {
    #[inline]
    fn brightness(&self) -> u8 {
        if self.is_on() { u8::MAX } else { 0 }
    }
}

impl Brightness for Gray8 {
    #[inline]
    fn brightness(&self) -> u8 {
        self.luma()
    }
}

impl Brightness for u8 {
    #[inline]
    fn brightness(&self) -> u8 {
        *self
    }
}

// Weighted sum (2R + 5G + B) / 8 on channels widened to 8 bits.
#[inline]
fn weighted(r8: u32, g8: u32, b8: u32) -> u8 {
    ((r8 * 2 + g8 * 5 + b8) >> 3) as u8
}

impl Brightness for Rgb565 {
    fn brightness(&self) -> u8 {
        let r8 = self.r() as u32 * 255 / Rgb565::MAX_R as u32;
        let g8 = self.g() as u32 * 255 / Rgb565::MAX_G as u32;
        let b8 = self.b() as u32 * 255 / Rgb565::MAX_B as u32;
        weighted(r8, g8, b8)
    }
}

impl Brightness for Rgb888 {
    fn brightness(&self) -> u8 {
        weighted(self.r() as u32, self.g() as u32, self.b() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_full_range() {
        assert_eq!(BinaryColor::On.brightness(), 255);
        assert_eq!(BinaryColor::Off.brightness(), 0);
        assert_eq!(Rgb565::WHITE.brightness(), 255);
        assert_eq!(Rgb565::BLACK.brightness(), 0);
        assert_eq!(Rgb888::WHITE.brightness(), 255);
    }

    #[test]
    fn green_outweighs_blue() {
        assert!(Rgb888::GREEN.brightness() > Rgb888::BLUE.brightness());
        assert!(Rgb565::GREEN.brightness() > Rgb565::RED.brightness());
    }

    #[test]
    fn gray_is_its_luma() {
        assert_eq!(Gray8::new(42).brightness(), 42);
    }
}
