//! Panel geometry and bit conventions, fixed when a framebuffer is built.
//!
//! Presets cover the panels the drivers in this crate talk to. Anything else can
//! be described with `PanelConfig::new(..)` and the `with_*` methods, then checked
//! with [`PanelConfig::validate`].

use core::fmt;

use crate::layout::{AddressingLayout, BitOrder, BitPolarity, COLUMN_BYTES, PAGE_WIDTH};

// Brightness cutoff used by the VFD path: anything brighter than this is lit.
pub const DEFAULT_BRIGHTNESS_THRESHOLD: u8 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub width: u16,
    pub height: u16,
    pub layout: AddressingLayout,
    pub polarity: BitPolarity,
    pub threshold: u8,
    pub bit_order: BitOrder,
}

/// Configuration rejected by [`PanelConfig::validate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSize,
    UnsupportedGeometry {
        layout: AddressingLayout,
        width: u16,
        height: u16,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSize => f.write_str("panel width and height must be non-zero"),
            ConfigError::UnsupportedGeometry { layout, width, height } => {
                write!(f, "{width}x{height} cannot be addressed with {layout} layout")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

impl PanelConfig {
    pub const fn new(width: u16, height: u16, layout: AddressingLayout) -> Self {
        Self {
            width,
            height,
            layout,
            polarity: BitPolarity::SetMeansOn,
            threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            bit_order: BitOrder::LsbFirst,
        }
    }

    /// SSD1306 128x64 OLED.
    pub const fn ssd1306_128x64() -> Self {
        Self::new(128, 64, AddressingLayout::RowMajorPage128)
    }

    /// SSD1306 128x32 OLED.
    pub const fn ssd1306_128x32() -> Self {
        Self::new(128, 32, AddressingLayout::RowMajorPage128)
    }

    /// Noritake GU128x32 dot-matrix VFD (GU-900 series command set).
    pub const fn gu128x32() -> Self {
        Self::new(128, 32, AddressingLayout::ColumnMajor4Byte).with_bit_order(BitOrder::MsbFirst)
    }

    pub const fn with_polarity(mut self, polarity: BitPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub const fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Buffer length in bytes: `ceil(width * height / 8)`.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        (self.width as usize * self.height as usize + 7) / 8
    }

    /// Number of 8-row pages: `ceil(height / 8)`.
    #[inline]
    pub fn page_count(&self) -> usize {
        (self.height as usize + 7) / 8
    }

    /// The fixed layouts only form a bijection onto the buffer for these shapes:
    /// row-major needs exactly 128 columns and whole pages, column-major exactly
    /// 4 pages (32 rows).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize);
        }
        let ok = match self.layout {
            AddressingLayout::RowMajorPage128 => {
                self.width as usize == PAGE_WIDTH && self.height % 8 == 0
            }
            AddressingLayout::ColumnMajor4Byte => self.height as usize == COLUMN_BYTES * 8,
        };
        if !ok {
            return Err(ConfigError::UnsupportedGeometry {
                layout: self.layout,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for cfg in [
            PanelConfig::ssd1306_128x64(),
            PanelConfig::ssd1306_128x32(),
            PanelConfig::gu128x32(),
        ] {
            assert_eq!(cfg.validate(), Ok(()));
        }
    }

    #[test]
    fn buffer_and_page_sizes() {
        let oled = PanelConfig::ssd1306_128x64();
        assert_eq!(oled.buffer_len(), 1024);
        assert_eq!(oled.page_count(), 8);

        let vfd = PanelConfig::gu128x32();
        assert_eq!(vfd.buffer_len(), 512);
        assert_eq!(vfd.page_count(), 4);
        assert_eq!(vfd.bit_order, BitOrder::MsbFirst);
    }

    #[test]
    fn rejects_geometry_the_layout_cannot_address() {
        let narrow = PanelConfig::new(64, 64, AddressingLayout::RowMajorPage128);
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::UnsupportedGeometry { width: 64, .. })
        ));

        let tall_vfd = PanelConfig::new(128, 64, AddressingLayout::ColumnMajor4Byte);
        assert!(tall_vfd.validate().is_err());

        let zero = PanelConfig::new(0, 32, AddressingLayout::ColumnMajor4Byte);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroSize));
    }

    #[test]
    fn builder_methods_override_defaults() {
        let cfg = PanelConfig::ssd1306_128x64()
            .with_polarity(BitPolarity::SetMeansOff)
            .with_threshold(127);
        assert_eq!(cfg.polarity, BitPolarity::SetMeansOff);
        assert_eq!(cfg.threshold, 127);
        assert_eq!(cfg.bit_order, BitOrder::LsbFirst);
    }
}
