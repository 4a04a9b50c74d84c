//! Addressing rules for 1-bit-per-pixel panel memory.
//!
//! Every supported controller stores 8 vertically stacked pixels in one byte
//! ("vertical byte" mapping). What differs between panel families is where a
//! given column/page byte sits in the linear buffer:
//!
//! - `ColumnMajor4Byte`: each column is 4 bytes tall (Noritake GU 128x32 VFD),
//!   `byte = x*4 + (y >> 3)`.
//! - `RowMajorPage128`: pages of 128 bytes, one per column (SSD1306 family),
//!   `byte = x + ((y >> 3) << 7)`.
//!
//! The bit inside the byte is always the row inside the page (`y mod 8`); which
//! physical bit that is depends on [`BitOrder`].

use core::fmt;

// Bytes per column for the column-major VFD layout.
pub const COLUMN_BYTES: usize = 4;

// Bytes per page for the row-major OLED layout.
pub const PAGE_WIDTH: usize = 128;

/// Memory layout of the panel's display RAM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressingLayout {
    ColumnMajor4Byte,
    RowMajorPage128,
}

/// Which buffer bit value means a lit pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitPolarity {
    SetMeansOn,
    SetMeansOff,
}

/// Which physical bit of a byte holds the top row of a page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitOrder {
    /// Row 0 of the page is bit 0 (SSD1306).
    LsbFirst,
    /// Row 0 of the page is bit 7 (Noritake GU-series).
    MsbFirst,
}

impl AddressingLayout {
    /// Byte index holding pixel `(x, y)`.
    #[inline]
    pub fn byte_index(self, x: u16, y: u16) -> usize {
        let (x, page) = (x as usize, (y >> 3) as usize);
        match self {
            AddressingLayout::ColumnMajor4Byte => x * COLUMN_BYTES + page,
            AddressingLayout::RowMajorPage128 => x + (page << 7),
        }
    }

    /// Bit index (row inside the page) of pixel `(x, y)`.
    #[inline]
    pub fn bit_index(y: u16) -> u8 {
        (y % 8) as u8
    }

    /// `(byte_index, bit_index)` for pixel `(x, y)`.
    #[inline]
    pub fn pack(self, x: u16, y: u16) -> (usize, u8) {
        (self.byte_index(x, y), Self::bit_index(y))
    }

    /// Inverse of [`pack`](Self::pack), without any bounds knowledge.
    /// Callers check the result against the panel size.
    pub fn unpack(self, byte_index: usize, bit_index: u8) -> Option<(u16, u16)> {
        if bit_index > 7 {
            return None;
        }
        let (x, page) = match self {
            AddressingLayout::ColumnMajor4Byte => {
                (byte_index / COLUMN_BYTES, byte_index % COLUMN_BYTES)
            }
            AddressingLayout::RowMajorPage128 => (byte_index % PAGE_WIDTH, byte_index >> 7),
        };
        let y = page * 8 + bit_index as usize;
        if x > u16::MAX as usize || y > u16::MAX as usize {
            return None;
        }
        Some((x as u16, y as u16))
    }

    /// First byte of `page` and distance between consecutive columns of that page.
    #[inline]
    pub fn page_origin(self, page: usize) -> (usize, usize) {
        match self {
            AddressingLayout::ColumnMajor4Byte => (page, COLUMN_BYTES),
            AddressingLayout::RowMajorPage128 => (page << 7, 1),
        }
    }
}

impl BitOrder {
    /// Mask selecting logical row `bit_index` of a page byte.
    #[inline]
    pub fn mask(self, bit_index: u8) -> u8 {
        match self {
            BitOrder::LsbFirst => 1 << bit_index,
            BitOrder::MsbFirst => 0x80 >> bit_index,
        }
    }
}

impl BitPolarity {
    /// Raw bit value that represents `lit`.
    #[inline]
    pub fn bit_for(self, lit: bool) -> bool {
        match self {
            BitPolarity::SetMeansOn => lit,
            BitPolarity::SetMeansOff => !lit,
        }
    }
}

impl fmt::Display for AddressingLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressingLayout::ColumnMajor4Byte => f.write_str("column-major (4 bytes/column)"),
            AddressingLayout::RowMajorPage128 => f.write_str("row-major (128 bytes/page)"),
        }
    }
}
