//! Physical page geometry and unit conversion

use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::InvoiceError;

/// Supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
}

impl PageSize {
    /// Every supported size, in display order
    pub const ALL: [PageSize; 3] = [PageSize::A4, PageSize::A5, PageSize::Letter];

    /// Page width in millimetres
    pub fn width_mm(self) -> f32 {
        match self {
            PageSize::A4 => 210.0,
            PageSize::A5 => 148.0,
            PageSize::Letter => 215.9,
        }
    }

    /// Page height in millimetres
    pub fn height_mm(self) -> f32 {
        match self {
            PageSize::A4 => 297.0,
            PageSize::A5 => 210.0,
            PageSize::Letter => 279.4,
        }
    }

    /// Extra shrink on top of the width ratio when scaling column constraints
    pub fn shrink_factor(self) -> f32 {
        match self {
            PageSize::A5 => A5_SHRINK_FACTOR,
            _ => 1.0,
        }
    }

    /// Left/right page margin in mm.
    ///
    /// Proportional to the page width (12mm on A4), rounded to one decimal
    /// and never below 8mm.
    pub fn margin_mm(self) -> f32 {
        let scaled = REFERENCE_PAGE_MARGIN_MM * self.width_mm() / REFERENCE_PAGE_WIDTH_MM;
        let rounded = (scaled * 10.0).round() / 10.0;
        rounded.max(MIN_PAGE_MARGIN_MM)
    }

    /// Printable width between the margins, in px
    pub fn available_width_px(self) -> f32 {
        mm_to_px(self.width_mm() - 2.0 * self.margin_mm())
    }

    /// Horizontal padding inside each table cell, in px
    pub fn cell_padding_px(self) -> f32 {
        match self {
            PageSize::A5 => COMPACT_CELL_PADDING,
            _ => DEFAULT_CELL_PADDING,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "Letter",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageSize {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            _ => Err(InvoiceError::UnknownPageSize(s.to_string())),
        }
    }
}

/// Convert millimetres to pixels at 96 DPI
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}
