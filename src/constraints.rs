//! Per-type column width constraints and their page-size adaptation

use crate::catalog::ColumnType;
use crate::constants::REFERENCE_PAGE_WIDTH_MM;
use crate::paper::PageSize;
use tracing::trace;

/// Minimum and optimal width of a column, in px
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidthConstraint {
    pub min: f32,
    pub optimal: f32,
}

impl WidthConstraint {
    pub const fn new(min: f32, optimal: f32) -> Self {
        Self { min, optimal }
    }
}

/// Constraints on an A4 page at the reference font size
pub fn base_constraint(column_type: ColumnType) -> WidthConstraint {
    match column_type {
        ColumnType::PrimaryText => WidthConstraint::new(80.0, 120.0),
        ColumnType::Numeric => WidthConstraint::new(35.0, 50.0),
        ColumnType::SecondaryText => WidthConstraint::new(40.0, 60.0),
        ColumnType::Index => WidthConstraint::new(30.0, 40.0),
    }
}

/// Hard minimum no page size may scale a column below
pub fn absolute_floor(column_type: ColumnType) -> f32 {
    match column_type {
        ColumnType::PrimaryText => 60.0,
        ColumnType::Numeric => 28.0,
        ColumnType::SecondaryText => 32.0,
        ColumnType::Index => 25.0,
    }
}

/// Width constraints for every column type on one page size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConstraints {
    page_size: PageSize,
    by_type: [WidthConstraint; 4],
}

impl AdaptiveConstraints {
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn get(&self, column_type: ColumnType) -> WidthConstraint {
        self.by_type[column_type as usize]
    }
}

/// Scale the base constraints to a page size.
///
/// Each value is scaled by `width / 210mm` (with an extra shrink on A5) and
/// rounded, then clamped so that `optimal >= min >= absolute floor`.
pub fn adaptive_constraints(page_size: PageSize) -> AdaptiveConstraints {
    let ratio = page_size.width_mm() / REFERENCE_PAGE_WIDTH_MM * page_size.shrink_factor();

    let by_type = ColumnType::ALL.map(|column_type| {
        let base = base_constraint(column_type);
        let min = absolute_floor(column_type).max((base.min * ratio).round());
        let optimal = min.max((base.optimal * ratio).round());
        WidthConstraint { min, optimal }
    });

    trace!(
        "Adaptive constraints for {} (ratio {:.3}): {:?}",
        page_size, ratio, by_type
    );

    AdaptiveConstraints { page_size, by_type }
}
