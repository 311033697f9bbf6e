//! Column width calculation for invoice tables

use crate::catalog::ColumnType;
use crate::constants::*;
use crate::constraints::{AdaptiveConstraints, adaptive_constraints};
use crate::paper::PageSize;
use tracing::{debug, instrument, trace};

/// Resolved width of one table column
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnWidth {
    pub id: String,
    /// Width in whole pixels
    pub width: u32,
}

/// Which solver pass produced a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutPass {
    /// Every column fits at its optimal width
    Optimal,
    /// Uniform scale-down, clamped at the minimums, was enough
    Proportional,
    /// Excess was redistributed over the columns still above their minimum
    Redistributed { iterations: usize },
}

/// Calculated layout for a table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResult {
    /// Column widths in display order, index column first
    pub widths: Vec<ColumnWidth>,
    /// Font size the widths were computed for, always the requested one
    pub font_size: f32,
    pub pass: LayoutPass,
    /// Printable width of the page in px
    pub available_width: f32,
    /// Whether the columns still exceed the printable width at their minimums
    pub overflow: bool,
}

impl LayoutResult {
    /// A layout with no columns at all
    pub fn empty(page_size: PageSize, font_size: f32) -> Self {
        Self {
            widths: Vec::new(),
            font_size,
            pass: LayoutPass::Optimal,
            available_width: page_size.available_width_px(),
            overflow: false,
        }
    }

    /// Width of a column by id
    pub fn width(&self, id: &str) -> Option<u32> {
        self.widths.iter().find(|c| c.id == id).map(|c| c.width)
    }

    pub fn total_width(&self) -> u32 {
        self.widths.iter().map(|c| c.width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn overflows(&self) -> bool {
        self.overflow
    }
}

#[derive(Debug)]
struct Slot<'a> {
    id: &'a str,
    column_type: ColumnType,
    width: f32,
    min_width: f32,
}

impl Slot<'_> {
    fn is_reducible(&self) -> bool {
        self.width > self.min_width
    }

    fn reduction_factor(&self) -> f32 {
        match self.column_type {
            ColumnType::PrimaryText => PRIMARY_TEXT_REDUCTION_FACTOR,
            _ => 1.0,
        }
    }
}

fn total(slots: &[Slot<'_>]) -> f32 {
    slots.iter().map(|s| s.width).sum()
}

/// Calculate the width of every column for a page and font size.
///
/// A synthetic index column is always placed first. Columns start at their
/// optimal width scaled by `font_size / 9`; if that overflows the printable
/// width they are scaled down uniformly (never below their minimum), and any
/// remaining excess is shaved off the columns still above their minimum for
/// up to five rounds. Overflow that survives all of this is reported, not
/// resolved: the font size is never changed.
#[instrument(skip(columns), fields(column_count = columns.len()))]
pub fn compute_widths<S: AsRef<str>>(
    page_size: PageSize,
    columns: &[(S, ColumnType)],
    font_size: f32,
) -> LayoutResult {
    let available_width = page_size.available_width_px();
    let constraints = adaptive_constraints(page_size);
    let font_scale = font_size / REFERENCE_FONT_SIZE;

    debug!(
        "Calculating widths for {} columns, {:.1}px available",
        columns.len() + 1,
        available_width
    );

    let mut slots = Vec::with_capacity(columns.len() + 1);
    slots.push(new_slot(
        INDEX_COLUMN_ID,
        ColumnType::Index,
        &constraints,
        font_scale,
    ));
    for (id, column_type) in columns {
        slots.push(new_slot(id.as_ref(), *column_type, &constraints, font_scale));
    }

    // First pass: optimal widths
    let optimal_total = total(&slots);
    if optimal_total <= available_width {
        trace!("Optimal widths fit: {:.1}px", optimal_total);
        return finish(slots, font_size, LayoutPass::Optimal, available_width, false);
    }

    // Second pass: scale down proportionally, clamped at the minimums
    let scale = available_width / optimal_total;
    for slot in &mut slots {
        slot.width = (slot.width * scale).max(slot.min_width);
    }

    let mut current_total = total(&slots);
    trace!(
        "Proportional scale {:.3} gives {:.1}px",
        scale, current_total
    );
    if current_total <= available_width {
        return finish(
            slots,
            font_size,
            LayoutPass::Proportional,
            available_width,
            false,
        );
    }

    // Third pass: redistribute the excess over columns above their minimum
    let mut iterations = 0;
    while current_total > available_width && iterations < MAX_REDISTRIBUTION_ITERATIONS {
        let excess = current_total - available_width;
        let reducible = slots.iter().filter(|s| s.is_reducible()).count();
        if reducible == 0 {
            trace!("All columns at their minimum, {:.1}px over", excess);
            break;
        }

        let share = excess / reducible as f32;
        for slot in slots.iter_mut().filter(|s| s.is_reducible()) {
            let reduction = share * slot.reduction_factor();
            slot.width = (slot.width - reduction).max(slot.min_width);
        }

        current_total = total(&slots);
        iterations += 1;
        trace!(
            "Redistribution round {}: {:.1}px over {} columns, total {:.1}px",
            iterations, excess, reducible, current_total
        );
    }

    let overflow = current_total > available_width;
    if overflow {
        debug!(
            "Table overflows printable width by {:.1}px",
            current_total - available_width
        );
    }

    finish(
        slots,
        font_size,
        LayoutPass::Redistributed { iterations },
        available_width,
        overflow,
    )
}

fn new_slot<'a>(
    id: &'a str,
    column_type: ColumnType,
    constraints: &AdaptiveConstraints,
    font_scale: f32,
) -> Slot<'a> {
    let constraint = constraints.get(column_type);
    Slot {
        id,
        column_type,
        width: constraint.optimal * font_scale,
        min_width: constraint.min * font_scale,
    }
}

fn finish(
    slots: Vec<Slot<'_>>,
    font_size: f32,
    pass: LayoutPass,
    available_width: f32,
    overflow: bool,
) -> LayoutResult {
    let widths = slots
        .into_iter()
        .map(|slot| ColumnWidth {
            id: slot.id.to_string(),
            width: slot.width.round() as u32,
        })
        .collect();

    LayoutResult {
        widths,
        font_size,
        pass,
        available_width,
        overflow,
    }
}
