//! An adaptive column-width layout engine for configurable invoice tables
//!
//! This library keeps a user-configured invoice table inside the printable
//! width of a page. Columns get per-type optimal and minimum widths scaled to
//! the paper size and font size, and are compressed in passes when they do not
//! fit, protecting product names the longest.
//!
//! ```
//! use invoice_layout::{AggregationMode, FieldCatalog, PageSize, Template};
//!
//! let catalog = FieldCatalog::default();
//! let (template, _) = Template::default()
//!     .create_aggregation(&catalog, &["tp", "rp"], "Prices", AggregationMode::Replace)?;
//!
//! let layout = template.layout(&catalog, PageSize::A5);
//! assert!(layout.width("index").is_some());
//! # Ok::<(), invoice_layout::InvoiceError>(())
//! ```

pub mod aggregation;
pub mod catalog;
pub mod constants;
pub mod constraints;
pub mod data;
pub mod error;
pub mod layout;
pub mod paper;
pub mod template;

pub use aggregation::{
    Aggregation, AggregationMode, ResolvedColumn, resolve_effective_columns, row_value,
};
pub use catalog::{ColumnSpec, ColumnType, FieldCatalog, Section};
pub use constraints::{AdaptiveConstraints, WidthConstraint, adaptive_constraints};
pub use data::{CellValue, InvoiceData, LineItem, format_cell};
pub use error::{InvoiceError, Result};
pub use layout::{ColumnWidth, LayoutPass, LayoutResult, compute_widths};
pub use paper::{PageSize, mm_to_px};
pub use template::{MoveDirection, SummaryLayout, Template, TemplateOptions};
