//! Constants for page geometry and column sizing

/// Pixels per millimetre at 96 DPI
pub const PX_PER_MM: f32 = 3.779_527_6;

/// Page width all base column constraints are defined against (A4), in mm
pub const REFERENCE_PAGE_WIDTH_MM: f32 = 210.0;

/// Page margin on the reference page, in mm
pub const REFERENCE_PAGE_MARGIN_MM: f32 = 12.0;

/// Smallest page margin a scaled page may get, in mm
pub const MIN_PAGE_MARGIN_MM: f32 = 8.0;

/// Extra shrink applied to A5 column constraints on top of the width ratio
pub const A5_SHRINK_FACTOR: f32 = 0.85;

/// Font size the base column constraints are tuned for, in px
pub const REFERENCE_FONT_SIZE: f32 = 9.0;

/// Default template font size in px
pub const DEFAULT_FONT_SIZE: f32 = 9.0;

/// Smallest font size the editor offers, in px
pub const MIN_FONT_SIZE: f32 = 7.0;

/// Largest font size the editor offers, in px
pub const MAX_FONT_SIZE: f32 = 12.0;

/// Maximum number of excess-redistribution passes in the solver
pub const MAX_REDISTRIBUTION_ITERATIONS: usize = 5;

/// Reduction weight for primary-text columns during redistribution
pub const PRIMARY_TEXT_REDUCTION_FACTOR: f32 = 0.7;

/// Cell padding on A5 pages, in px
pub const COMPACT_CELL_PADDING: f32 = 6.0;

/// Cell padding on every other page size, in px
pub const DEFAULT_CELL_PADDING: f32 = 8.0;

/// Id of the synthetic row-number column
pub const INDEX_COLUMN_ID: &str = "index";

/// Prefix for generated aggregation ids
pub const AGGREGATION_ID_PREFIX: &str = "agg_";
