//! Error types for the invoice-layout library

use thiserror::Error;

/// Result type alias using InvoiceError
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Errors that can occur when configuring an invoice template
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Page size identifier outside the supported set
    #[error("Unknown page size: '{0}'")]
    UnknownPageSize(String),

    /// Aggregation rejected at creation
    #[error("Invalid aggregation: {0}")]
    InvalidAggregation(String),

    /// Field catalog failed validation
    #[error("Invalid field catalog: {0}")]
    InvalidCatalog(String),

    /// Field catalog could not be parsed
    #[cfg(feature = "serde")]
    #[error("Field catalog parsing failed: {0}")]
    CatalogParse(#[from] serde_json::Error),
}
