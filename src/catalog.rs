//! Catalog of selectable invoice fields and column classification

use std::collections::HashSet;

use crate::Result;
use crate::constants::INDEX_COLUMN_ID;
use crate::error::InvoiceError;

/// Semantic type of a table column, used to pick width constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColumnType {
    /// Product name / SKU, protected from aggressive shrinking
    PrimaryText,
    Numeric,
    /// Short text such as carton size; also the type of header and summary fields
    #[default]
    SecondaryText,
    /// Synthetic row-number column
    Index,
}

impl ColumnType {
    /// Every column type, in declaration order
    pub const ALL: [ColumnType; 4] = [
        ColumnType::PrimaryText,
        ColumnType::Numeric,
        ColumnType::SecondaryText,
        ColumnType::Index,
    ];
}

/// One selectable field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSpec {
    pub id: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new<I: Into<String>, L: Into<String>>(id: I, label: L, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_type,
        }
    }

    fn text<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self::new(id, label, ColumnType::SecondaryText)
    }

    fn number<I: Into<String>, L: Into<String>>(id: I, label: L) -> Self {
        Self::new(id, label, ColumnType::Numeric)
    }
}

/// Document section a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Section {
    HeaderTopRow,
    HeaderLeft,
    HeaderRight,
    LineItems,
    Summary,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::HeaderTopRow,
        Section::HeaderLeft,
        Section::HeaderRight,
        Section::LineItems,
        Section::Summary,
    ];
}

/// Static catalog of available fields per section
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldCatalog {
    pub header_top_row: Vec<ColumnSpec>,
    pub header_left: Vec<ColumnSpec>,
    pub header_right: Vec<ColumnSpec>,
    pub line_items: Vec<ColumnSpec>,
    pub summary: Vec<ColumnSpec>,
}

impl FieldCatalog {
    /// Parse and validate a catalog from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: FieldCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        tracing::debug!(
            "Loaded field catalog with {} line-item columns",
            catalog.line_items.len()
        );
        Ok(catalog)
    }

    /// Check ids are non-blank, unique within their section and not reserved
    pub fn validate(&self) -> Result<()> {
        for section in Section::ALL {
            let mut seen = HashSet::new();
            for field in self.fields(section) {
                if field.id.trim().is_empty() {
                    return Err(InvoiceError::InvalidCatalog(format!(
                        "{:?} contains a field with a blank id",
                        section
                    )));
                }
                if field.id == INDEX_COLUMN_ID {
                    return Err(InvoiceError::InvalidCatalog(format!(
                        "{:?} uses the reserved id '{}'",
                        section, INDEX_COLUMN_ID
                    )));
                }
                if !seen.insert(field.id.as_str()) {
                    return Err(InvoiceError::InvalidCatalog(format!(
                        "{:?} lists '{}' more than once",
                        section, field.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fields available in a section, in catalog order
    pub fn fields(&self, section: Section) -> &[ColumnSpec] {
        match section {
            Section::HeaderTopRow => &self.header_top_row,
            Section::HeaderLeft => &self.header_left,
            Section::HeaderRight => &self.header_right,
            Section::LineItems => &self.line_items,
            Section::Summary => &self.summary,
        }
    }

    pub fn find(&self, section: Section, id: &str) -> Option<&ColumnSpec> {
        self.fields(section).iter().find(|f| f.id == id)
    }

    pub fn line_item(&self, id: &str) -> Option<&ColumnSpec> {
        self.find(Section::LineItems, id)
    }

    /// Whether any section declares this id
    pub fn contains_id(&self, id: &str) -> bool {
        Section::ALL
            .iter()
            .any(|&section| self.find(section, id).is_some())
    }

    /// Classify a line-item column id.
    ///
    /// Ids the catalog does not know (aggregation outputs among them) are
    /// numeric sums.
    pub fn classify(&self, id: &str) -> ColumnType {
        if id == INDEX_COLUMN_ID {
            return ColumnType::Index;
        }
        self.line_item(id)
            .map(|f| f.column_type)
            .unwrap_or(ColumnType::Numeric)
    }
}

impl Default for FieldCatalog {
    /// The standard distributor invoice catalog
    fn default() -> Self {
        Self {
            header_top_row: vec![
                ColumnSpec::text("companyName", "Company/Distributor Name"),
                ColumnSpec::text("invoiceType", "Invoice Type"),
            ],
            header_left: vec![
                ColumnSpec::text("customerName", "Customer Name"),
                ColumnSpec::text("cnic", "CNIC"),
                ColumnSpec::text("phone", "Phone"),
                ColumnSpec::text("address", "Address"),
            ],
            header_right: vec![
                ColumnSpec::text("tcn", "TCN"),
                ColumnSpec::text("invoiceNo", "Invoice No"),
                ColumnSpec::text("bookingDate", "Booking"),
                ColumnSpec::text("deliveryDate", "Delivery"),
                ColumnSpec::text("booker", "Booker"),
                ColumnSpec::text("salesman", "Salesman"),
            ],
            line_items: vec![
                ColumnSpec::new("sku", "SKU / Product", ColumnType::PrimaryText),
                ColumnSpec::text("ctSize", "Ct.Size"),
                ColumnSpec::number("ctn", "Ctn"),
                ColumnSpec::number("pcs", "Pcs"),
                ColumnSpec::number("rp", "R.P"),
                ColumnSpec::number("tp", "T.P"),
                ColumnSpec::number("tpVal", "TP Val"),
                ColumnSpec::number("tradeOffer", "Trade Offer"),
                ColumnSpec::number("slabDisc", "Slab Disc"),
                ColumnSpec::number("grossValue", "Gross Value"),
                ColumnSpec::number("others", "Others"),
                ColumnSpec::number("getValue", "Get Value"),
                ColumnSpec::number("advanceTax", "Advance Tax"),
                ColumnSpec::number("gst", "GST"),
            ],
            summary: vec![
                ColumnSpec::text("totalQty", "Total Qty"),
                ColumnSpec::text("tpValue", "TP Value"),
                ColumnSpec::text("totalDiscount", "Total Discount"),
                ColumnSpec::text("grossValue", "Gross Value"),
                ColumnSpec::text("others", "Others"),
                ColumnSpec::text("netValue", "Net Value"),
            ],
        }
    }
}
