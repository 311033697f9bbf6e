//! Invoice values, cell formatting and placeholder data for previews

use std::collections::BTreeMap;

use crate::aggregation::{ResolvedColumn, row_value};
use crate::catalog::ColumnType;
use crate::template::Template;

/// A single stored field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// One table row, keyed by field id
pub type LineItem = BTreeMap<String, CellValue>;

/// Header fields, line items and summary totals of one invoice
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvoiceData {
    pub header: BTreeMap<String, CellValue>,
    pub line_items: Vec<LineItem>,
    pub summary: BTreeMap<String, CellValue>,
}

impl InvoiceData {
    /// Sample distributor invoice shown while editing a template
    pub fn placeholder() -> Self {
        let header = fields(&[
            ("companyName", "Test Distributor".into()),
            ("invoiceType", "Commercial Invoice".into()),
            ("cnic", "12345-6789012-3".into()),
            ("phone", "0321-1234567".into()),
            (
                "address",
                "Potohhar Rd, I-8/3 I-9 I-9, Islamabad, 44000, Pakistan".into(),
            ),
            ("invoiceNo", "OBD97395".into()),
            ("bookingDate", "2026-01-08".into()),
            ("deliveryDate", "2026-01-08".into()),
            ("booker", "waqas".into()),
            ("salesman", "waqas".into()),
            ("customerName", "Waqas Gs (Waqas)".into()),
            ("tcn", "TCN30317".into()),
        ]);

        let line_items = vec![
            line_item(
                "ISLAMABAD TEA LEAF BLEND 430 GM",
                "24",
                "1234567890123",
                [5.0, 0.0, 851.0, 102120.0, 2400.0, 1548.0, 98172.0, 490.86, 98663.0],
            ),
            line_item(
                "REFINED PINK SALT 800 GM",
                "24",
                "2345678901234",
                [0.0, 1.0, 55.0, 55.0, 19.33, 0.0, 35.67, 0.18, 36.0],
            ),
            line_item(
                "PREMIUM GREEN TEA 250 GM",
                "12",
                "3456789012345",
                [3.0, 0.0, 450.0, 5400.0, 1200.0, 540.0, 4860.0, 250.0, 5110.0],
            ),
        ];

        let summary = fields(&[
            ("totalQty", "8Ctn, 1 Pcs".into()),
            ("tpValue", CellValue::Number(102226.0)),
            ("totalDiscount", CellValue::Number(3948.0)),
            ("grossValue", CellValue::Number(98278.0)),
            ("others", CellValue::Number(490.86)),
            ("netValue", CellValue::Number(98662.86)),
        ]);

        Self {
            header,
            line_items,
            summary,
        }
    }
}

fn fields(entries: &[(&str, CellValue)]) -> BTreeMap<String, CellValue> {
    entries
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

const AMOUNT_FIELDS: [&str; 9] = [
    "ctn",
    "pcs",
    "rp",
    "tp",
    "tpVal",
    "tradeOffer",
    "slabDisc",
    "grossValue",
    "others",
];

fn line_item(sku: &str, ct_size: &str, barcode: &str, amounts: [f64; 9]) -> LineItem {
    let mut item = LineItem::new();
    item.insert("sku".to_string(), sku.into());
    item.insert("ctSize".to_string(), ct_size.into());
    item.insert("barcode".to_string(), barcode.into());
    for (id, amount) in AMOUNT_FIELDS.iter().zip(amounts) {
        item.insert(id.to_string(), amount.into());
    }
    for id in ["getValue", "advanceTax", "gst"] {
        item.insert(id.to_string(), CellValue::Number(0.0));
    }
    item
}

/// Display text of one field value outside the table
pub fn format_value(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Number(n)) => format!("{:.2}", n),
        Some(CellValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}

/// Display text of one table cell.
///
/// Numeric columns and aggregations always show two decimals, falling back
/// to `0.00` when the stored value is not a number.
pub fn format_cell(item: &LineItem, column: &ResolvedColumn, template: &Template) -> String {
    if column.is_aggregation {
        let value = template
            .aggregation(&column.id)
            .map(|agg| row_value(item, agg))
            .unwrap_or(0.0);
        return format!("{:.2}", value);
    }

    match column.column_type {
        ColumnType::Numeric => {
            let value = item.get(&column.id).and_then(CellValue::as_number);
            format!("{:.2}", value.unwrap_or(0.0))
        }
        _ => format_value(item.get(&column.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AggregationMode;
    use crate::catalog::FieldCatalog;

    fn column(id: &str, column_type: ColumnType) -> ResolvedColumn {
        ResolvedColumn {
            id: id.to_string(),
            column_type,
            label: id.to_string(),
            is_aggregation: false,
        }
    }

    #[test]
    fn test_placeholder_shape() {
        let data = InvoiceData::placeholder();
        assert_eq!(data.line_items.len(), 3);
        assert_eq!(data.header.len(), 12);
        assert_eq!(data.summary.len(), 6);

        let first = &data.line_items[0];
        assert_eq!(first.get("tp"), Some(&CellValue::Number(102120.0)));
        assert_eq!(first.get("gst"), Some(&CellValue::Number(0.0)));
        assert_eq!(first.get("ctSize"), Some(&CellValue::Text("24".to_string())));
    }

    #[test]
    fn test_format_numeric_and_text_cells() {
        let data = InvoiceData::placeholder();
        let template = Template::default();
        let item = &data.line_items[1];

        assert_eq!(
            format_cell(item, &column("tpVal", ColumnType::Numeric), &template),
            "19.33"
        );
        assert_eq!(
            format_cell(item, &column("pcs", ColumnType::Numeric), &template),
            "1.00"
        );
        // Text stored in a numeric column
        assert_eq!(
            format_cell(item, &column("ctSize", ColumnType::Numeric), &template),
            "0.00"
        );
        assert_eq!(
            format_cell(item, &column("sku", ColumnType::PrimaryText), &template),
            "REFINED PINK SALT 800 GM"
        );
        assert_eq!(
            format_cell(item, &column("nothing", ColumnType::SecondaryText), &template),
            ""
        );
    }

    #[test]
    fn test_format_aggregation_cell() {
        let catalog = FieldCatalog::default();
        let (template, agg) = Template::default()
            .create_aggregation(&catalog, &["tpVal", "tradeOffer"], "TP + TO", AggregationMode::Add)
            .unwrap();
        let columns = template.effective_columns(&catalog);
        let agg_column = columns.iter().find(|c| c.id == agg.id).unwrap();

        let data = InvoiceData::placeholder();
        assert_eq!(
            format_cell(&data.line_items[0], agg_column, &template),
            "3948.00"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_values_deserialize_untagged() {
        let item: LineItem = serde_json::from_str(r#"{ "sku": "TEA", "tp": 12.5 }"#).unwrap();
        assert_eq!(item.get("sku"), Some(&CellValue::Text("TEA".to_string())));
        assert_eq!(item.get("tp"), Some(&CellValue::Number(12.5)));
    }
}
