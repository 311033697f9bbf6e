//! Computed sum columns and effective column resolution

use crate::catalog::{ColumnType, FieldCatalog};
use crate::data::LineItem;
use tracing::trace;

/// How an aggregation relates to its source columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregationMode {
    /// Shown next to its source columns
    #[default]
    Add,
    /// Hides its source columns from the table
    Replace,
}

/// A synthetic numeric column summing other numeric columns
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aggregation {
    pub id: String,
    pub label: String,
    /// Source column ids, in the order they were picked
    pub source_field_ids: Vec<String>,
    pub mode: AggregationMode,
}

impl Aggregation {
    pub fn replaces(&self, id: &str) -> bool {
        self.mode == AggregationMode::Replace && self.source_field_ids.iter().any(|f| f == id)
    }
}

/// A line-item column ready for layout and rendering
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedColumn {
    pub id: String,
    pub column_type: ColumnType,
    pub label: String,
    /// Set when the column is computed by an aggregation
    pub is_aggregation: bool,
}

/// Whether any replace-mode aggregation hides this column
pub fn is_replaced(aggregations: &[Aggregation], id: &str) -> bool {
    aggregations.iter().any(|agg| agg.replaces(id))
}

/// Resolve the active line-item order into displayable columns.
///
/// Raw ids hidden by a replace-mode aggregation are dropped; aggregation ids
/// resolve to numeric columns carrying the aggregation's label. Ids neither
/// the catalog nor the aggregations know are kept as numeric columns labelled
/// by their id.
pub fn resolve_effective_columns<S: AsRef<str>>(
    order: &[S],
    aggregations: &[Aggregation],
    catalog: &FieldCatalog,
) -> Vec<ResolvedColumn> {
    let columns: Vec<ResolvedColumn> = order
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|id| {
            if let Some(agg) = aggregations.iter().find(|agg| agg.id == id) {
                return Some(ResolvedColumn {
                    id: agg.id.clone(),
                    column_type: ColumnType::Numeric,
                    label: agg.label.clone(),
                    is_aggregation: true,
                });
            }
            if is_replaced(aggregations, id) {
                return None;
            }
            let label = catalog
                .line_item(id)
                .map(|f| f.label.clone())
                .unwrap_or_else(|| id.to_string());
            Some(ResolvedColumn {
                id: id.to_string(),
                column_type: catalog.classify(id),
                label,
                is_aggregation: false,
            })
        })
        .collect();

    trace!(
        "Resolved {} of {} line-item ids into columns",
        columns.len(),
        order.len()
    );
    columns
}

/// Sum of the aggregation's source values in one row.
///
/// Missing or non-numeric values count as zero.
pub fn row_value(item: &LineItem, aggregation: &Aggregation) -> f64 {
    aggregation
        .source_field_ids
        .iter()
        .filter_map(|id| item.get(id).and_then(|v| v.as_number()))
        .sum()
}
