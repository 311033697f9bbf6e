//! Invoice template configuration and its update operations
//!
//! A [`Template`] is never modified in place: every operation returns a new
//! value, leaving the original untouched.

use std::collections::BTreeMap;

use crate::Result;
use crate::aggregation::{self, Aggregation, AggregationMode, ResolvedColumn};
use crate::catalog::{ColumnType, FieldCatalog, Section};
use crate::constants::*;
use crate::error::InvoiceError;
use crate::layout::{LayoutResult, compute_widths};
use crate::paper::PageSize;
use tracing::{debug, instrument, trace};

/// Arrangement of the summary block under the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SummaryLayout {
    /// Totals on one side, signature space on the other
    #[default]
    Split,
    Full,
}

/// Direction for reordering a field within its section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Rendering options of a template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateOptions {
    /// Table font size in px
    pub font_size: f32,
    /// Show the secondary text (carton size) under the product name
    pub show_secondary_text_row: bool,
    /// Show the barcode under the product name
    pub show_barcode_row: bool,
    pub summary_layout: SummaryLayout,
    pub show_borders: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            show_secondary_text_row: true,
            show_barcode_row: false,
            summary_layout: SummaryLayout::Split,
            show_borders: false,
        }
    }
}

/// Which fields an invoice shows, in which order, and how
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    pub header_top_row: Vec<String>,
    pub header_left: Vec<String>,
    pub header_right: Vec<String>,
    /// Active table columns: catalog ids and aggregation ids in display order
    pub line_items: Vec<String>,
    pub summary: Vec<String>,
    pub aggregations: Vec<Aggregation>,
    pub options: TemplateOptions,
    /// User-edited column labels by column id
    pub column_labels: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    aggregation_seq: u64,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            header_top_row: ids(&["companyName", "invoiceType"]),
            header_left: ids(&["customerName", "cnic", "phone", "address"]),
            header_right: ids(&[
                "tcn",
                "invoiceNo",
                "bookingDate",
                "deliveryDate",
                "booker",
                "salesman",
            ]),
            line_items: ids(&[
                "sku",
                "ctn",
                "pcs",
                "rp",
                "tp",
                "tpVal",
                "tradeOffer",
                "slabDisc",
                "grossValue",
                "others",
                "getValue",
            ]),
            summary: ids(&[
                "totalQty",
                "tpValue",
                "totalDiscount",
                "grossValue",
                "others",
                "netValue",
            ]),
            aggregations: Vec::new(),
            options: TemplateOptions::default(),
            column_labels: BTreeMap::new(),
            aggregation_seq: 0,
        }
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Template {
    /// A template with nothing selected
    pub fn empty() -> Self {
        Self {
            header_top_row: Vec::new(),
            header_left: Vec::new(),
            header_right: Vec::new(),
            line_items: Vec::new(),
            summary: Vec::new(),
            ..Self::default()
        }
    }

    /// Active field ids of a section, in display order
    pub fn fields(&self, section: Section) -> &[String] {
        match section {
            Section::HeaderTopRow => &self.header_top_row,
            Section::HeaderLeft => &self.header_left,
            Section::HeaderRight => &self.header_right,
            Section::LineItems => &self.line_items,
            Section::Summary => &self.summary,
        }
    }

    fn fields_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::HeaderTopRow => &mut self.header_top_row,
            Section::HeaderLeft => &mut self.header_left,
            Section::HeaderRight => &mut self.header_right,
            Section::LineItems => &mut self.line_items,
            Section::Summary => &mut self.summary,
        }
    }

    pub fn is_active(&self, section: Section, id: &str) -> bool {
        self.fields(section).iter().any(|f| f == id)
    }

    /// Deactivate an active field, or append an inactive one to its section
    #[instrument(skip(self))]
    pub fn toggle_field(&self, section: Section, id: &str) -> Self {
        let mut next = self.clone();
        let fields = next.fields_mut(section);
        if let Some(pos) = fields.iter().position(|f| f == id) {
            fields.remove(pos);
            trace!("Deactivated field");
        } else {
            fields.push(id.to_string());
            trace!("Activated field");
        }
        next
    }

    /// Swap a field with its neighbour. Moving past either end, or moving a
    /// field that is not active, changes nothing.
    #[instrument(skip(self))]
    pub fn move_field(&self, section: Section, id: &str, direction: MoveDirection) -> Self {
        let mut next = self.clone();
        let fields = next.fields_mut(section);
        if let Some(pos) = fields.iter().position(|f| f == id) {
            match direction {
                MoveDirection::Up if pos > 0 => fields.swap(pos, pos - 1),
                MoveDirection::Down if pos + 1 < fields.len() => fields.swap(pos, pos + 1),
                _ => {}
            }
        }
        next
    }

    /// Add a column summing numeric line-item columns.
    ///
    /// The new column is appended to the table. In replace mode its sources
    /// are removed from the table first. Returns the updated template and
    /// the created aggregation.
    #[instrument(skip(self, catalog, source_field_ids), fields(sources = source_field_ids.len()))]
    pub fn create_aggregation<S: AsRef<str>>(
        &self,
        catalog: &FieldCatalog,
        source_field_ids: &[S],
        label: &str,
        mode: AggregationMode,
    ) -> Result<(Self, Aggregation)> {
        let label = label.trim();
        if label.is_empty() {
            return Err(InvoiceError::InvalidAggregation(
                "label must not be blank".to_string(),
            ));
        }

        let mut sources: Vec<String> = Vec::with_capacity(source_field_ids.len());
        for id in source_field_ids.iter().map(|s| s.as_ref()) {
            if sources.iter().any(|s| s == id) {
                continue;
            }
            match catalog.line_item(id) {
                Some(field) if field.column_type == ColumnType::Numeric => {
                    sources.push(id.to_string());
                }
                Some(_) => {
                    return Err(InvoiceError::InvalidAggregation(format!(
                        "'{}' is not a numeric column",
                        id
                    )));
                }
                None => {
                    return Err(InvoiceError::InvalidAggregation(format!(
                        "'{}' is not a line-item column",
                        id
                    )));
                }
            }
        }
        if sources.is_empty() {
            return Err(InvoiceError::InvalidAggregation(
                "at least one source column is required".to_string(),
            ));
        }

        let mut next = self.clone();
        let id = next.next_aggregation_id(catalog);
        let aggregation = Aggregation {
            id: id.clone(),
            label: label.to_string(),
            source_field_ids: sources,
            mode,
        };

        if mode == AggregationMode::Replace {
            next.line_items
                .retain(|f| !aggregation.source_field_ids.contains(f));
        }
        next.line_items.push(id);
        next.aggregations.push(aggregation.clone());

        debug!(
            "Created aggregation {} over {:?}",
            aggregation.id, aggregation.source_field_ids
        );
        Ok((next, aggregation))
    }

    fn next_aggregation_id(&mut self, catalog: &FieldCatalog) -> String {
        loop {
            self.aggregation_seq += 1;
            let candidate = format!("{}{}", AGGREGATION_ID_PREFIX, self.aggregation_seq);
            let taken = catalog.contains_id(&candidate)
                || self.aggregation(&candidate).is_some()
                || self.line_items.contains(&candidate);
            if !taken {
                return candidate;
            }
        }
    }

    /// Delete an aggregation and its column.
    ///
    /// Columns it replaced stay hidden from the table until they are toggled
    /// back on.
    #[instrument(skip(self))]
    pub fn remove_aggregation(&self, id: &str) -> Self {
        let mut next = self.clone();
        let before = next.aggregations.len();
        next.aggregations.retain(|agg| agg.id != id);
        next.line_items.retain(|f| f != id);
        if next.aggregations.len() == before {
            debug!("No aggregation with id {}", id);
        }
        next
    }

    pub fn aggregation(&self, id: &str) -> Option<&Aggregation> {
        self.aggregations.iter().find(|agg| agg.id == id)
    }

    /// Whether a replace-mode aggregation hides this column
    pub fn is_replaced(&self, id: &str) -> bool {
        aggregation::is_replaced(&self.aggregations, id)
    }

    /// Set the label of a column.
    ///
    /// For catalog columns a blank label clears the override. Aggregations
    /// are renamed directly and keep their label when given a blank one.
    #[instrument(skip(self))]
    pub fn rename_column(&self, id: &str, label: &str) -> Self {
        let mut next = self.clone();
        let label = label.trim();

        if let Some(agg) = next.aggregations.iter_mut().find(|agg| agg.id == id) {
            if !label.is_empty() {
                agg.label = label.to_string();
            }
        } else if label.is_empty() {
            next.column_labels.remove(id);
        } else {
            next.column_labels.insert(id.to_string(), label.to_string());
        }
        next
    }

    /// Display label of a line-item column
    pub fn column_label(&self, catalog: &FieldCatalog, id: &str) -> String {
        if let Some(agg) = self.aggregation(id) {
            return agg.label.clone();
        }
        if let Some(label) = self.column_labels.get(id) {
            return label.clone();
        }
        catalog
            .line_item(id)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Table columns as they will be laid out, with label overrides applied
    pub fn effective_columns(&self, catalog: &FieldCatalog) -> Vec<ResolvedColumn> {
        let mut columns =
            aggregation::resolve_effective_columns(&self.line_items, &self.aggregations, catalog);
        for column in columns.iter_mut().filter(|c| !c.is_aggregation) {
            if let Some(label) = self.column_labels.get(&column.id) {
                column.label = label.clone();
            }
        }
        columns
    }

    /// Column widths of this template on a page.
    ///
    /// Must be recomputed whenever the page size, the effective columns or
    /// the font size change. A template without table columns has an empty
    /// layout, without an index column.
    #[instrument(skip(self, catalog))]
    pub fn layout(&self, catalog: &FieldCatalog, page_size: PageSize) -> LayoutResult {
        let columns: Vec<(String, ColumnType)> = self
            .effective_columns(catalog)
            .into_iter()
            .map(|c| (c.id, c.column_type))
            .collect();

        if columns.is_empty() {
            return LayoutResult::empty(page_size, self.options.font_size);
        }
        compute_widths(page_size, &columns, self.options.font_size)
    }

    /// Set the font size, clamped to the range the editor offers
    pub fn with_font_size(&self, font_size: f32) -> Self {
        let mut next = self.clone();
        next.options.font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        next
    }

    pub fn with_summary_layout(&self, summary_layout: SummaryLayout) -> Self {
        let mut next = self.clone();
        next.options.summary_layout = summary_layout;
        next
    }

    pub fn with_borders(&self, show_borders: bool) -> Self {
        let mut next = self.clone();
        next.options.show_borders = show_borders;
        next
    }

    pub fn with_secondary_text_row(&self, show: bool) -> Self {
        let mut next = self.clone();
        next.options.show_secondary_text_row = show;
        next
    }

    pub fn with_barcode_row(&self, show: bool) -> Self {
        let mut next = self.clone();
        next.options.show_barcode_row = show;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutPass;

    fn column_ids(template: &Template, catalog: &FieldCatalog) -> Vec<String> {
        template
            .effective_columns(catalog)
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    #[test]
    fn test_toggle_field() {
        let template = Template::default();
        let without = template.toggle_field(Section::HeaderLeft, "cnic");
        assert!(!without.is_active(Section::HeaderLeft, "cnic"));
        // Original value is untouched
        assert!(template.is_active(Section::HeaderLeft, "cnic"));

        let again = without.toggle_field(Section::HeaderLeft, "cnic");
        assert_eq!(
            again.fields(Section::HeaderLeft),
            &["customerName", "phone", "address", "cnic"]
        );
    }

    #[test]
    fn test_move_field() {
        let template = Template::default();

        let moved = template.move_field(Section::HeaderTopRow, "invoiceType", MoveDirection::Up);
        assert_eq!(moved.header_top_row, vec!["invoiceType", "companyName"]);

        let unchanged = template.move_field(Section::HeaderTopRow, "companyName", MoveDirection::Up);
        assert_eq!(unchanged, template);

        let unchanged = template.move_field(Section::LineItems, "getValue", MoveDirection::Down);
        assert_eq!(unchanged, template);

        let unchanged = template.move_field(Section::LineItems, "gst", MoveDirection::Up);
        assert_eq!(unchanged, template);
    }

    #[test]
    fn test_replace_aggregation_removes_sources() {
        let catalog = FieldCatalog::default();
        let template = Template::default();

        let (next, agg) = template
            .create_aggregation(&catalog, &["tp", "rp"], "Sum", AggregationMode::Replace)
            .unwrap();

        let columns = column_ids(&next, &catalog);
        assert!(columns.contains(&agg.id));
        assert!(!columns.iter().any(|c| c == "tp" || c == "rp"));
        assert!(!next.line_items.iter().any(|c| c == "tp" || c == "rp"));
        assert_eq!(next.line_items.last(), Some(&agg.id));
        assert!(next.is_replaced("tp"));
    }

    #[test]
    fn test_add_aggregation_keeps_sources() {
        let catalog = FieldCatalog::default();
        let (next, agg) = Template::default()
            .create_aggregation(&catalog, &["tp", "rp"], "Sum", AggregationMode::Add)
            .unwrap();

        let columns = column_ids(&next, &catalog);
        assert!(columns.contains(&agg.id));
        assert!(columns.iter().any(|c| c == "tp"));
        assert!(columns.iter().any(|c| c == "rp"));
        assert!(!next.is_replaced("tp"));
    }

    #[test]
    fn test_aggregation_ids_are_sequential_and_unique() {
        let catalog = FieldCatalog::default();
        let template = Template::default();

        let (first, a) = template
            .create_aggregation(&catalog, &["tp"], "A", AggregationMode::Add)
            .unwrap();
        let (second, b) = first
            .create_aggregation(&catalog, &["rp"], "B", AggregationMode::Add)
            .unwrap();
        assert_eq!(a.id, "agg_1");
        assert_eq!(b.id, "agg_2");

        // Same construction on the same template yields the same id
        let (_, again) = template
            .create_aggregation(&catalog, &["tp"], "A", AggregationMode::Add)
            .unwrap();
        assert_eq!(again.id, "agg_1");

        // Removing does not recycle ids
        let (third, c) = second
            .remove_aggregation("agg_2")
            .create_aggregation(&catalog, &["gst"], "C", AggregationMode::Add)
            .unwrap();
        assert_eq!(c.id, "agg_3");
        assert_eq!(third.aggregations.len(), 2);
    }

    #[test]
    fn test_aggregation_ids_skip_catalog_ids() {
        let mut catalog = FieldCatalog::default();
        catalog
            .line_items
            .push(crate::catalog::ColumnSpec::new("agg_1", "Legacy", ColumnType::Numeric));

        let (_, agg) = Template::default()
            .create_aggregation(&catalog, &["tp"], "Sum", AggregationMode::Add)
            .unwrap();
        assert_eq!(agg.id, "agg_2");
    }

    #[test]
    fn test_invalid_aggregations_are_rejected() {
        let catalog = FieldCatalog::default();
        let template = Template::default();
        let no_sources: [&str; 0] = [];

        let cases = [
            template.create_aggregation(&catalog, &no_sources, "Sum", AggregationMode::Add),
            template.create_aggregation(&catalog, &["tp"], "   ", AggregationMode::Add),
            template.create_aggregation(&catalog, &["sku"], "Sum", AggregationMode::Add),
            template.create_aggregation(&catalog, &["unknown"], "Sum", AggregationMode::Add),
        ];
        for result in cases {
            assert!(matches!(result, Err(InvoiceError::InvalidAggregation(_))));
        }
    }

    #[test]
    fn test_aggregation_label_trimmed_and_sources_deduplicated() {
        let catalog = FieldCatalog::default();
        let (_, agg) = Template::default()
            .create_aggregation(&catalog, &["tp", "rp", "tp"], "  Total  ", AggregationMode::Add)
            .unwrap();
        assert_eq!(agg.label, "Total");
        assert_eq!(agg.source_field_ids, vec!["tp", "rp"]);
    }

    #[test]
    fn test_remove_aggregation_does_not_restore_sources() {
        let catalog = FieldCatalog::default();
        let (with_agg, agg) = Template::default()
            .create_aggregation(&catalog, &["tp", "rp"], "Sum", AggregationMode::Replace)
            .unwrap();

        let removed = with_agg.remove_aggregation(&agg.id);
        assert!(removed.aggregations.is_empty());
        assert!(!removed.line_items.contains(&agg.id));
        assert!(!removed.line_items.iter().any(|c| c == "tp" || c == "rp"));
        assert!(!removed.is_replaced("tp"));

        // Unknown ids are ignored
        assert_eq!(removed.remove_aggregation("agg_99"), removed);
    }

    #[test]
    fn test_rename_column() {
        let catalog = FieldCatalog::default();
        let template = Template::default().rename_column("tp", "  Trade Price ");
        assert_eq!(template.column_label(&catalog, "tp"), "Trade Price");

        let columns = template.effective_columns(&catalog);
        let tp = columns.iter().find(|c| c.id == "tp").unwrap();
        assert_eq!(tp.label, "Trade Price");

        let cleared = template.rename_column("tp", "   ");
        assert_eq!(cleared.column_label(&catalog, "tp"), "T.P");
        assert!(cleared.column_labels.is_empty());
    }

    #[test]
    fn test_rename_aggregation() {
        let catalog = FieldCatalog::default();
        let (template, agg) = Template::default()
            .create_aggregation(&catalog, &["tp"], "Sum", AggregationMode::Add)
            .unwrap();

        let renamed = template.rename_column(&agg.id, "Net");
        assert_eq!(renamed.column_label(&catalog, &agg.id), "Net");
        assert!(renamed.column_labels.is_empty());

        let kept = renamed.rename_column(&agg.id, "");
        assert_eq!(kept.column_label(&catalog, &agg.id), "Net");
    }

    #[test]
    fn test_option_setters() {
        let template = Template::default()
            .with_font_size(20.0)
            .with_summary_layout(SummaryLayout::Full)
            .with_borders(true)
            .with_secondary_text_row(false)
            .with_barcode_row(true);

        assert_eq!(template.options.font_size, MAX_FONT_SIZE);
        assert_eq!(template.options.summary_layout, SummaryLayout::Full);
        assert!(template.options.show_borders);
        assert!(!template.options.show_secondary_text_row);
        assert!(template.options.show_barcode_row);

        assert_eq!(template.with_font_size(3.0).options.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_layout_of_default_template() {
        let catalog = FieldCatalog::default();
        let layout = Template::default().layout(&catalog, PageSize::A4);

        assert_eq!(layout.pass, LayoutPass::Optimal);
        assert_eq!(layout.widths.len(), 12);
        assert!(layout.total_width() <= 702);
        let sku = layout.width("sku").unwrap();
        assert!(layout.widths[2..].iter().all(|c| c.width <= sku));
    }

    #[test]
    fn test_layout_follows_aggregations() {
        let catalog = FieldCatalog::default();
        let (template, agg) = Template::default()
            .create_aggregation(&catalog, &["tp", "rp"], "Sum", AggregationMode::Replace)
            .unwrap();

        let layout = template.layout(&catalog, PageSize::A4);
        assert_eq!(layout.width(&agg.id), Some(50));
        assert_eq!(layout.width("tp"), None);
        assert_eq!(layout.widths.len(), 11);
    }

    #[test]
    fn test_layout_without_columns_is_empty() {
        let catalog = FieldCatalog::default();
        let layout = Template::empty().layout(&catalog, PageSize::A5);
        assert!(layout.is_empty());
        assert_eq!(layout.font_size, DEFAULT_FONT_SIZE);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_template_serializes_with_aggregations() {
        let catalog = FieldCatalog::default();
        let (template, _) = Template::default()
            .create_aggregation(&catalog, &["tp", "rp"], "Sum", AggregationMode::Replace)
            .unwrap();

        let json = serde_json::to_string(&template).unwrap();
        assert!(json.contains("\"mode\":\"replace\""));

        let restored: Template = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, template);

        // The id counter survives the round trip
        let (_, next) = restored
            .create_aggregation(&catalog, &["gst"], "GST", AggregationMode::Add)
            .unwrap();
        assert_eq!(next.id, "agg_2");
    }
}
