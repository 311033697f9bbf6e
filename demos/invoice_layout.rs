//! Invoice layout example
//!
//! Prints a plain-text preview of the placeholder invoice for a page size
//! given on the command line (A4, A5 or Letter), with a replace-mode
//! aggregation and the largest font the editor allows.

use invoice_layout::{
    AggregationMode, FieldCatalog, InvoiceData, MoveDirection, PageSize, Section, Template,
    format_cell,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pixels represented by one character of preview output
const PX_PER_CHAR: u32 = 7;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let page_size: PageSize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<PageSize>())
        .transpose()?
        .unwrap_or_default();

    let catalog = FieldCatalog::default();
    let (template, total) = Template::default()
        .toggle_field(Section::LineItems, "ctSize")
        .move_field(Section::LineItems, "ctSize", MoveDirection::Up)
        .rename_column("tpVal", "TP Value")
        .with_font_size(12.0)
        .create_aggregation(
            &catalog,
            &["tradeOffer", "slabDisc"],
            "Discounts",
            AggregationMode::Replace,
        )?;

    info!("Created aggregation {} ({})", total.id, total.label);

    let layout = template.layout(&catalog, page_size);
    info!(
        "{}: {} columns, {}px of {:.0}px, {:?}{}",
        page_size,
        layout.widths.len(),
        layout.total_width(),
        layout.available_width,
        layout.pass,
        if layout.overflows() { ", overflowing" } else { "" }
    );

    let columns = template.effective_columns(&catalog);
    let chars = |id: &str| {
        let width = layout.width(id).unwrap_or(0);
        (width / PX_PER_CHAR).max(1) as usize
    };

    let mut header = format!("{:<w$}", "#", w = chars("index"));
    for column in &columns {
        let w = chars(&column.id);
        header.push_str(&format!("|{:<w$.w$}", column.label, w = w));
    }
    println!("{header}");
    println!("{}", "-".repeat(header.chars().count()));

    let data = InvoiceData::placeholder();
    for (row, item) in data.line_items.iter().enumerate() {
        let mut line = format!("{:<w$}", row + 1, w = chars("index"));
        for column in &columns {
            let w = chars(&column.id);
            let text = format_cell(item, column, &template);
            line.push_str(&format!("|{:>w$.w$}", text, w = w));
        }
        println!("{line}");
    }

    Ok(())
}
