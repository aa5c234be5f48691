//! Spreadsheet rendering of product listings.
//!
//! Layout (0-based rows):
//!
//! ```text
//! 0      title, merged across all columns
//! 2      "Exported by" / "Generated at"
//! 4      column headers
//! 5..    one row per product
//! last+2 summary: product count, total stock
//! last+4 footer
//! ```

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::models::{Product, ProductStatus};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS: [&str; 8] = [
    "#", "ID", "Code", "Name", "Category", "Stock", "Status", "Created",
];
const COLUMN_WIDTHS: [f64; 8] = [5.0, 30.0, 15.0, 25.0, 20.0, 10.0, 12.0, 20.0];
const LAST_COLUMN: u16 = HEADERS.len() as u16 - 1;

const TITLE_ROW: u32 = 0;
const META_ROW: u32 = 2;
const HEADER_ROW: u32 = 4;
const FIRST_DATA_ROW: u32 = 5;

const ACCENT: u32 = 0xF97316;
const ACTIVE_FILL: u32 = 0xFDF6E3;
const INACTIVE_FILL: u32 = 0xF8CBAD;
const SUMMARY_FILL: u32 = 0xC6EFCE;

const UNCATEGORIZED: &str = "Uncategorized";

/// A rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ProductExport {
    pub filename: String,
    pub content: Vec<u8>,
}

pub fn sheet_name(generated_at: DateTime<Utc>) -> String {
    format!("Products {}", generated_at.format("%Y-%m-%d"))
}

pub fn file_name(generated_at: DateTime<Utc>) -> String {
    format!("products-{}.xlsx", generated_at.format("%Y-%m-%d"))
}

fn row_fill(status: ProductStatus) -> u32 {
    match status {
        ProductStatus::Active => ACTIVE_FILL,
        ProductStatus::Inactive => INACTIVE_FILL,
    }
}

fn centered(format: Format) -> Format {
    format
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Renders `products` into an in-memory `.xlsx` workbook
pub fn render_products(
    products: &[Product],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(generated_at))?;

    write_title(worksheet, generated_at)?;
    write_header(worksheet)?;

    for (index, product) in products.iter().enumerate() {
        write_product(worksheet, FIRST_DATA_ROW + index as u32, index + 1, product)?;
    }

    let last_row = match products.len() {
        0 => HEADER_ROW,
        n => FIRST_DATA_ROW + n as u32 - 1,
    };
    write_summary(worksheet, last_row + 2, products)?;

    workbook.save_to_buffer()
}

fn write_title(worksheet: &mut Worksheet, generated_at: DateTime<Utc>) -> Result<(), XlsxError> {
    let title = centered(
        Format::new()
            .set_bold()
            .set_font_size(16)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(ACCENT)),
    );
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, LAST_COLUMN, "Product Inventory Report", &title)?;
    worksheet.set_row_height(TITLE_ROW, 30)?;

    let label = Format::new().set_bold();
    worksheet.write_string_with_format(META_ROW, 0, "Exported by:", &label)?;
    worksheet.write_string(META_ROW, 1, "Inventory service")?;
    worksheet.write_string_with_format(META_ROW, 4, "Generated at:", &label)?;
    worksheet.write_string(
        META_ROW,
        5,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )?;

    Ok(())
}

fn write_header(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
    let header = centered(
        Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(ACCENT))
            .set_border(FormatBorder::Thin),
    );

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, *title, &header)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    Ok(())
}

fn write_product(
    worksheet: &mut Worksheet,
    row: u32,
    position: usize,
    product: &Product,
) -> Result<(), XlsxError> {
    let cell = centered(
        Format::new()
            .set_background_color(Color::RGB(row_fill(product.status)))
            .set_border(FormatBorder::Thin),
    );

    let category = product
        .category
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or(UNCATEGORIZED);

    worksheet.write_number_with_format(row, 0, position as f64, &cell)?;
    worksheet.write_string_with_format(row, 1, product.id.to_string(), &cell)?;
    worksheet.write_string_with_format(row, 2, &product.product_code, &cell)?;
    worksheet.write_string_with_format(row, 3, &product.name, &cell)?;
    worksheet.write_string_with_format(row, 4, category, &cell)?;
    worksheet.write_number_with_format(row, 5, product.stock, &cell)?;
    worksheet.write_string_with_format(row, 6, product.status.to_string(), &cell)?;
    worksheet.write_string_with_format(
        row,
        7,
        product.created_at.format("%Y-%m-%d %H:%M").to_string(),
        &cell,
    )?;

    Ok(())
}

fn write_summary(
    worksheet: &mut Worksheet,
    summary_row: u32,
    products: &[Product],
) -> Result<(), XlsxError> {
    let total_stock: i64 = products.iter().map(|p| i64::from(p.stock)).sum();

    let summary = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(SUMMARY_FILL));
    worksheet.merge_range(
        summary_row,
        0,
        summary_row,
        1,
        &format!("Total products: {}", products.len()),
        &summary,
    )?;
    worksheet.merge_range(
        summary_row,
        4,
        summary_row,
        5,
        &format!("Total stock: {}", total_stock),
        &summary,
    )?;

    let footer_row = summary_row + 2;
    let footer = Format::new().set_italic();
    worksheet.merge_range(
        footer_row,
        0,
        footer_row,
        3,
        "Generated automatically by the inventory service.",
        &footer,
    )?;
    worksheet.merge_range(
        footer_row,
        4,
        footer_row,
        LAST_COLUMN,
        "Stock figures reflect the time of export.",
        &footer,
    )?;

    Ok(())
}
