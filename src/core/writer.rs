use crate::core::grid::{CellContent, CellStyle, CellValue, Fill, Grid, HAlign, Line, VAlign};
use crate::utils::error::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Formula as XlsxFormula, Workbook};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serializes a [`Grid`] into an xlsx workbook with a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, grid: &Grid) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(grid.sheet_name())?;

        for (col, width) in grid.column_widths() {
            worksheet.set_column_width(col, width)?;
        }
        for (row, height) in grid.row_heights() {
            worksheet.set_row_height(row, height)?;
        }

        for merge in grid.merges() {
            let range = merge.range;
            worksheet.merge_range(
                range.first.row,
                range.first.col,
                range.last.row,
                range.last.col,
                &merge.text,
                &to_format(&merge.style),
            )?;
        }

        for (row, col, cell) in grid.cells() {
            let format = to_format(&cell.style);
            match &cell.content {
                CellContent::Value(CellValue::Blank) => {
                    worksheet.write_blank(row, col, &format)?;
                }
                CellContent::Value(CellValue::Text(text)) => {
                    worksheet.write_string_with_format(row, col, text.as_str(), &format)?;
                }
                CellContent::Value(CellValue::Number(number)) => {
                    worksheet.write_number_with_format(row, col, *number, &format)?;
                }
                CellContent::Formula(formula) => {
                    // 預先寫入計算結果，未重算的檢視器也能顯示
                    let mut xlsx_formula = XlsxFormula::new(formula.to_a1());
                    match formula.evaluate(grid) {
                        CellValue::Number(result) => {
                            xlsx_formula = xlsx_formula.set_result(result.to_string());
                        }
                        CellValue::Text(result) => {
                            xlsx_formula = xlsx_formula.set_result(result);
                        }
                        CellValue::Blank => {}
                    }
                    worksheet.write_formula_with_format(row, col, xlsx_formula, &format)?;
                }
            }
        }

        for name in grid.defined_names() {
            workbook.define_name(
                &name.name,
                &format!("={}!{}", grid.sheet_name(), name.target.to_a1()),
            )?;
        }

        let buffer = workbook.save_to_buffer()?;
        tracing::debug!("Serialized workbook: {} bytes", buffer.len());
        Ok(buffer)
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(fill) = style.fill {
        format = format.set_background_color(fill_color(fill));
    }
    if let Some(line) = style.borders.top {
        format = format.set_border_top(border(line));
    }
    if let Some(line) = style.borders.bottom {
        format = format.set_border_bottom(border(line));
    }
    if let Some(line) = style.borders.left {
        format = format.set_border_left(border(line));
    }
    if let Some(line) = style.borders.right {
        format = format.set_border_right(border(line));
    }
    if let Some(HAlign::Center) = style.align {
        format = format.set_align(FormatAlign::Center);
    }
    match style.valign {
        Some(VAlign::Center) => format = format.set_align(FormatAlign::VerticalCenter),
        Some(VAlign::Bottom) => format = format.set_align(FormatAlign::Bottom),
        None => {}
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if let Some(num_format) = style.num_format {
        format = format.set_num_format(num_format.pattern());
    }
    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }

    format
}

fn fill_color(fill: Fill) -> Color {
    match fill {
        Fill::Yellow => Color::Yellow,
        Fill::Red => Color::Red,
        Fill::HeaderTint => Color::RGB(0xFCE4D6),
    }
}

// 粗框線對應 Excel 的 medium
fn border(line: Line) -> FormatBorder {
    match line {
        Line::Thin => FormatBorder::Thin,
        Line::Thick => FormatBorder::Medium,
    }
}
