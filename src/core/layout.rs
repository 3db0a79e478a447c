//! Packing list layout.
//!
//! Rows are 0-based here; formulas render them 1-based. The sheet is laid out
//! top to bottom:
//!
//! ```text
//! 0        title (merged A:M)
//! 1        "Shipment Summary" (merged A:C)
//! 2        column captions for the SKU summary
//! 3..3+n   one row per distinct SKU, then a total row
//! 3..5     grand totals in F:G, ship-to box in I4:L4
//! 7+n..    one block per shipment (see `write_shipment_block`)
//! ```

use crate::core::formula::Formula;
use crate::core::grid::{
    CellRange, CellRef, CellStyle, CellValue, ColNum, Fill, Grid, HAlign, Line, NumFormat, RowNum,
    VAlign,
};
use crate::domain::model::{field_text, read_optional, DomesticShipment, LineItem};
use crate::utils::error::{PackingListError, Result};

pub const SHEET_NAME: &str = "Sheet1";
pub const SHIP_TO_NAME: &str = "VBA_ShipTo";

/// First SKU summary row.
const SKU_SUMMARY_ROW: RowNum = 3;
/// Block of the first shipment starts this many rows below the SKU summary.
const FIRST_BLOCK_OFFSET: RowNum = 7;
/// Line items start this many rows below the block's first row.
const ITEMS_OFFSET: RowNum = 10;
/// Gap between the end of one block's items and the next block.
const NEXT_BLOCK_OFFSET: RowNum = 6;
/// Border rows span columns A..L.
const BORDERED_COLUMNS: ColNum = 12;

pub mod columns {
    use crate::core::grid::ColNum;

    pub const SKU: ColNum = 0;
    pub const FNSKU: ColNum = 1;
    pub const UNITS_PER_CASE: ColNum = 2;
    pub const CASES: ColNum = 3;
    pub const UNITS_SHIPPED: ColNum = 4;
    pub const TOTAL_KG: ColNum = 5;
    pub const TOTAL_CBM: ColNum = 6;
    pub const LENGTH: ColNum = 7;
    pub const WIDTH: ColNum = 8;
    pub const HEIGHT: ColNum = 9;
    pub const CASE_CBM: ColNum = 10;
    pub const CASE_WEIGHT: ColNum = 11;
    pub const BOX_MARK: ColNum = 12;

    /// Labels of the per-shipment totals.
    pub const BLOCK_TOTAL_LABEL: ColNum = 5;
    /// Values of the per-shipment totals.
    pub const BLOCK_TOTAL_VALUE: ColNum = 8;
    pub const GRAND_TOTAL_LABEL: ColNum = 5;
    pub const GRAND_TOTAL_VALUE: ColNum = 6;
}

use columns as col;

/// Row bookkeeping for one laid-out shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentBlock {
    pub shipment_id: String,
    pub first_row: RowNum,
    pub items_start: RowNum,
    /// Summary ranges run from `items_start` through `items_end` inclusive.
    pub items_end: RowNum,
    /// Row of "Total KG"; Total CBM and Number of Cases follow directly.
    pub totals_row: RowNum,
}

impl ShipmentBlock {
    fn new(shipment_id: &str, first_row: RowNum, item_count: RowNum) -> Self {
        let items_start = first_row + ITEMS_OFFSET;
        Self {
            shipment_id: shipment_id.to_string(),
            first_row,
            items_start,
            items_end: items_start + item_count,
            totals_row: first_row + 3,
        }
    }

    pub fn item_range(&self, col: ColNum) -> CellRange {
        CellRange::column(col, self.items_start, self.items_end, true)
    }

    fn next_block_row(&self) -> RowNum {
        self.items_end + NEXT_BLOCK_OFFSET
    }
}

#[derive(Debug, Clone)]
pub struct PackingListLayout {
    pub grid: Grid,
    pub skus: Vec<String>,
    pub blocks: Vec<ShipmentBlock>,
    sku_rows: RowNum,
}

impl PackingListLayout {
    pub fn build(shipments: &[DomesticShipment]) -> Result<Self> {
        let first = shipments.first().ok_or_else(|| PackingListError::ValidationError {
            message: "shipment group has no domestic shipments".to_string(),
        })?;

        let skus = distinct_skus(shipments);
        let sku_rows = to_row(skus.len())?;

        let mut grid = Grid::new(SHEET_NAME);
        write_sheet_header(&mut grid, first);

        let mut blocks = Vec::with_capacity(shipments.len());
        let mut line = FIRST_BLOCK_OFFSET + sku_rows;
        for shipment in shipments {
            let block = write_shipment_block(&mut grid, shipment, line)?;
            line = block.next_block_row();
            blocks.push(block);
        }

        write_sku_summary(&mut grid, &skus, sku_rows, &blocks);
        write_grand_totals(&mut grid, &blocks);

        tracing::debug!(
            "Laid out {} shipments and {} SKUs over {} rows",
            blocks.len(),
            skus.len(),
            line
        );

        Ok(Self {
            grid,
            skus,
            blocks,
            sku_rows,
        })
    }

    pub fn block(&self, shipment_id: &str) -> Option<&ShipmentBlock> {
        self.blocks.iter().find(|b| b.shipment_id == shipment_id)
    }

    pub fn sku_row(&self, sku: &str) -> Option<RowNum> {
        (SKU_SUMMARY_ROW..)
            .zip(&self.skus)
            .find(|(_, s)| s.as_str() == sku)
            .map(|(row, _)| row)
    }

    pub fn sku_total_row(&self) -> RowNum {
        SKU_SUMMARY_ROW + self.sku_rows
    }

    /// Position of the "Total Cartons" grand total.
    pub fn total_cartons_cell(&self) -> CellRef {
        CellRef::new(SKU_SUMMARY_ROW + 2, col::GRAND_TOTAL_VALUE)
    }
}

fn to_row(count: usize) -> Result<RowNum> {
    RowNum::try_from(count).map_err(|_| PackingListError::ReportError {
        message: format!("{} rows do not fit in a worksheet", count),
    })
}

/// SKU codes in first-seen order across all shipments.
pub fn distinct_skus(shipments: &[DomesticShipment]) -> Vec<String> {
    let mut skus: Vec<String> = Vec::new();
    for item in shipments.iter().flat_map(|s| s.line_items.iter()) {
        let code = item.sku_code();
        if !skus.contains(&code) {
            skus.push(code);
        }
    }
    skus
}

/// Splits at the first `", "`; the second line is empty when there is none.
pub fn split_address(address: &str) -> (&str, &str) {
    address.split_once(", ").unwrap_or((address, ""))
}

mod styles {
    use super::*;

    pub fn plain() -> CellStyle {
        CellStyle::new()
    }

    pub fn highlight() -> CellStyle {
        CellStyle::new().fill(Fill::Yellow)
    }

    pub fn rect() -> CellStyle {
        CellStyle::new().border(Line::Thin).align(HAlign::Center)
    }

    pub fn rect_integer() -> CellStyle {
        rect().num_format(NumFormat::Integer)
    }

    pub fn rect_number() -> CellStyle {
        rect().num_format(NumFormat::TwoDecimal)
    }

    pub fn rect_box() -> CellStyle {
        rect().fill(Fill::Red)
    }

    pub fn table_header() -> CellStyle {
        CellStyle::new()
            .fill(Fill::HeaderTint)
            .border(Line::Thin)
            .valign(VAlign::Bottom)
            .wrap()
    }

    pub fn table_title() -> CellStyle {
        CellStyle::new().fill(Fill::HeaderTint).valign(VAlign::Bottom)
    }

    pub fn box_header() -> CellStyle {
        CellStyle::new()
            .fill(Fill::Red)
            .border(Line::Thin)
            .valign(VAlign::Bottom)
    }

    pub fn number() -> CellStyle {
        CellStyle::new().num_format(NumFormat::TwoDecimal)
    }

    pub fn integer() -> CellStyle {
        CellStyle::new().num_format(NumFormat::Integer)
    }

    pub fn text_wrap() -> CellStyle {
        CellStyle::new().wrap()
    }

    pub fn border_top() -> CellStyle {
        CellStyle::new().top(Line::Thin)
    }

    pub fn thick_top() -> CellStyle {
        CellStyle::new().top(Line::Thick)
    }

    pub fn title() -> CellStyle {
        CellStyle::new()
            .bold()
            .align(HAlign::Center)
            .valign(VAlign::Center)
            .font_size(14.0)
    }

    pub fn subtitle() -> CellStyle {
        CellStyle::new()
            .bold()
            .align(HAlign::Center)
            .valign(VAlign::Center)
    }
}

fn write_sheet_header(grid: &mut Grid, first: &DomesticShipment) {
    for (column, width) in [
        (col::SKU, 15.0),
        (col::FNSKU, 15.0),
        (col::UNITS_PER_CASE, 13.0),
        (col::CASES, 13.0),
        (col::UNITS_SHIPPED, 15.0),
        (col::TOTAL_KG, 13.0),
        (col::TOTAL_CBM, 15.0),
        (col::CASE_WEIGHT, 14.0),
        (col::BOX_MARK, 20.0),
    ] {
        grid.set_column_width(column, width);
    }
    grid.set_row_height(0, 20.0);
    grid.set_row_height(2, 50.0);

    grid.merge(
        CellRange::new(CellRef::new(0, 0), CellRef::new(0, col::BOX_MARK)),
        "Packing List",
        &styles::title(),
    );
    grid.merge(
        CellRange::new(CellRef::new(1, 0), CellRef::new(1, 2)),
        "Shipment Summary",
        &styles::subtitle(),
    );

    let wrap = styles::text_wrap();
    grid.write_text(2, 1, "Units Shipped 订货数量（套）", &wrap);
    grid.write_text(2, 2, "Number of Cases/箱数量", &wrap);

    // 收貨方只寫一次，各區塊以名稱參照
    let ship_to = CellStyle::new().fill(Fill::Yellow).top(Line::Thick).bottom(Line::Thick);
    grid.write_text(3, 8, "Ship To", &ship_to.clone().bold().left(Line::Thick));
    grid.write_text(3, 9, &first.consignee, &ship_to);
    grid.define_name(SHIP_TO_NAME, CellRef::new(3, 9));
    grid.write_blank(3, 10, &ship_to);
    grid.write_blank(3, 11, &ship_to.clone().right(Line::Thick));
}

fn write_border_row(grid: &mut Grid, row: RowNum) {
    let style = styles::thick_top();
    for column in 0..BORDERED_COLUMNS {
        grid.write_blank(row, column, &style);
    }
}

/// Lays out one shipment starting at `line`:
///
/// ```text
/// line-1       thick top border
/// line..+7     metadata in A:C, totals in F/I on line+3..line+6
/// line+8       section title
/// line+9       column headers
/// line+10..    line items
/// end+1        thick bottom border
/// ```
fn write_shipment_block(
    grid: &mut Grid,
    shipment: &DomesticShipment,
    line: RowNum,
) -> Result<ShipmentBlock> {
    let block = ShipmentBlock::new(
        &shipment.record.id,
        line,
        to_row(shipment.line_items.len())?,
    );

    write_border_row(grid, line - 1);

    let facility = shipment.facility.as_ref();
    let address = read_optional(facility, &["FCAddress"]);
    let address = field_text(&address);
    let (address_line1, address_line2) = split_address(&address);

    let plain = styles::plain();
    let highlight = styles::highlight();
    let metadata: [(Option<&str>, MetadataValue); 8] = [
        (
            Some("Fulfillment Center"),
            MetadataValue::Value(CellValue::from(&read_optional(facility, &["FCID"]))),
        ),
        (
            Some("Shipment ID"),
            MetadataValue::Value(CellValue::from(&shipment.record.read(&["FBA Shipment ID"]))),
        ),
        (
            Some("Reference ID"),
            MetadataValue::Value(CellValue::from(&shipment.record.read(&["AMZReferenceID"]))),
        ),
        (Some("Ship to"), MetadataValue::Formula(Formula::name(SHIP_TO_NAME))),
        (
            Some("Cosignee"),
            MetadataValue::Value(CellValue::text(shipment.consignee.as_str())),
        ),
        (None, MetadataValue::Value(CellValue::text(address_line1))),
        (None, MetadataValue::Value(CellValue::text(address_line2))),
        (
            None,
            MetadataValue::Value(CellValue::from(&read_optional(facility, &["FacilityCountry"]))),
        ),
    ];
    for (offset, (label, content)) in (0..).zip(metadata) {
        let row = line + offset;
        if let Some(label) = label {
            grid.write_text(row, 0, label, &plain);
        }
        match content {
            MetadataValue::Value(value) => grid.write(row, 1, value, &highlight),
            MetadataValue::Formula(formula) => grid.write_formula(row, 1, formula, &highlight),
        }
        grid.write_blank(row, 2, &highlight);
    }

    let totals = [
        ("Total KG 总公斤", col::TOTAL_KG, styles::number()),
        ("Total CBM 总立方米", col::TOTAL_CBM, styles::number()),
        ("Number of Cases/箱数量", col::CASES, styles::integer()),
        ("Units Shipped 订货数量（套）", col::UNITS_SHIPPED, styles::integer()),
    ];
    for (offset, (label, summed, style)) in (0..).zip(totals) {
        let row = block.totals_row + offset;
        grid.write_text(row, col::BLOCK_TOTAL_LABEL, label, &plain);
        grid.write_formula(
            row,
            col::BLOCK_TOTAL_VALUE,
            Formula::Sum(block.item_range(summed)),
            &style,
        );
    }

    let title = styles::table_title();
    for column in 0..BORDERED_COLUMNS {
        if column == col::LENGTH {
            grid.write_text(line + 8, column, "箱子规格 / case dimensions", &title);
        } else {
            grid.write_blank(line + 8, column, &title);
        }
    }

    let header_row = line + 9;
    grid.set_row_height(header_row, 50.0);
    let header = styles::table_header();
    for (column, caption) in [
        (col::SKU, "SKU"),
        (col::FNSKU, "FNSKU 条形码编号"),
        (col::UNITS_PER_CASE, "Units per Case /外箱包装"),
        (col::CASES, "Number of Cases/箱数量"),
        (col::UNITS_SHIPPED, "Units Shipped 订货数量（套）"),
        (col::TOTAL_KG, "Total KG 总公斤"),
        (col::TOTAL_CBM, "Total CBM 总立方米"),
        (col::LENGTH, "长 length"),
        (col::WIDTH, "宽 width"),
        (col::HEIGHT, "高 height"),
        (col::CASE_CBM, "总CBM"),
        (col::CASE_WEIGHT, "Weight Per Case 外箱重量"),
    ] {
        grid.write_text(header_row, column, caption, &header);
    }
    grid.write_text(header_row, col::BOX_MARK, "Box Mark分箱号：", &styles::box_header());

    for (row, item) in (block.items_start..).zip(&shipment.line_items) {
        write_line_item(grid, row, item);
    }

    write_border_row(grid, block.items_end + 1);

    Ok(block)
}

enum MetadataValue {
    Value(CellValue),
    Formula(Formula),
}

fn write_line_item(grid: &mut Grid, row: RowNum, item: &LineItem) {
    let sku = item.sku.as_ref();
    let profile = item.packaging_profile.as_ref();
    let rect = styles::rect();
    let integer = styles::rect_integer();
    let number = styles::rect_number();

    grid.write(row, col::SKU, CellValue::from(&read_optional(sku, &["SKU"])), &rect);
    grid.write(row, col::FNSKU, CellValue::from(&read_optional(sku, &["FNSKU"])), &rect);
    grid.write(
        row,
        col::UNITS_PER_CASE,
        CellValue::from(&read_optional(profile, &["UnitsPerCarton"])),
        &integer,
    );
    grid.write(row, col::CASES, CellValue::from(&item.record.read(&["CaseQty"])), &integer);
    grid.write(
        row,
        col::UNITS_SHIPPED,
        CellValue::from(&item.record.read(&["ShipQuantity"])),
        &integer,
    );
    grid.write_formula(
        row,
        col::TOTAL_KG,
        Formula::Product(vec![
            Formula::cell(row, col::CASE_WEIGHT),
            Formula::cell(row, col::CASES),
        ]),
        &number,
    );
    grid.write_formula(
        row,
        col::TOTAL_CBM,
        Formula::Product(vec![
            Formula::cell(row, col::CASE_CBM),
            Formula::cell(row, col::CASES),
        ]),
        &number,
    );
    for (column, field) in [
        (col::LENGTH, "CartonLengthCM"),
        (col::WIDTH, "CartonWidthCM"),
        (col::HEIGHT, "CartonHeightCM"),
    ] {
        grid.write(row, column, CellValue::from(&read_optional(profile, &[field])), &integer);
    }
    // cm³ -> m³
    grid.write_formula(
        row,
        col::CASE_CBM,
        Formula::divide(
            Formula::Product(vec![
                Formula::cell(row, col::LENGTH),
                Formula::cell(row, col::WIDTH),
                Formula::cell(row, col::HEIGHT),
            ]),
            Formula::Constant(1_000_000.0),
        ),
        &number,
    );
    grid.write(
        row,
        col::CASE_WEIGHT,
        CellValue::from(&read_optional(profile, &["CartonWeightKG"])),
        &number,
    );
    grid.write(
        row,
        col::BOX_MARK,
        CellValue::from(&item.record.read(&["BoxMark"])),
        &styles::rect_box(),
    );
}

fn write_sku_summary(
    grid: &mut Grid,
    skus: &[String],
    sku_rows: RowNum,
    blocks: &[ShipmentBlock],
) {
    let integer = styles::integer();
    for (row, sku) in (SKU_SUMMARY_ROW..).zip(skus) {
        grid.write_text(row, 0, sku, &styles::plain());
        for (column, summed) in [(1, col::UNITS_SHIPPED), (2, col::CASES)] {
            let terms = blocks
                .iter()
                .map(|block| Formula::SumIf {
                    range: block.item_range(col::SKU),
                    criterion: CellRef::absolute(row, 0),
                    sum_range: block.item_range(summed),
                })
                .collect();
            grid.write_formula(row, column, Formula::Add(terms), &integer);
        }
    }

    let total_row = SKU_SUMMARY_ROW + sku_rows;
    grid.write_blank(total_row, 0, &styles::border_top());
    let total_style = styles::integer().top(Line::Thin);
    for column in [1, 2] {
        grid.write_formula(
            total_row,
            column,
            Formula::Sum(CellRange::column(
                column,
                SKU_SUMMARY_ROW,
                total_row.saturating_sub(1),
                false,
            )),
            &total_style,
        );
    }
}

fn write_grand_totals(grid: &mut Grid, blocks: &[ShipmentBlock]) {
    let yellow = CellStyle::new().fill(Fill::Yellow);
    let rows = [
        (
            "Total KG",
            yellow.clone().top(Line::Thick).left(Line::Thick),
            yellow
                .clone()
                .num_format(NumFormat::TwoDecimal)
                .right(Line::Thick)
                .top(Line::Thick),
        ),
        (
            "Total CBM",
            yellow.clone().left(Line::Thick),
            yellow
                .clone()
                .num_format(NumFormat::TwoDecimal)
                .right(Line::Thick),
        ),
        (
            "Total Cartons",
            yellow.clone().bottom(Line::Thick).left(Line::Thick),
            yellow
                .clone()
                .num_format(NumFormat::Integer)
                .right(Line::Thick)
                .bottom(Line::Thick),
        ),
    ];
    for (offset, (label, label_style, value_style)) in (0..).zip(rows) {
        let row = SKU_SUMMARY_ROW + offset;
        grid.write_text(row, col::GRAND_TOTAL_LABEL, label, &label_style);
        let terms = blocks
            .iter()
            .map(|block| Formula::absolute(block.totals_row + offset, col::BLOCK_TOTAL_VALUE))
            .collect();
        grid.write_formula(row, col::GRAND_TOTAL_VALUE, Formula::Add(terms), &value_style);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::grid::CellContent;
    use crate::domain::model::Record;
    use serde_json::{json, Value};

    fn record(id: &str, fields: Value) -> Record {
        serde_json::from_value(json!({ "id": id, "fields": fields })).unwrap()
    }

    pub(crate) fn line_item(id: &str, sku: &str, ship_qty: u32, case_qty: u32) -> LineItem {
        LineItem {
            record: record(
                id,
                json!({ "CaseQty": case_qty, "ShipQuantity": ship_qty, "BoxMark": "1-2" }),
            ),
            sku: Some(record(
                &format!("recSKU{}", sku),
                json!({ "SKU": sku, "FNSKU": format!("X00{}", sku) }),
            )),
            packaging_profile: Some(record(
                "recPP1",
                json!({
                    "UnitsPerCarton": 5,
                    "CartonLengthCM": 50,
                    "CartonWidthCM": 40,
                    "CartonHeightCM": 30,
                    "CartonWeightKG": 12.5
                }),
            )),
        }
    }

    pub(crate) fn shipment(id: &str, items: Vec<LineItem>) -> DomesticShipment {
        DomesticShipment {
            record: record(id, json!({ "FBA Shipment ID": "FBA15ABC", "AMZReferenceID": "3K9" })),
            consignee: "ACME Trading".to_string(),
            facility: Some(record(
                "recFC1",
                json!({
                    "FCID": "ONT8",
                    "FCAddress": "24300 Nandina Ave, Moreno Valley, CA 92551",
                    "FacilityCountry": "US"
                }),
            )),
            line_items: items,
        }
    }

    pub(crate) fn fixture() -> Vec<DomesticShipment> {
        vec![shipment(
            "recDS1",
            vec![line_item("recLI1", "A", 10, 2), line_item("recLI2", "B", 5, 1)],
        )]
    }

    fn formula_text(grid: &Grid, row: RowNum, column: ColNum) -> String {
        grid.formula(row, column).map(Formula::to_a1).unwrap_or_default()
    }

    #[test]
    fn test_distinct_skus_keep_first_seen_order() {
        let shipments = vec![
            shipment("recDS1", vec![line_item("l1", "B", 1, 1), line_item("l2", "A", 1, 1)]),
            shipment("recDS2", vec![line_item("l3", "A", 1, 1), line_item("l4", "C", 1, 1)]),
        ];
        assert_eq!(distinct_skus(&shipments), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_split_address() {
        assert_eq!(
            split_address("24300 Nandina Ave, Moreno Valley, CA"),
            ("24300 Nandina Ave", "Moreno Valley, CA")
        );
        assert_eq!(split_address("Warehouse 7"), ("Warehouse 7", ""));
        assert_eq!(split_address(""), ("", ""));
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let err = PackingListLayout::build(&[]).unwrap_err();
        assert!(matches!(err, PackingListError::ValidationError { .. }));
    }

    #[test]
    fn test_single_shipment_rows() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let block = layout.block("recDS1").unwrap();

        // 2 SKUs -> first block at row 9
        assert_eq!(block.first_row, 9);
        assert_eq!(block.items_start, 19);
        assert_eq!(block.items_end, 21);
        assert_eq!(block.totals_row, 12);
        assert_eq!(layout.sku_row("B"), Some(4));
        assert_eq!(layout.sku_total_row(), 5);

        let grid = &layout.grid;
        assert_eq!(formula_text(grid, 12, 8), "=SUM($F$20:$F$22)");
        assert_eq!(formula_text(grid, 13, 8), "=SUM($G$20:$G$22)");
        assert_eq!(formula_text(grid, 14, 8), "=SUM($D$20:$D$22)");
        assert_eq!(formula_text(grid, 15, 8), "=SUM($E$20:$E$22)");
        assert_eq!(formula_text(grid, 19, 5), "=L20*D20");
        assert_eq!(formula_text(grid, 19, 6), "=K20*D20");
        assert_eq!(formula_text(grid, 20, 10), "=H21*I21*J21/1000000");
        assert_eq!(formula_text(grid, 3, 1), "=SUMIF($A$20:$A$22,$A$4,$E$20:$E$22)");
        assert_eq!(formula_text(grid, 3, 2), "=SUMIF($A$20:$A$22,$A$4,$D$20:$D$22)");
        assert_eq!(formula_text(grid, 5, 1), "=SUM(B4:B5)");
        assert_eq!(formula_text(grid, 3, 6), "=$I$13");
        assert_eq!(formula_text(grid, 5, 6), "=$I$15");
        assert_eq!(formula_text(grid, 12, 1), "=VBA_ShipTo");

        assert_eq!(grid.evaluate(19, 0), CellValue::Text("A".to_string()));
        assert_eq!(grid.evaluate(20, 4), CellValue::Number(5.0));
        assert_eq!(grid.evaluate(9, 1), CellValue::Text("ONT8".to_string()));
        assert_eq!(grid.evaluate(14, 1), CellValue::Text("24300 Nandina Ave".to_string()));
        assert_eq!(
            grid.evaluate(15, 1),
            CellValue::Text("Moreno Valley, CA 92551".to_string())
        );
        assert_eq!(grid.evaluate(16, 1), CellValue::Text("US".to_string()));
        assert_eq!(grid.evaluate(12, 1), CellValue::Text("ACME Trading".to_string()));
    }

    #[test]
    fn test_total_cartons_equals_case_quantities() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let cell = layout.total_cartons_cell();
        assert_eq!(layout.grid.evaluate(cell.row, cell.col), CellValue::Number(3.0));
    }

    #[test]
    fn test_totals_across_several_shipments() {
        let shipments = vec![
            shipment(
                "recDS1",
                vec![line_item("l1", "A", 10, 2), line_item("l2", "B", 5, 1)],
            ),
            shipment(
                "recDS2",
                vec![
                    line_item("l3", "B", 7, 3),
                    line_item("l4", "C", 4, 4),
                    line_item("l5", "A", 1, 1),
                ],
            ),
        ];
        let layout = PackingListLayout::build(&shipments).unwrap();
        let grid = &layout.grid;

        let second = layout.block("recDS2").unwrap();
        assert_eq!(second.first_row, layout.block("recDS1").unwrap().items_end + 6);

        for (sku, units, cases) in [("A", 11.0, 3.0), ("B", 12.0, 4.0), ("C", 4.0, 4.0)] {
            let row = layout.sku_row(sku).unwrap();
            assert_eq!(grid.evaluate(row, 1), CellValue::Number(units), "units for {}", sku);
            assert_eq!(grid.evaluate(row, 2), CellValue::Number(cases), "cases for {}", sku);
        }

        let total_row = layout.sku_total_row();
        assert_eq!(grid.evaluate(total_row, 1), CellValue::Number(27.0));
        assert_eq!(grid.evaluate(total_row, 2), CellValue::Number(11.0));

        let cartons = layout.total_cartons_cell();
        assert_eq!(grid.evaluate(cartons.row, cartons.col), CellValue::Number(11.0));

        // 12.5 kg per case * 11 cases
        assert_eq!(grid.evaluate(3, 6), CellValue::Number(137.5));
        let cbm = match grid.evaluate(4, 6) {
            CellValue::Number(n) => n,
            other => panic!("expected number, got {:?}", other),
        };
        assert!((cbm - 0.06 * 11.0).abs() < 1e-9);

        let first = layout.block("recDS1").unwrap();
        assert_eq!(
            formula_text(grid, 3, 1),
            format!(
                "=SUMIF($A${s1}:$A${e1},$A$4,$E${s1}:$E${e1})+SUMIF($A${s2}:$A${e2},$A$4,$E${s2}:$E${e2})",
                s1 = first.items_start + 1,
                e1 = first.items_end + 1,
                s2 = second.items_start + 1,
                e2 = second.items_end + 1
            )
        );
    }

    #[test]
    fn test_missing_sku_and_profile_render_empty() {
        let mut item = line_item("l1", "A", 3, 1);
        item.sku = None;
        item.packaging_profile = None;
        let mut only = shipment("recDS1", vec![item]);
        only.facility = None;

        let layout = PackingListLayout::build(&[only]).unwrap();
        assert_eq!(layout.skus, vec![String::new()]);
        let block = &layout.blocks[0];
        let grid = &layout.grid;
        assert_eq!(grid.evaluate(block.items_start, col::SKU), CellValue::Blank);
        assert_eq!(grid.evaluate(block.items_start, col::CASE_CBM), CellValue::Number(0.0));
        assert_eq!(grid.evaluate(block.first_row, 1), CellValue::Blank);
        assert_eq!(grid.evaluate(block.first_row + 6, 1), CellValue::Blank);
        assert!(matches!(
            grid.get(block.first_row + 6, 1).unwrap().content,
            CellContent::Value(CellValue::Blank)
        ));
    }

    #[test]
    fn test_header_defines_ship_to_name() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let names = layout.grid.defined_names();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, SHIP_TO_NAME);
        assert_eq!(names[0].target, CellRef::absolute(3, 9));
        assert_eq!(layout.grid.merges().len(), 2);
    }

    fn style_at(grid: &Grid, row: RowNum, column: ColNum) -> &CellStyle {
        &grid
            .get(row, column)
            .unwrap_or_else(|| panic!("no cell at ({}, {})", row, column))
            .style
    }

    #[test]
    fn test_block_border_rows_are_thick() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let block = layout.block("recDS1").unwrap();
        let grid = &layout.grid;

        for row in [block.first_row - 1, block.items_end + 1] {
            for column in 0..BORDERED_COLUMNS {
                assert_eq!(
                    style_at(grid, row, column).borders.top,
                    Some(Line::Thick),
                    "border at ({}, {})",
                    row,
                    column
                );
            }
        }
    }

    #[test]
    fn test_table_header_and_line_item_styles() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let block = layout.block("recDS1").unwrap();
        let grid = &layout.grid;
        let header_row = block.first_row + 9;

        let header = style_at(grid, header_row, col::SKU);
        assert_eq!(header.fill, Some(Fill::HeaderTint));
        assert_eq!(header.borders.bottom, Some(Line::Thin));
        assert!(header.wrap);
        assert_eq!(style_at(grid, header_row, col::BOX_MARK).fill, Some(Fill::Red));
        assert_eq!(style_at(grid, header_row - 1, col::LENGTH).fill, Some(Fill::HeaderTint));

        let row = block.items_start;
        assert_eq!(style_at(grid, row, col::CASES).num_format, Some(NumFormat::Integer));
        assert_eq!(
            style_at(grid, row, col::TOTAL_KG).num_format,
            Some(NumFormat::TwoDecimal)
        );
        assert_eq!(
            style_at(grid, row, col::CASE_CBM).num_format,
            Some(NumFormat::TwoDecimal)
        );
        assert_eq!(style_at(grid, row, col::SKU).borders.left, Some(Line::Thin));
        assert_eq!(style_at(grid, row, col::BOX_MARK).fill, Some(Fill::Red));

        // 中繼資料欄以黃底標示
        assert_eq!(style_at(grid, block.first_row, 1).fill, Some(Fill::Yellow));
        assert_eq!(
            style_at(grid, block.totals_row, col::BLOCK_TOTAL_VALUE).num_format,
            Some(NumFormat::TwoDecimal)
        );
        assert_eq!(
            style_at(grid, block.totals_row + 2, col::BLOCK_TOTAL_VALUE).num_format,
            Some(NumFormat::Integer)
        );
    }

    #[test]
    fn test_grand_total_box_has_thick_outline() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let grid = &layout.grid;
        let (first, last) = (SKU_SUMMARY_ROW, SKU_SUMMARY_ROW + 2);

        for row in first..=last {
            let label = style_at(grid, row, col::GRAND_TOTAL_LABEL);
            let value = style_at(grid, row, col::GRAND_TOTAL_VALUE);
            assert_eq!(label.fill, Some(Fill::Yellow));
            assert_eq!(value.fill, Some(Fill::Yellow));
            assert_eq!(label.borders.left, Some(Line::Thick));
            assert_eq!(value.borders.right, Some(Line::Thick));
        }
        for column in [col::GRAND_TOTAL_LABEL, col::GRAND_TOTAL_VALUE] {
            assert_eq!(style_at(grid, first, column).borders.top, Some(Line::Thick));
            assert_eq!(style_at(grid, last, column).borders.bottom, Some(Line::Thick));
        }
        assert_eq!(
            style_at(grid, first, col::GRAND_TOTAL_VALUE).num_format,
            Some(NumFormat::TwoDecimal)
        );
        assert_eq!(
            style_at(grid, last, col::GRAND_TOTAL_VALUE).num_format,
            Some(NumFormat::Integer)
        );
    }

    #[test]
    fn test_ship_to_box_styles() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let grid = &layout.grid;

        for column in 8..=11 {
            let style = style_at(grid, 3, column);
            assert_eq!(style.fill, Some(Fill::Yellow), "fill at column {}", column);
            assert_eq!(style.borders.top, Some(Line::Thick));
            assert_eq!(style.borders.bottom, Some(Line::Thick));
        }
        assert!(style_at(grid, 3, 8).bold);
        assert_eq!(style_at(grid, 3, 8).borders.left, Some(Line::Thick));
        assert_eq!(style_at(grid, 3, 11).borders.right, Some(Line::Thick));
    }

    #[test]
    fn test_column_widths_and_row_heights() {
        let layout = PackingListLayout::build(&fixture()).unwrap();
        let block = layout.block("recDS1").unwrap();

        let widths: Vec<(ColNum, f64)> = layout.grid.column_widths().collect();
        assert_eq!(
            widths,
            vec![
                (col::SKU, 15.0),
                (col::FNSKU, 15.0),
                (col::UNITS_PER_CASE, 13.0),
                (col::CASES, 13.0),
                (col::UNITS_SHIPPED, 15.0),
                (col::TOTAL_KG, 13.0),
                (col::TOTAL_CBM, 15.0),
                (col::CASE_WEIGHT, 14.0),
                (col::BOX_MARK, 20.0),
            ]
        );

        let heights: Vec<(RowNum, f64)> = layout.grid.row_heights().collect();
        assert_eq!(heights, vec![(0, 20.0), (2, 50.0), (block.first_row + 9, 50.0)]);
    }
}
