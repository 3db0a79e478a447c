//! In-memory description of a single worksheet: cell contents, styling
//! intents, merges, dimensions and defined names. The writer turns it into
//! xlsx; tests can inspect and evaluate it directly.

use crate::core::formula::{CellLookup, Formula};
use std::collections::BTreeMap;
use std::fmt;

pub type RowNum = u32;
pub type ColNum = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: RowNum,
    pub col: ColNum,
    /// Rendered as `$C$7` when set.
    pub absolute: bool,
}

impl CellRef {
    pub fn new(row: RowNum, col: ColNum) -> Self {
        Self {
            row,
            col,
            absolute: false,
        }
    }

    pub fn absolute(row: RowNum, col: ColNum) -> Self {
        Self {
            row,
            col,
            absolute: true,
        }
    }

    pub fn to_a1(&self) -> String {
        if self.absolute {
            format!("${}${}", column_name(self.col), self.row + 1)
        } else {
            format!("{}{}", column_name(self.col), self.row + 1)
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Rectangular block of cells, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    pub fn new(first: CellRef, last: CellRef) -> Self {
        Self { first, last }
    }

    /// Single column from `first_row` to `last_row`.
    pub fn column(col: ColNum, first_row: RowNum, last_row: RowNum, absolute: bool) -> Self {
        let (first, last) = if absolute {
            (
                CellRef::absolute(first_row, col),
                CellRef::absolute(last_row, col),
            )
        } else {
            (CellRef::new(first_row, col), CellRef::new(last_row, col))
        };
        Self { first, last }
    }

    pub fn to_a1(&self) -> String {
        format!("{}:{}", self.first.to_a1(), self.last.to_a1())
    }

    /// Cells in row-major order; reversed corners are normalized like a
    /// spreadsheet does.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> {
        let (top, bottom) = ordered(self.first.row, self.last.row);
        let (left, right) = ordered(self.first.col, self.last.col);
        (top..=bottom).flat_map(move |row| (left..=right).map(move |col| CellRef::new(row, col)))
    }
}

fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// 0 -> A, 25 -> Z, 26 -> AA
pub fn column_name(col: ColNum) -> String {
    let mut n = u32::from(col) + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        name.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Blank
        } else {
            Self::Text(value)
        }
    }

    /// Numeric view used by arithmetic; blanks count as zero.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            Self::Blank => 0.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Blank,
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Blank),
            serde_json::Value::String(s) => Self::text(s.as_str()),
            serde_json::Value::Bool(b) => Self::Text(b.to_string().to_uppercase()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Value(CellValue),
    Formula(Formula),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Yellow,
    Red,
    /// Light orange used behind table headers.
    HeaderTint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Thin,
    Thick,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Borders {
    pub top: Option<Line>,
    pub bottom: Option<Line>,
    pub left: Option<Line>,
    pub right: Option<Line>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumFormat {
    Integer,
    TwoDecimal,
}

impl NumFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Integer => "0",
            Self::TwoDecimal => "0.00",
        }
    }
}

/// Styling intent for one cell, built up like a format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub fill: Option<Fill>,
    pub borders: Borders,
    pub align: Option<HAlign>,
    pub valign: Option<VAlign>,
    pub wrap: bool,
    pub num_format: Option<NumFormat>,
    pub bold: bool,
    pub font_size: Option<f64>,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn border(mut self, line: Line) -> Self {
        self.borders = Borders {
            top: Some(line),
            bottom: Some(line),
            left: Some(line),
            right: Some(line),
        };
        self
    }

    pub fn top(mut self, line: Line) -> Self {
        self.borders.top = Some(line);
        self
    }

    pub fn bottom(mut self, line: Line) -> Self {
        self.borders.bottom = Some(line);
        self
    }

    pub fn left(mut self, line: Line) -> Self {
        self.borders.left = Some(line);
        self
    }

    pub fn right(mut self, line: Line) -> Self {
        self.borders.right = Some(line);
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn num_format(mut self, num_format: NumFormat) -> Self {
        self.num_format = Some(num_format);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRange {
    pub range: CellRange,
    pub text: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefinedName {
    pub name: String,
    pub target: CellRef,
}

#[derive(Debug, Clone)]
pub struct Grid {
    sheet_name: String,
    cells: BTreeMap<(RowNum, ColNum), Cell>,
    merges: Vec<MergedRange>,
    column_widths: BTreeMap<ColNum, f64>,
    row_heights: BTreeMap<RowNum, f64>,
    names: Vec<DefinedName>,
}

impl Grid {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            names: Vec::new(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Writing the same position twice keeps the last write.
    pub fn write(&mut self, row: RowNum, col: ColNum, value: CellValue, style: &CellStyle) {
        self.cells.insert(
            (row, col),
            Cell {
                content: CellContent::Value(value),
                style: style.clone(),
            },
        );
    }

    pub fn write_text(&mut self, row: RowNum, col: ColNum, text: &str, style: &CellStyle) {
        self.write(row, col, CellValue::text(text), style);
    }

    pub fn write_blank(&mut self, row: RowNum, col: ColNum, style: &CellStyle) {
        self.write(row, col, CellValue::Blank, style);
    }

    pub fn write_formula(&mut self, row: RowNum, col: ColNum, formula: Formula, style: &CellStyle) {
        self.cells.insert(
            (row, col),
            Cell {
                content: CellContent::Formula(formula),
                style: style.clone(),
            },
        );
    }

    pub fn merge(&mut self, range: CellRange, text: &str, style: &CellStyle) {
        self.merges.push(MergedRange {
            range,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    pub fn set_column_width(&mut self, col: ColNum, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn set_row_height(&mut self, row: RowNum, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn define_name(&mut self, name: &str, target: CellRef) {
        self.names.push(DefinedName {
            name: name.to_string(),
            target: CellRef::absolute(target.row, target.col),
        });
    }

    pub fn get(&self, row: RowNum, col: ColNum) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Formula at a position, if that cell holds one.
    pub fn formula(&self, row: RowNum, col: ColNum) -> Option<&Formula> {
        match self.get(row, col).map(|cell| &cell.content) {
            Some(CellContent::Formula(formula)) => Some(formula),
            _ => None,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (RowNum, ColNum, &Cell)> {
        self.cells.iter().map(|(&(row, col), cell)| (row, col, cell))
    }

    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (ColNum, f64)> + '_ {
        self.column_widths.iter().map(|(&col, &width)| (col, width))
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (RowNum, f64)> + '_ {
        self.row_heights.iter().map(|(&row, &height)| (row, height))
    }

    pub fn defined_names(&self) -> &[DefinedName] {
        &self.names
    }

    /// Value a spreadsheet would show at `(row, col)` after recalculation.
    pub fn evaluate(&self, row: RowNum, col: ColNum) -> CellValue {
        self.value_at(CellRef::new(row, col))
    }
}

impl CellLookup for Grid {
    // 版面不產生循環參照
    fn value_at(&self, cell: CellRef) -> CellValue {
        match self.get(cell.row, cell.col).map(|c| &c.content) {
            Some(CellContent::Value(value)) => value.clone(),
            Some(CellContent::Formula(formula)) => formula.evaluate(self),
            None => CellValue::Blank,
        }
    }

    fn resolve_name(&self, name: &str) -> Option<CellRef> {
        self.names
            .iter()
            .find(|defined| defined.name.eq_ignore_ascii_case(name))
            .map(|defined| defined.target)
    }
}
