//! Spreadsheet formulas as a small expression tree.
//!
//! The layout builds [`Formula`] values instead of strings. [`Formula::to_a1`]
//! renders them in A1 syntax for the writer, and [`Formula::evaluate`]
//! computes them against any [`CellLookup`], which is how totals are checked
//! without a spreadsheet engine.

use crate::core::grid::{CellRange, CellRef, CellValue};

pub trait CellLookup {
    /// Displayed value of a cell, evaluating formulas as needed.
    fn value_at(&self, cell: CellRef) -> CellValue;
    fn resolve_name(&self, name: &str) -> Option<CellRef>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Ref(CellRef),
    /// Workbook-level defined name.
    Name(String),
    Constant(f64),
    Sum(CellRange),
    /// `SUMIF(range, criterion, sum_range)`
    SumIf {
        range: CellRange,
        criterion: CellRef,
        sum_range: CellRange,
    },
    Add(Vec<Formula>),
    Product(Vec<Formula>),
    Divide(Box<Formula>, Box<Formula>),
}

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_ATOM: u8 = 3;

impl Formula {
    pub fn cell(row: u32, col: u16) -> Self {
        Self::Ref(CellRef::new(row, col))
    }

    pub fn absolute(row: u32, col: u16) -> Self {
        Self::Ref(CellRef::absolute(row, col))
    }

    pub fn name(name: &str) -> Self {
        Self::Name(name.to_string())
    }

    pub fn divide(numerator: Formula, denominator: Formula) -> Self {
        Self::Divide(Box::new(numerator), Box::new(denominator))
    }

    /// Text as it appears in the formula bar, including the leading `=`.
    pub fn to_a1(&self) -> String {
        format!("={}", self.render())
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Add(terms) if terms.len() > 1 => PREC_ADD,
            Self::Product(factors) if factors.len() > 1 => PREC_MUL,
            Self::Divide(..) => PREC_MUL,
            _ => PREC_ATOM,
        }
    }

    fn render_at(&self, min_precedence: u8) -> String {
        let text = self.render();
        if self.precedence() < min_precedence {
            format!("({})", text)
        } else {
            text
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Ref(cell) => cell.to_a1(),
            Self::Name(name) => name.clone(),
            Self::Constant(value) => format!("{}", value),
            Self::Sum(range) => format!("SUM({})", range.to_a1()),
            Self::SumIf {
                range,
                criterion,
                sum_range,
            } => format!(
                "SUMIF({},{},{})",
                range.to_a1(),
                criterion.to_a1(),
                sum_range.to_a1()
            ),
            Self::Add(terms) => join(terms, "+", PREC_ADD),
            Self::Product(factors) => join(factors, "*", PREC_MUL),
            Self::Divide(numerator, denominator) => format!(
                "{}/{}",
                numerator.render_at(PREC_MUL),
                denominator.render_at(PREC_ATOM)
            ),
        }
    }

    pub fn evaluate(&self, lookup: &impl CellLookup) -> CellValue {
        match self {
            Self::Ref(cell) => lookup.value_at(*cell),
            Self::Name(name) => lookup
                .resolve_name(name)
                .map(|cell| lookup.value_at(cell))
                .unwrap_or(CellValue::Blank),
            Self::Constant(value) => CellValue::Number(*value),
            Self::Sum(range) => CellValue::Number(
                range
                    .cells()
                    .filter_map(|cell| match lookup.value_at(cell) {
                        CellValue::Number(n) => Some(n),
                        _ => None,
                    })
                    .sum(),
            ),
            Self::SumIf {
                range,
                criterion,
                sum_range,
            } => {
                let wanted = lookup.value_at(*criterion);
                let total = range
                    .cells()
                    .zip(sum_range.cells())
                    .filter(|(candidate, _)| criterion_matches(&lookup.value_at(*candidate), &wanted))
                    .filter_map(|(_, summed)| match lookup.value_at(summed) {
                        CellValue::Number(n) => Some(n),
                        _ => None,
                    })
                    .sum();
                CellValue::Number(total)
            }
            Self::Add(terms) => CellValue::Number(
                terms
                    .iter()
                    .map(|term| term.evaluate(lookup).as_number())
                    .sum(),
            ),
            Self::Product(factors) => CellValue::Number(
                factors
                    .iter()
                    .map(|factor| factor.evaluate(lookup).as_number())
                    .product(),
            ),
            Self::Divide(numerator, denominator) => CellValue::Number(
                numerator.evaluate(lookup).as_number() / denominator.evaluate(lookup).as_number(),
            ),
        }
    }
}

fn join(parts: &[Formula], op: &str, precedence: u8) -> String {
    parts
        .iter()
        .map(|part| part.render_at(precedence))
        .collect::<Vec<_>>()
        .join(op)
}

// SUMIF 比對不分大小寫
fn criterion_matches(candidate: &CellValue, wanted: &CellValue) -> bool {
    match (candidate, wanted) {
        (CellValue::Text(a), CellValue::Text(b)) => a.eq_ignore_ascii_case(b),
        (CellValue::Number(a), CellValue::Number(b)) => a == b,
        (CellValue::Text(a), CellValue::Number(b)) | (CellValue::Number(b), CellValue::Text(a)) => {
            a.trim().parse::<f64>().map(|a| a == *b).unwrap_or(false)
        }
        (CellValue::Blank, CellValue::Blank) => true,
        _ => false,
    }
}
