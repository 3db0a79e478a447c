use crate::utils::error::{PackingListError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Airtable 資料表名稱
pub mod tables {
    pub const SHIPMENT_GROUP: &str = "ShipmentGroup";
    pub const DOMESTIC_SHIPMENTS: &str = "Domestic Shipments";
    pub const FC_LIST: &str = "FCList";
    pub const LINE_ITEMS: &str = "DomesticShipmentLineItem";
    pub const SKUS: &str = "SKUS";
    pub const PACKAGING_PROFILE: &str = "PackagingProfile";
}

/// 一筆 Airtable 記錄：`{id, fields: {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Safe nested read starting at `fields`.
    pub fn read(&self, path: &[&str]) -> Value {
        match path.split_first() {
            Some((first, rest)) => match self.fields.get(*first).and_then(first_of) {
                Some(value) => read_field(value, rest),
                None => empty(),
            },
            None => empty(),
        }
    }

    pub fn text(&self, path: &[&str]) -> String {
        field_text(&self.read(path))
    }

    /// First id of a link field, if the field holds one.
    pub fn first_link(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(first_of)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// All ids of a link field that must be present on the record.
    pub fn required_links(&self, field: &str) -> Result<Vec<String>> {
        match self.fields.get(field) {
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()),
            Some(Value::String(id)) => Ok(vec![id.clone()]),
            Some(other) => Err(PackingListError::FetchError {
                message: format!(
                    "record {} has a malformed '{}' field: {}",
                    self.id, field, other
                ),
            }),
            None => Err(PackingListError::FetchError {
                message: format!("record {} has no '{}' field", self.id, field),
            }),
        }
    }
}

fn empty() -> Value {
    Value::String(String::new())
}

// 多值欄位只取第一個
fn first_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Descends through `value` by field name. A list met on the way is replaced
/// by its first element. Any missing step yields an empty string.
pub fn read_field(value: &Value, path: &[&str]) -> Value {
    let mut current = value;
    for field in path {
        current = match current.get(*field).and_then(first_of) {
            Some(next) => next,
            None => return empty(),
        };
    }
    current.clone()
}

pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentGroup {
    pub record: Record,
}

impl ShipmentGroup {
    pub const SHIPMENTS_FIELD: &'static str = "DomesticShipments";
    pub const CONSIGNEE_FIELD: &'static str = "Cosignee Name";
    pub const REPORTS_FIELD: &'static str = "PackingLists Generated";

    pub fn shipment_ids(&self) -> Result<Vec<String>> {
        self.record.required_links(Self::SHIPMENTS_FIELD)
    }

    pub fn consignee(&self) -> String {
        self.record.text(&[Self::CONSIGNEE_FIELD])
    }

    /// Previously generated report attachments, in stored order.
    pub fn generated_reports(&self) -> Vec<Value> {
        match self.record.fields.get(Self::REPORTS_FIELD) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

impl From<Record> for ShipmentGroup {
    fn from(record: Record) -> Self {
        Self { record }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub record: Record,
    pub sku: Option<Record>,
    pub packaging_profile: Option<Record>,
}

impl LineItem {
    pub fn sku_code(&self) -> String {
        field_text(&read_optional(self.sku.as_ref(), &["SKU"]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomesticShipment {
    pub record: Record,
    pub consignee: String,
    /// Fulfillment center the shipment leaves from.
    pub facility: Option<Record>,
    pub line_items: Vec<LineItem>,
}

/// Safe read on a record that may not have been resolved.
pub fn read_optional(record: Option<&Record>, path: &[&str]) -> Value {
    record.map(|r| r.read(path)).unwrap_or_else(empty)
}

/// 產生的報表與統計
#[derive(Debug, Clone)]
pub struct PackingList {
    pub data: Vec<u8>,
    pub shipment_count: usize,
    pub line_item_count: usize,
    pub sku_count: usize,
}
