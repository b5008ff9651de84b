use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::employee::{EmployeeInput, non_empty};
use crate::utils::date_parser::parse_date;

/// A loosely-typed cell as it comes out of a spreadsheet or a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => RawValue::Empty,
            Value::String(s) => RawValue::Text(s),
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Empty),
            Value::Bool(b) => RawValue::Bool(b),
            other => RawValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// One decoded input row: header text -> cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawRow(HashMap<String, RawValue>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, value: RawValue) {
        self.0.insert(header.into(), value);
    }

    pub fn with(mut self, header: &str, value: impl Into<RawValue>) -> Self {
        self.insert(header, value.into());
        self
    }

    /// First alias present in the row wins.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&RawValue> {
        aliases.iter().find_map(|alias| self.0.get(*alias))
    }
}

impl From<Map<String, Value>> for RawRow {
    // JSON nulls count as absent so the next alias gets a chance.
    fn from(map: Map<String, Value>) -> Self {
        RawRow(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, RawValue::from(v)))
                .collect(),
        )
    }
}

/// Accepted header spellings per canonical field, in lookup order.
pub mod aliases {
    pub const EMP_CODE: &[&str] = &["Emp Code", "emp_code", "EmpCode", "code"];
    pub const NAME: &[&str] = &["name", "Name", "employee"];
    pub const DIVISION: &[&str] = &["division", "Division", "DIVISION"];
    pub const DESIGNATION: &[&str] = &["designation", "Designation"];
    pub const HQ: &[&str] = &["hq", "HQ", "hq_name"];
    pub const RESIGNED_DATE: &[&str] = &["Resigned Date", "resigned_date", "ResignedDate"];
    pub const VACANCY: &[&str] = &["Vacancy Period", "vacancy", "Vacancy"];
    pub const REMARKS: &[&str] = &["remarks", "Remarks"];
}

/// String form of any cell, trimmed. Empty cells become "".
pub fn to_safe_text(value: &RawValue) -> String {
    match value {
        RawValue::Empty => String::new(),
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

fn text_of(row: &RawRow, aliases: &[&str]) -> String {
    row.first_of(aliases).map(to_safe_text).unwrap_or_default()
}

pub fn normalize_row(row: &RawRow) -> EmployeeInput {
    EmployeeInput {
        emp_code: non_empty(text_of(row, aliases::EMP_CODE)),
        name: text_of(row, aliases::NAME),
        division: text_of(row, aliases::DIVISION),
        designation: text_of(row, aliases::DESIGNATION),
        hq: text_of(row, aliases::HQ),
        resigned_date: row.first_of(aliases::RESIGNED_DATE).and_then(parse_date),
        vacancy: text_of(row, aliases::VACANCY),
        remarks: text_of(row, aliases::REMARKS),
    }
}
