use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::field::WritableField;
use crate::utils::date_parser::parse_date;
use crate::utils::normalizer::{RawValue, to_safe_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "emp_code": "E00001",
        "name": "John Doe",
        "division": "A&P Karnataka",
        "designation": "BE",
        "hq": "Bangalore",
        "resigned_date": null,
        "vacancy": "0 years, 5 months, 10 days",
        "remarks": "To be Identified"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "E00001", nullable = true)]
    pub emp_code: Option<String>,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "A&P Karnataka")]
    pub division: String,

    #[schema(example = "BE")]
    pub designation: String,

    #[schema(example = "Bangalore")]
    pub hq: String,

    #[schema(
        example = "2024-03-15",
        value_type = Option<String>,
        format = "date",
        nullable = true
    )]
    pub resigned_date: Option<NaiveDate>,

    /// Empty means the position is not vacant.
    #[schema(example = "0 years, 5 months, 10 days")]
    pub vacancy: String,

    #[schema(example = "To be Identified")]
    pub remarks: String,
}

impl Employee {
    pub fn from_input(id: u64, input: EmployeeInput) -> Self {
        Self {
            id,
            emp_code: input.emp_code,
            name: input.name,
            division: input.division,
            designation: input.designation,
            hq: input.hq,
            resigned_date: input.resigned_date,
            vacancy: input.vacancy,
            remarks: input.remarks,
        }
    }

    pub fn is_vacant(&self) -> bool {
        !self.vacancy.trim().is_empty()
    }
}

/// Row as stored. Text columns are nullable in `employees_flat`, so they are
/// read as options and flattened into [`Employee`].
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub emp_code: Option<String>,
    pub name: Option<String>,
    pub division: Option<String>,
    pub designation: Option<String>,
    pub hq: Option<String>,
    pub resigned_date: Option<NaiveDate>,
    pub vacancy: Option<String>,
    pub remarks: Option<String>,
}

impl From<EmployeeSql> for Employee {
    fn from(row: EmployeeSql) -> Self {
        Self {
            id: row.id,
            emp_code: row.emp_code.filter(|c| !c.is_empty()),
            name: row.name.unwrap_or_default(),
            division: row.division.unwrap_or_default(),
            designation: row.designation.unwrap_or_default(),
            hq: row.hq.unwrap_or_default(),
            resigned_date: row.resigned_date,
            vacancy: row.vacancy.unwrap_or_default(),
            remarks: row.remarks.unwrap_or_default(),
        }
    }
}

/// Canonical record without its id: what the normalizer produces and what
/// the gateway writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeInput {
    #[schema(example = "E00001", nullable = true)]
    pub emp_code: Option<String>,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "A&P Karnataka")]
    pub division: String,
    #[schema(example = "BE")]
    pub designation: String,
    #[schema(example = "Bangalore")]
    pub hq: String,
    #[schema(example = "2024-03-15", value_type = Option<String>, format = "date", nullable = true)]
    pub resigned_date: Option<NaiveDate>,
    #[schema(example = "0 years, 5 months, 10 days")]
    pub vacancy: String,
    #[schema(example = "To be Identified")]
    pub remarks: String,
}

impl EmployeeInput {
    /// Import rows with neither a name nor a code are dropped.
    pub fn is_importable(&self) -> bool {
        !self.name.is_empty() || self.emp_code.is_some()
    }

    /// Name, division and HQ are required for an explicit add or edit.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        if self.division.trim().is_empty() {
            missing.push("Division");
        }
        if self.hq.trim().is_empty() {
            missing.push("HQ");
        }
        missing
    }

    /// Sets one field from a raw value using the same conversions the
    /// gateway applies before storage.
    pub fn apply_field(&mut self, field: WritableField, value: &RawValue) {
        match field {
            WritableField::EmpCode => self.emp_code = non_empty(to_safe_text(value)),
            WritableField::Name => self.name = to_safe_text(value),
            WritableField::Division => self.division = to_safe_text(value),
            WritableField::Designation => self.designation = to_safe_text(value),
            WritableField::Hq => self.hq = to_safe_text(value),
            WritableField::ResignedDate => self.resigned_date = parse_date(value),
            WritableField::Vacancy => self.vacancy = to_safe_text(value),
            WritableField::Remarks => self.remarks = to_safe_text(value),
        }
    }
}

impl From<&Employee> for EmployeeInput {
    fn from(e: &Employee) -> Self {
        Self {
            emp_code: e.emp_code.clone(),
            name: e.name.clone(),
            division: e.division.clone(),
            designation: e.designation.clone(),
            hq: e.hq.clone(),
            resigned_date: e.resigned_date,
            vacancy: e.vacancy.clone(),
            remarks: e.remarks.clone(),
        }
    }
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct DivisionSummary {
    #[schema(example = "A&P Karnataka")]
    pub division: String,
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 6)]
    pub total_hqs: i64,
    #[schema(example = 3)]
    pub vacant_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct HqSummary {
    #[schema(example = "A&P Karnataka")]
    pub division: String,
    #[schema(example = "Bangalore")]
    pub hq: String,
    #[schema(example = 12)]
    pub total_employees: i64,
    #[schema(example = 1)]
    pub vacant_count: i64,
}
