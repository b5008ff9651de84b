use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;

use crate::model::employee::non_empty;
use crate::model::field::WritableField;
use crate::utils::date_parser::parse_date;
use crate::utils::normalizer::{RawValue, to_safe_text};

pub const TABLE: &str = "employees_flat";

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    Date(NaiveDate),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug, PartialEq)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Converts a raw value into what gets stored for `field`: dates through the
/// date parser, everything else through text normalization. An empty code
/// is stored as NULL so it never collides with the unique key.
pub fn field_value(field: WritableField, value: &RawValue) -> SqlValue {
    match field {
        WritableField::ResignedDate => parse_date(value).map_or(SqlValue::Null, SqlValue::Date),
        WritableField::EmpCode => non_empty(to_safe_text(value)).map_or(SqlValue::Null, SqlValue::String),
        _ => SqlValue::String(to_safe_text(value)),
    }
}

/// ===============================
/// Build single-column UPDATE SQL
/// ===============================
///
/// The column comes from the closed [`WritableField`] set, never from input.
pub fn build_field_update(field: WritableField, value: &RawValue, id: u64) -> SqlUpdate {
    let sql = format!(
        "UPDATE {} SET {} = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        TABLE,
        field.column()
    );

    SqlUpdate {
        sql,
        values: vec![field_value(field, value), SqlValue::U64(id)],
    }
}

/// Attach values to a query in order.
pub fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    query
}
