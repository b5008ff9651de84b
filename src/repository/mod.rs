//! Persistence gateway: schema lifecycle and every read/write on
//! `employees_flat`.

pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::model::employee::{DivisionSummary, Employee, EmployeeInput, HqSummary};
use crate::model::field::WritableField;
use crate::utils::normalizer::RawValue;

pub use mysql::MySqlEmployeeRepository;

/// Store errors are handed back untouched; nothing here retries.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Idempotent; safe to run before every operation.
    async fn ensure_schema(&self) -> Result<(), sqlx::Error>;

    /// Every record ordered by division, hq, name (NULLs last).
    async fn list_all(&self) -> Result<Vec<Employee>, sqlx::Error>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, sqlx::Error>;

    /// Insert, or overwrite every mutable field of the row holding the same
    /// code. Records without a code are always inserted.
    async fn upsert_by_code(&self, input: &EmployeeInput) -> Result<(), sqlx::Error>;

    /// Insert exactly one row regardless of its code.
    async fn insert(&self, input: &EmployeeInput) -> Result<Employee, sqlx::Error>;

    /// Whole-record replacement in a single statement.
    async fn update(&self, id: u64, input: &EmployeeInput)
    -> Result<Option<Employee>, sqlx::Error>;

    async fn update_field(
        &self,
        id: u64,
        field: WritableField,
        value: &RawValue,
    ) -> Result<Option<Employee>, sqlx::Error>;

    /// Missing ids are not an error.
    async fn delete(&self, id: u64) -> Result<(), sqlx::Error>;

    async fn division_summary(&self) -> Result<Vec<DivisionSummary>, sqlx::Error>;

    async fn hq_summary(&self) -> Result<Vec<HqSummary>, sqlx::Error>;
}
