use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use tracing::{debug, info};

use crate::model::employee::{DivisionSummary, Employee, EmployeeInput, EmployeeSql, HqSummary};
use crate::model::field::WritableField;
use crate::repository::EmployeeRepository;
use crate::utils::db_utils::{bind_all, build_field_update};
use crate::utils::normalizer::RawValue;

// Binary collation keeps codes, divisions and HQs that differ only in case
// or accents apart, both for the unique key and for the summary grouping.
// Keyed columns stop at 768 characters, the InnoDB index limit for utf8mb4.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS employees_flat (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        emp_code VARCHAR(768) COLLATE utf8mb4_bin NULL,
        name TEXT NULL,
        division VARCHAR(768) COLLATE utf8mb4_bin NULL,
        designation TEXT NULL,
        hq VARCHAR(768) COLLATE utf8mb4_bin NULL,
        resigned_date DATE NULL,
        vacancy TEXT NULL,
        remarks TEXT NULL,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE KEY uq_employees_flat_emp_code (emp_code),
        KEY idx_employees_flat_division (division),
        KEY idx_employees_flat_hq (hq)
    ) DEFAULT CHARSET = utf8mb4 COLLATE = utf8mb4_bin
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT e.id, e.emp_code, e.name, e.division, e.designation, e.hq,
           e.resigned_date, e.vacancy, e.remarks
    FROM employees_flat e
"#;

const LIST_ORDER: &str =
    "ORDER BY e.division IS NULL, e.division, e.hq IS NULL, e.hq, e.name IS NULL, e.name";

const INSERT: &str = r#"
    INSERT INTO employees_flat
    (emp_code, name, division, designation, hq, resigned_date, vacancy, remarks)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_BY_CODE: &str = r#"
    INSERT INTO employees_flat
    (emp_code, name, division, designation, hq, resigned_date, vacancy, remarks)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        name = VALUES(name),
        division = VALUES(division),
        designation = VALUES(designation),
        hq = VALUES(hq),
        resigned_date = VALUES(resigned_date),
        vacancy = VALUES(vacancy),
        remarks = VALUES(remarks),
        updated_at = CURRENT_TIMESTAMP
"#;

const UPDATE_ALL: &str = r#"
    UPDATE employees_flat
    SET emp_code = ?, name = ?, division = ?, designation = ?, hq = ?,
        resigned_date = ?, vacancy = ?, remarks = ?,
        updated_at = CURRENT_TIMESTAMP
    WHERE id = ?
"#;

const DIVISION_SUMMARY: &str = r#"
    SELECT
        division,
        COUNT(*) AS total_employees,
        COUNT(DISTINCT hq) AS total_hqs,
        COUNT(CASE WHEN vacancy IS NOT NULL AND TRIM(vacancy) <> '' THEN 1 END) AS vacant_count
    FROM employees_flat
    WHERE division IS NOT NULL AND division <> ''
    GROUP BY division
    ORDER BY division
"#;

const HQ_SUMMARY: &str = r#"
    SELECT
        division,
        hq,
        COUNT(*) AS total_employees,
        COUNT(CASE WHEN vacancy IS NOT NULL AND TRIM(vacancy) <> '' THEN 1 END) AS vacant_count
    FROM employees_flat
    WHERE division IS NOT NULL AND division <> ''
      AND hq IS NOT NULL AND hq <> ''
    GROUP BY division, hq
    ORDER BY division, hq
"#;

fn bind_input<'q>(
    query: Query<'q, sqlx::MySql, MySqlArguments>,
    input: &EmployeeInput,
) -> Query<'q, sqlx::MySql, MySqlArguments> {
    query
        .bind(input.emp_code.clone())
        .bind(input.name.clone())
        .bind(input.division.clone())
        .bind(input.designation.clone())
        .bind(input.hq.clone())
        .bind(input.resigned_date)
        .bind(input.vacancy.clone())
        .bind(input.remarks.clone())
}

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
    schema_ready: AtomicBool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            schema_ready: AtomicBool::new(false),
        }
    }

    /// Runs the DDL until it has succeeded once.
    async fn ready(&self) -> Result<(), sqlx::Error> {
        if !self.schema_ready.load(Ordering::Acquire) {
            self.ensure_schema().await?;
        }
        Ok(())
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Option<Employee>, sqlx::Error> {
        let sql = format!("{} WHERE e.id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, EmployeeSql>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Employee::from))
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        if !self.schema_ready.swap(true, Ordering::AcqRel) {
            info!("employees_flat schema ready");
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Employee>, sqlx::Error> {
        self.ready().await?;

        let sql = format!("{} {}", SELECT_COLUMNS, LIST_ORDER);
        let rows = sqlx::query_as::<_, EmployeeSql>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched employees");
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, sqlx::Error> {
        self.ready().await?;
        self.fetch_by_id(id).await
    }

    async fn upsert_by_code(&self, input: &EmployeeInput) -> Result<(), sqlx::Error> {
        self.ready().await?;

        let sql = if input.emp_code.is_some() {
            UPSERT_BY_CODE
        } else {
            INSERT
        };
        bind_input(sqlx::query(sql), input)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert(&self, input: &EmployeeInput) -> Result<Employee, sqlx::Error> {
        self.ready().await?;

        let result = bind_input(sqlx::query(INSERT), input)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_id();
        debug!(id, "Inserted employee");

        self.fetch_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    async fn update(
        &self,
        id: u64,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, sqlx::Error> {
        self.ready().await?;

        bind_input(sqlx::query(UPDATE_ALL), input)
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.fetch_by_id(id).await
    }

    async fn update_field(
        &self,
        id: u64,
        field: WritableField,
        value: &RawValue,
    ) -> Result<Option<Employee>, sqlx::Error> {
        self.ready().await?;

        let update = build_field_update(field, value, id);
        debug!(sql = %update.sql, values = ?update.values, "Updating employee field");
        bind_all(sqlx::query(&update.sql), update.values)
            .execute(&self.pool)
            .await?;
        self.fetch_by_id(id).await
    }

    async fn delete(&self, id: u64) -> Result<(), sqlx::Error> {
        self.ready().await?;

        let result = sqlx::query("DELETE FROM employees_flat WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, affected = result.rows_affected(), "Deleted employee");
        Ok(())
    }

    async fn division_summary(&self) -> Result<Vec<DivisionSummary>, sqlx::Error> {
        self.ready().await?;
        sqlx::query_as::<_, DivisionSummary>(DIVISION_SUMMARY)
            .fetch_all(&self.pool)
            .await
    }

    async fn hq_summary(&self) -> Result<Vec<HqSummary>, sqlx::Error> {
        self.ready().await?;
        sqlx::query_as::<_, HqSummary>(HQ_SUMMARY)
            .fetch_all(&self.pool)
            .await
    }
}
