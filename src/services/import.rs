use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::repository::EmployeeRepository;
use crate::utils::normalizer::{RawRow, normalize_row};

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportOutcome {
    /// Full record list after the batch.
    pub records: Vec<Employee>,
    #[schema(example = 120)]
    pub imported: usize,
    #[schema(example = 2)]
    pub skipped: usize,
}

/// Normalize and upsert every row in input order, one statement per row.
///
/// Rows with neither a name nor a code are skipped. A later row with the same
/// code overwrites an earlier one. A store error stops the batch; rows before
/// it stay committed.
pub async fn import_rows(
    repo: &dyn EmployeeRepository,
    rows: &[RawRow],
) -> Result<ImportOutcome, sqlx::Error> {
    repo.ensure_schema().await?;

    let mut imported = 0;
    let mut skipped = 0;

    for row in rows {
        let input = normalize_row(row);
        if !input.is_importable() {
            skipped += 1;
            continue;
        }
        repo.upsert_by_code(&input).await?;
        imported += 1;
    }

    let records = repo.list_all().await?;
    info!(imported, skipped, total = records.len(), "Spreadsheet import finished");

    Ok(ImportOutcome {
        records,
        imported,
        skipped,
    })
}
