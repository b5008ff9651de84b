use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};
use crate::model::employee::{DivisionSummary, Employee, EmployeeInput, HqSummary};
use crate::model::field::WritableField;
use crate::repository::EmployeeRepository;
use crate::services::import::{ImportOutcome, import_rows};
use crate::utils::normalizer::{RawRow, RawValue, to_safe_text};

/// The three dashboard tabs.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, AsRefStr, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum View {
    #[default]
    Division,
    Hq,
    Employees,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DashboardState {
    pub records: Vec<Employee>,
    pub loading: bool,
    pub active_view: View,
}

/// Owns the record list the dashboard renders. State changes only through
/// the actions below, each applying the record (or list) the store returned.
pub struct DashboardController {
    repo: Arc<dyn EmployeeRepository>,
    state: Mutex<DashboardState>,
}

fn require_fields(input: &EmployeeInput) -> AppResult<()> {
    let missing = input.missing_required();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Please fill in {} fields",
            missing.join(", ")
        )))
    }
}

impl DashboardController {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            repo,
            state: Mutex::new(DashboardState {
                loading: true,
                ..Default::default()
            }),
        }
    }

    // The lock is only ever held for synchronous updates, never across an await.
    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Full reload. Failures are logged, not returned: the current list
    /// stays as it was and the loading flag is cleared either way.
    pub async fn load(&self) {
        self.state().loading = true;

        match self.repo.list_all().await {
            Ok(records) => {
                info!(count = records.len(), "Dashboard loaded");
                self.state().records = records;
            }
            Err(e) => error!(error = %e, "Failed to load employees"),
        }

        self.state().loading = false;
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state().clone()
    }

    pub fn records(&self) -> Vec<Employee> {
        self.state().records.clone()
    }

    pub fn set_view(&self, view: View) {
        self.state().active_view = view;
    }

    pub async fn add(&self, input: EmployeeInput) -> AppResult<Employee> {
        require_fields(&input)?;

        let added = self.repo.insert(&input).await?;
        self.state().records.insert(0, added.clone());
        Ok(added)
    }

    /// Whole-record edit, written in one statement.
    pub async fn edit(&self, id: u64, input: EmployeeInput) -> AppResult<Employee> {
        require_fields(&input)?;

        let updated = self
            .repo
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;
        self.replace(&updated);
        Ok(updated)
    }

    /// Single-field edit. Unknown field names change nothing and return the
    /// record as stored.
    pub async fn edit_field(&self, id: u64, field: &str, value: RawValue) -> AppResult<Employee> {
        let updated = match WritableField::parse(field) {
            Some(field) => {
                if matches!(
                    field,
                    WritableField::Name | WritableField::Division | WritableField::Hq
                ) && to_safe_text(&value).is_empty()
                {
                    return Err(AppError::validation(format!(
                        "{} cannot be empty",
                        field.as_ref()
                    )));
                }
                self.repo.update_field(id, field, &value).await?
            }
            None => self.repo.find_by_id(id).await?,
        }
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

        self.replace(&updated);
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> AppResult<()> {
        self.repo.delete(id).await?;
        self.state().records.retain(|e| e.id != id);
        Ok(())
    }

    pub async fn import(&self, rows: &[RawRow]) -> AppResult<ImportOutcome> {
        let outcome = import_rows(&*self.repo, rows).await?;
        self.state().records = outcome.records.clone();
        Ok(outcome)
    }

    pub async fn find(&self, id: u64) -> AppResult<Employee> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))
    }

    pub async fn division_summary(&self) -> AppResult<Vec<DivisionSummary>> {
        Ok(self.repo.division_summary().await?)
    }

    pub async fn hq_summary(&self) -> AppResult<Vec<HqSummary>> {
        Ok(self.repo.hq_summary().await?)
    }

    fn replace(&self, updated: &Employee) {
        let mut state = self.state();
        if let Some(slot) = state.records.iter_mut().find(|e| e.id == updated.id) {
            *slot = updated.clone();
        }
    }
}
