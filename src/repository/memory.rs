//! In-process [`EmployeeRepository`] for tests that should not need MySQL.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::model::employee::{DivisionSummary, Employee, EmployeeInput, HqSummary};
use crate::model::field::WritableField;
use crate::repository::EmployeeRepository;
use crate::utils::normalizer::RawValue;

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: Vec<Employee>,
}

#[derive(Default)]
pub struct MemoryEmployeeRepository {
    table: Mutex<Table>,
    failing: AtomicBool,
    /// Number of statements executed, schema creation excluded.
    pub statements: AtomicUsize,
}

impl MemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails with a pool timeout until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        self.statements.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn push(table: &mut Table, input: &EmployeeInput) -> Employee {
        table.next_id += 1;
        let emp = Employee::from_input(table.next_id, input.clone());
        table.rows.push(emp.clone());
        emp
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Employee>, sqlx::Error> {
        self.check()?;
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by(|a, b| {
            (&a.division, &a.hq, &a.name).cmp(&(&b.division, &b.hq, &b.name))
        });
        Ok(rows)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, sqlx::Error> {
        self.check()?;
        Ok(self.table.lock().unwrap().rows.iter().find(|e| e.id == id).cloned())
    }

    async fn upsert_by_code(&self, input: &EmployeeInput) -> Result<(), sqlx::Error> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        let existing = input.emp_code.as_ref().and_then(|code| {
            table
                .rows
                .iter()
                .position(|e| e.emp_code.as_ref() == Some(code))
        });
        match existing {
            Some(idx) => {
                let id = table.rows[idx].id;
                table.rows[idx] = Employee::from_input(id, input.clone());
            }
            None => {
                Self::push(&mut table, input);
            }
        }
        Ok(())
    }

    async fn insert(&self, input: &EmployeeInput) -> Result<Employee, sqlx::Error> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        if let Some(code) = &input.emp_code {
            if table.rows.iter().any(|e| e.emp_code.as_ref() == Some(code)) {
                return Err(sqlx::Error::Protocol(format!("duplicate emp_code {}", code)));
            }
        }
        Ok(Self::push(&mut table, input))
    }

    async fn update(
        &self,
        id: u64,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, sqlx::Error> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        Ok(table.rows.iter_mut().find(|e| e.id == id).map(|row| {
            *row = Employee::from_input(id, input.clone());
            row.clone()
        }))
    }

    async fn update_field(
        &self,
        id: u64,
        field: WritableField,
        value: &RawValue,
    ) -> Result<Option<Employee>, sqlx::Error> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        Ok(table.rows.iter_mut().find(|e| e.id == id).map(|row| {
            let mut input = EmployeeInput::from(&*row);
            input.apply_field(field, value);
            *row = Employee::from_input(id, input);
            row.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<(), sqlx::Error> {
        self.check()?;
        self.table.lock().unwrap().rows.retain(|e| e.id != id);
        Ok(())
    }

    async fn division_summary(&self) -> Result<Vec<DivisionSummary>, sqlx::Error> {
        self.check()?;
        let table = self.table.lock().unwrap();
        let mut groups: BTreeMap<&str, (i64, BTreeSet<&str>, i64)> = BTreeMap::new();
        for e in table.rows.iter().filter(|e| !e.division.is_empty()) {
            let entry = groups.entry(e.division.as_str()).or_default();
            entry.0 += 1;
            if !e.hq.is_empty() {
                entry.1.insert(e.hq.as_str());
            }
            if e.is_vacant() {
                entry.2 += 1;
            }
        }
        Ok(groups
            .into_iter()
            .map(|(division, (total, hqs, vacant))| DivisionSummary {
                division: division.to_string(),
                total_employees: total,
                total_hqs: hqs.len() as i64,
                vacant_count: vacant,
            })
            .collect())
    }

    async fn hq_summary(&self) -> Result<Vec<HqSummary>, sqlx::Error> {
        self.check()?;
        let table = self.table.lock().unwrap();
        let mut groups: BTreeMap<(&str, &str), (i64, i64)> = BTreeMap::new();
        for e in table
            .rows
            .iter()
            .filter(|e| !e.division.is_empty() && !e.hq.is_empty())
        {
            let entry = groups.entry((e.division.as_str(), e.hq.as_str())).or_default();
            entry.0 += 1;
            if e.is_vacant() {
                entry.1 += 1;
            }
        }
        Ok(groups
            .into_iter()
            .map(|((division, hq), (total, vacant))| HqSummary {
                division: division.to_string(),
                hq: hq.to_string(),
                total_employees: total,
                vacant_count: vacant,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(code: Option<&str>, name: &str, division: &str, hq: &str, vacancy: &str) -> EmployeeInput {
        EmployeeInput {
            emp_code: code.map(str::to_string),
            name: name.into(),
            division: division.into(),
            hq: hq.into(),
            vacancy: vacancy.into(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn upsert_with_same_code_keeps_one_row_with_latest_values() {
        let repo = MemoryEmployeeRepository::new();
        repo.upsert_by_code(&input(Some("E1"), "Jane", "North", "Pune", ""))
            .await
            .unwrap();
        repo.upsert_by_code(&input(Some("E1"), "Jane Roe", "South", "Chennai", "3 months"))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Jane Roe");
        assert_eq!(all[0].division, "South");
        assert_eq!(all[0].vacancy, "3 months");
    }

    #[actix_web::test]
    async fn upsert_without_code_always_inserts() {
        let repo = MemoryEmployeeRepository::new();
        let row = input(None, "Jane", "North", "Pune", "");
        repo.upsert_by_code(&row).await.unwrap();
        repo.upsert_by_code(&row).await.unwrap();
        assert_eq!(repo.count(), 2);
    }

    #[actix_web::test]
    async fn delete_missing_id_is_a_no_op() {
        let repo = MemoryEmployeeRepository::new();
        repo.insert(&input(None, "Jane", "North", "Pune", "")).await.unwrap();
        repo.delete(999).await.unwrap();
        assert_eq!(repo.count(), 1);
    }

    #[actix_web::test]
    async fn update_field_changes_only_that_field() {
        let repo = MemoryEmployeeRepository::new();
        let before = repo
            .insert(&input(Some("E1"), "Jane", "North", "Pune", "1 month"))
            .await
            .unwrap();

        let after = repo
            .update_field(before.id, WritableField::Division, &RawValue::from("NewDiv"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after.division, "NewDiv");
        assert_eq!(
            Employee {
                division: before.division.clone(),
                ..after
            },
            before
        );
    }

    #[actix_web::test]
    async fn summaries_count_trimmed_vacancies() {
        let repo = MemoryEmployeeRepository::new();
        for row in [
            input(None, "A", "North", "Pune", "2 months"),
            input(None, "B", "North", "Pune", ""),
            input(None, "C", "North", "Nashik", "1 year"),
            input(None, "D", "", "Nowhere", "1 year"),
            input(None, "E", "South", "", ""),
        ] {
            repo.insert(&row).await.unwrap();
        }

        let divisions = repo.division_summary().await.unwrap();
        assert_eq!(
            divisions,
            vec![
                DivisionSummary {
                    division: "North".into(),
                    total_employees: 3,
                    total_hqs: 2,
                    vacant_count: 2,
                },
                DivisionSummary {
                    division: "South".into(),
                    total_employees: 1,
                    total_hqs: 0,
                    vacant_count: 0,
                },
            ]
        );

        let hqs = repo.hq_summary().await.unwrap();
        assert_eq!(hqs.len(), 2);
        assert_eq!(hqs[0].hq, "Nashik");
        assert_eq!(hqs[1].hq, "Pune");
        assert_eq!(hqs[1].total_employees, 2);
        assert_eq!(hqs[1].vacant_count, 1);
    }
}
