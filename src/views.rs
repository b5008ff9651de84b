//! Read-only projections of the record list for the three dashboard tabs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::model::employee::Employee;
use crate::services::dashboard::View;

#[derive(Debug, Serialize, PartialEq)]
pub struct StatCards {
    /// Distinct non-empty grouping keys.
    pub groups: usize,
    pub employees: usize,
    pub vacancies: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RowGroup {
    pub key: String,
    pub rows: Vec<Employee>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GroupedView {
    pub stats: StatCards,
    pub groups: Vec<RowGroup>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmployeeTable {
    pub total: usize,
    pub rows: Vec<Employee>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Rendered {
    Division(GroupedView),
    Hq(GroupedView),
    Employees(EmployeeTable),
}

/// Column filters and paging for the employee table. Filters are
/// case-insensitive substring matches; blank filters are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    pub division: Option<String>,
    pub hq: Option<String>,
    pub name: Option<String>,
    pub designation: Option<String>,
    /// 1-based page number, used together with `per_page`.
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn matches(value: &str, filter: &Option<String>) -> bool {
    match filter.as_deref().map(str::trim) {
        Some(f) if !f.is_empty() => value.to_lowercase().contains(&f.to_lowercase()),
        _ => true,
    }
}

impl EmployeeFilter {
    /// Rows that pass every column filter, in input order.
    pub fn select(&self, records: &[Employee]) -> Vec<Employee> {
        records
            .iter()
            .filter(|e| {
                matches(&e.division, &self.division)
                    && matches(&e.hq, &self.hq)
                    && matches(&e.name, &self.name)
                    && matches(&e.designation, &self.designation)
            })
            .cloned()
            .collect()
    }

    /// One page of `rows`, or all of them when `per_page` is unset or zero.
    pub fn page(&self, rows: Vec<Employee>) -> Vec<Employee> {
        match self.per_page.filter(|n| *n > 0) {
            Some(per_page) => {
                let page = self.page.unwrap_or(1).max(1);
                rows.into_iter()
                    .skip((page - 1).saturating_mul(per_page))
                    .take(per_page)
                    .collect()
            }
            None => rows,
        }
    }
}

fn grouped(records: &[Employee], key: fn(&Employee) -> &str) -> GroupedView {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key(a).cmp(key(b)));

    let mut groups: Vec<RowGroup> = Vec::new();
    for e in sorted {
        if let Some(g) = groups.last_mut().filter(|g| g.key == key(&e)) {
            g.rows.push(e);
            continue;
        }
        groups.push(RowGroup {
            key: key(&e).to_string(),
            rows: vec![e],
        });
    }

    let distinct: BTreeSet<&str> = records.iter().map(key).filter(|k| !k.is_empty()).collect();
    GroupedView {
        stats: StatCards {
            groups: distinct.len(),
            employees: records.len(),
            vacancies: records.iter().filter(|e| e.is_vacant()).count(),
        },
        groups,
    }
}

pub fn division_view(records: &[Employee]) -> GroupedView {
    grouped(records, |e| e.division.as_str())
}

pub fn hq_view(records: &[Employee]) -> GroupedView {
    grouped(records, |e| e.hq.as_str())
}

pub fn employee_table(records: &[Employee]) -> EmployeeTable {
    EmployeeTable {
        total: records.len(),
        rows: records.to_vec(),
    }
}

pub fn render(view: View, records: &[Employee]) -> Rendered {
    match view {
        View::Division => Rendered::Division(division_view(records)),
        View::Hq => Rendered::Hq(hq_view(records)),
        View::Employees => Rendered::Employees(employee_table(records)),
    }
}

/// Sheet name used when a tab is downloaded.
pub fn sheet_name(view: View) -> &'static str {
    match view {
        View::Division => "Division-wise Data",
        View::Hq => "HQ-wise Data",
        View::Employees => "Employees",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp(id: u64, division: &str, hq: &str, vacancy: &str) -> Employee {
        Employee {
            id,
            emp_code: None,
            name: format!("E{}", id),
            division: division.into(),
            designation: String::new(),
            hq: hq.into(),
            resigned_date: None,
            vacancy: vacancy.into(),
            remarks: String::new(),
        }
    }

    #[test]
    fn division_view_groups_consecutive_rows() {
        let records = vec![
            emp(1, "South", "Chennai", ""),
            emp(2, "North", "Pune", "2 months"),
            emp(3, "South", "Madurai", " "),
            emp(4, "", "Nowhere", "1 year"),
        ];

        let view = division_view(&records);
        assert_eq!(
            view.stats,
            StatCards {
                groups: 2,
                employees: 4,
                vacancies: 2,
            }
        );

        let keys: Vec<_> = view.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["", "North", "South"]);
        let south: Vec<_> = view.groups[2].rows.iter().map(|e| e.id).collect();
        assert_eq!(south, vec![1, 3]);
    }

    #[test]
    fn hq_view_counts_distinct_hqs() {
        let records = vec![
            emp(1, "North", "Pune", ""),
            emp(2, "South", "Pune", ""),
            emp(3, "South", "Chennai", ""),
        ];
        let view = hq_view(&records);
        assert_eq!(view.stats.groups, 2);
        assert_eq!(view.groups[1].key, "Pune");
        assert_eq!(view.groups[1].rows.len(), 2);
    }

    #[test]
    fn render_tags_payload_with_view_name() {
        let rendered = render(View::Employees, &[emp(1, "North", "Pune", "")]);
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["view"], "employees");
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn filters_match_substrings_ignoring_case() {
        let mut records = vec![
            emp(1, "A&P Karnataka", "Bangalore", ""),
            emp(2, "A&P Kerala", "Kochi", ""),
            emp(3, "North", "Pune", ""),
        ];
        records[1].designation = "BE".into();

        let filter = EmployeeFilter {
            division: Some("a&p k".into()),
            ..Default::default()
        };
        let ids: Vec<u64> = filter.select(&records).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let filter = EmployeeFilter {
            division: Some("a&p".into()),
            designation: Some("be".into()),
            hq: Some("  ".into()),
            ..Default::default()
        };
        let ids: Vec<u64> = filter.select(&records).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn paging_slices_filtered_rows() {
        let records: Vec<Employee> = (1..=5).map(|id| emp(id, "North", "Pune", "")).collect();

        let filter = EmployeeFilter {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        };
        let ids: Vec<u64> = filter.page(records.clone()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let filter = EmployeeFilter {
            page: Some(9),
            per_page: Some(2),
            ..Default::default()
        };
        assert!(filter.page(records.clone()).is_empty());

        assert_eq!(EmployeeFilter::default().page(records.clone()).len(), 5);
    }
}
