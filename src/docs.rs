use crate::api::dashboard::ViewSelection;
use crate::api::employee::FieldUpdate;
use crate::model::employee::{DivisionSummary, Employee, EmployeeInput, HqSummary};
use crate::model::field::WritableField;
use crate::services::dashboard::View;
use crate::services::import::ImportOutcome;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacancy Management API",
        version = "1.0.0",
        description = r#"
## Vacancy Management System

Employee and vacancy tracking across divisions and headquarters.

### 🔹 Key Features
- **Employee Management**
  - Add, edit (whole record or one field), delete and list employee records
- **Spreadsheet Transfer**
  - Bulk import from `.xlsx` / `.xls` (upsert by employee code) and export to `.xlsx`
- **Summaries**
  - Headcount, HQ count and vacancies per division and per HQ
- **Dashboard**
  - Division-wise, HQ-wise and full-table views of the current record list

### 📦 Response Format
- JSON-based RESTful responses
- Dates are `YYYY-MM-DD`; an empty vacancy period means the position is filled

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::update_employee_field,
        crate::api::employee::delete_employee,

        crate::api::transfer::import_employees,
        crate::api::transfer::export_employees,

        crate::api::summary::division_summary,
        crate::api::summary::hq_summary,

        crate::api::dashboard::get_dashboard,
        crate::api::dashboard::set_view,
        crate::api::dashboard::reload
    ),
    components(
        schemas(
            Employee,
            EmployeeInput,
            FieldUpdate,
            WritableField,
            DivisionSummary,
            HqSummary,
            ImportOutcome,
            View,
            ViewSelection
        )
    ),
    tags(
        (name = "Employee", description = "Employee record APIs"),
        (name = "Transfer", description = "Spreadsheet import/export APIs"),
        (name = "Summary", description = "Grouped headcount and vacancy APIs"),
        (name = "Dashboard", description = "Dashboard state APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/api/employees",
            "/api/employees/{employee_id}",
            "/api/employees/import",
            "/api/employees/export",
            "/api/summary/division",
            "/api/summary/hq",
            "/api/dashboard",
            "/api/dashboard/view",
            "/api/dashboard/reload",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {}", expected);
        }
    }
}
