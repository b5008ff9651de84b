use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::dashboard::DashboardController;
use crate::utils::normalizer::{RawRow, RawValue, normalize_row};
use crate::views::EmployeeFilter;

#[derive(Deserialize, ToSchema)]
pub struct FieldUpdate {
    /// One of emp_code, name, division, designation, hq, resigned_date,
    /// vacancy, remarks. Other names are ignored.
    #[schema(example = "division")]
    pub field: String,

    #[serde(default)]
    #[schema(value_type = Object, example = "A&P Karnataka")]
    pub value: RawValue,
}

/// List Employees
///
/// Optional column filters and paging. `X-Total-Count` carries the number of
/// rows that passed the filters before paging.
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Matching records, ordered by division, HQ and name", body = [crate::model::employee::Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    dashboard: web::Data<DashboardController>,
    filter: web::Query<EmployeeFilter>,
) -> HttpResponse {
    let matching = filter.select(&dashboard.records());
    let total = matching.len();
    HttpResponse::Ok()
        .insert_header(("X-Total-Count", total.to_string()))
        .json(filter.page(matching))
}

/// Create Employee
///
/// Accepts the same header spellings as a spreadsheet row.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = crate::model::employee::EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = crate::model::employee::Employee),
        (status = 400, description = "Name, Division or HQ missing", body = Object, example = json!({
            "message": "Please fill in Name, Division, HQ fields"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    dashboard: web::Data<DashboardController>,
    payload: web::Json<RawRow>,
) -> Result<HttpResponse, AppError> {
    let input = normalize_row(&payload);
    let added = dashboard.add(input).await?;
    Ok(HttpResponse::Created().json(added))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::employee::Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    dashboard: web::Data<DashboardController>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let employee = dashboard.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
///
/// Replaces every mutable field in one statement.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = crate::model::employee::EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = crate::model::employee::Employee),
        (status = 400, description = "Name, Division or HQ missing"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    dashboard: web::Data<DashboardController>,
    path: web::Path<u64>,
    payload: web::Json<RawRow>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let input = normalize_row(&payload);
    let updated = dashboard.edit(employee_id, input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Update one field
#[utoipa::path(
    patch,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = FieldUpdate,
    responses(
        (status = 200, description = "Record after the update", body = crate::model::employee::Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee_field(
    dashboard: web::Data<DashboardController>,
    path: web::Path<u64>,
    payload: web::Json<FieldUpdate>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let FieldUpdate { field, value } = payload.into_inner();
    debug!(employee_id, field = %field, "Inline edit");

    let updated = dashboard.edit_field(employee_id, &field, value).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted (also when the id does not exist)", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    dashboard: web::Data<DashboardController>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    dashboard.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
