use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::IntoParams;

use crate::errors::AppError;
use crate::services::dashboard::{DashboardController, View};
use crate::utils::spreadsheet::{ACCEPTED_EXTENSIONS, decode_workbook, export_workbook, is_spreadsheet_file};
use crate::views::sheet_name;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImportQuery {
    /// Original file name; only its extension is checked.
    pub filename: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// division, hq or employees (default)
    pub view: Option<View>,
}

/// Import spreadsheet
///
/// The body is the raw workbook. The first row of the first sheet holds the
/// headers. Rows are upserted by employee code.
#[utoipa::path(
    post,
    path = "/api/employees/import",
    params(ImportQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Refreshed record list", body = crate::services::import::ImportOutcome),
        (status = 400, description = "Not a spreadsheet or unreadable", body = Object, example = json!({
            "message": "Failed to open spreadsheet"
        })),
        (status = 500, description = "Store failed part-way; earlier rows remain committed")
    ),
    tag = "Transfer"
)]
pub async fn import_employees(
    dashboard: web::Data<DashboardController>,
    query: web::Query<ImportQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    if !is_spreadsheet_file(&query.filename) {
        return Err(AppError::parse(format!(
            "Only {} files are accepted",
            ACCEPTED_EXTENSIONS.join(", ")
        )));
    }

    let size = body.len();
    let rows = web::block(move || decode_workbook(body.to_vec()))
        .await
        .map_err(|e| AppError::parse(e.to_string()))?
        .map_err(|e| {
            warn!(error = %e, filename = %query.filename, "Rejected upload");
            AppError::parse(format!("{:#}", e))
        })?;
    info!(filename = %query.filename, size, rows = rows.len(), "Decoded upload");

    let outcome = dashboard.import(&rows).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Export spreadsheet
#[utoipa::path(
    get,
    path = "/api/employees/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "xlsx workbook of the current record list", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    tag = "Transfer"
)]
pub async fn export_employees(
    dashboard: web::Data<DashboardController>,
    query: web::Query<ExportQuery>,
) -> actix_web::Result<HttpResponse> {
    let view = query.view.unwrap_or(View::Employees);
    let records = dashboard.records();

    let bytes = export_workbook(&records, sheet_name(view)).map_err(|e| {
        error!(error = %e, "Failed to build workbook");
        actix_web::error::ErrorInternalServerError("Failed to build workbook")
    })?;

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d");
    let filename = match view {
        View::Employees => "employees.xlsx".to_string(),
        View::Division => format!("Division-wise-{}.xlsx", today),
        View::Hq => format!("HQ-wise-{}.xlsx", today),
    };

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes))
}
