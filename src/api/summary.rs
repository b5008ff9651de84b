use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::services::dashboard::DashboardController;

/// Division summary
#[utoipa::path(
    get,
    path = "/api/summary/division",
    responses(
        (status = 200, description = "Headcount, HQ count and vacancies per division", body = [crate::model::employee::DivisionSummary]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Summary"
)]
pub async fn division_summary(
    dashboard: web::Data<DashboardController>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(dashboard.division_summary().await?))
}

/// HQ summary
#[utoipa::path(
    get,
    path = "/api/summary/hq",
    responses(
        (status = 200, description = "Headcount and vacancies per division/HQ pair", body = [crate::model::employee::HqSummary]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Summary"
)]
pub async fn hq_summary(
    dashboard: web::Data<DashboardController>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(dashboard.hq_summary().await?))
}
