use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::dashboard::{DashboardController, View};
use crate::views::{Rendered, render};

#[derive(Deserialize, ToSchema)]
pub struct ViewSelection {
    #[schema(example = "hq")]
    pub view: View,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub loading: bool,
    pub active_view: View,
    pub total: usize,
    pub content: Rendered,
}

fn current(dashboard: &DashboardController) -> DashboardResponse {
    let state = dashboard.snapshot();
    DashboardResponse {
        loading: state.loading,
        active_view: state.active_view,
        total: state.records.len(),
        content: render(state.active_view, &state.records),
    }
}

/// Dashboard state
///
/// Loading flag, active tab and the active tab's rendering.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Current dashboard", body = Object, example = json!({
            "loading": false,
            "active_view": "division",
            "total": 1,
            "content": {
                "view": "division",
                "stats": { "groups": 1, "employees": 1, "vacancies": 0 },
                "groups": [{ "key": "A&P Karnataka", "rows": [] }]
            }
        }))
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(dashboard: web::Data<DashboardController>) -> HttpResponse {
    HttpResponse::Ok().json(current(&dashboard))
}

/// Select tab
#[utoipa::path(
    put,
    path = "/api/dashboard/view",
    request_body = ViewSelection,
    responses(
        (status = 200, description = "Dashboard rendered for the selected tab", body = Object)
    ),
    tag = "Dashboard"
)]
pub async fn set_view(
    dashboard: web::Data<DashboardController>,
    payload: web::Json<ViewSelection>,
) -> HttpResponse {
    dashboard.set_view(payload.view);
    HttpResponse::Ok().json(current(&dashboard))
}

/// Reload from the store
///
/// Store failures are logged and leave the current list in place.
#[utoipa::path(
    post,
    path = "/api/dashboard/reload",
    responses(
        (status = 200, description = "Dashboard after reload", body = Object)
    ),
    tag = "Dashboard"
)]
pub async fn reload(dashboard: web::Data<DashboardController>) -> HttpResponse {
    dashboard.load().await;
    HttpResponse::Ok().json(current(&dashboard))
}
