use actix_web::{HttpResponse, Responder, http::header, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthContext,
    client::AttendanceBackend,
    config::Config,
    dashboard::{
        presenter::DashboardPresenter,
        view_model::{DashboardViewModel, LoadState},
    },
    export::ExportError,
    model::role::Role,
};

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub state: LoadState,
    pub view_model: DashboardViewModel,
}

async fn load(
    auth: &AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: &Config,
) -> DashboardPresenter {
    let mut presenter = DashboardPresenter::new(backend.into_inner(), config.zone);
    presenter.initialize(&auth.id).await;
    presenter
}

/// Weekly chart and summaries for the calling user
///
/// A failed load still answers 200, with `state = "error"` and placeholder
/// summaries.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard view-model", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(Role::DASHBOARD)?;

    let presenter = load(&auth, backend, &config).await;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        state: presenter.state(),
        view_model: presenter.into_view_model(),
    }))
}

/// Download the weekly chart as `WeeklyAttendance.xlsx`
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/export",
    responses(
        (status = 200, description = "xlsx workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "No chart data to export", body = Object, example = json!({
            "error": "no chart data to export"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn export_dashboard(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(Role::DASHBOARD)?;

    let presenter = load(&auth, backend, &config).await;

    match presenter.export_to_spreadsheet(presenter.view_model()) {
        Ok(file) => Ok(HttpResponse::Ok()
            .content_type(file.content_type)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes)),
        Err(ExportError::NoChartData) => Ok(HttpResponse::Conflict().json(json!({
            "error": ExportError::NoChartData.to_string()
        }))),
        Err(e) => {
            tracing::error!(error = %e, user_id = %auth.id, "Export failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}
