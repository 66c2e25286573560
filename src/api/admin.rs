use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use super::{backend_error, dashboard_error};
use crate::{
    auth::auth::AuthContext,
    client::AttendanceBackend,
    config::Config,
    dashboard::overview::AdminOverview,
    model::time_record::AllowedTimeConfig,
    stats::time_window::AllowedTimeWindow,
};

/// Company-wide counts and weekly chart
#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    responses(
        (status = 200, description = "Today's counts and the weekly chart", body = AdminOverview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn get_overview(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let today = config.zone.now().date_naive();
    let overview = AdminOverview::load(backend.get_ref(), today, &config.zone)
        .await
        .map_err(dashboard_error)?;

    Ok(HttpResponse::Ok().json(overview))
}

/// Current allowed time-in window
#[utoipa::path(
    get,
    path = "/api/v1/admin/allowed-time",
    responses(
        (status = 200, description = "Allowed time", body = AllowedTimeConfig),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn get_allowed_time(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let allowed = backend.allowed_time().await.map_err(backend_error)?;
    Ok(HttpResponse::Ok().json(allowed))
}

/// Replace the allowed time-in window
#[utoipa::path(
    put,
    path = "/api/v1/admin/allowed-time",
    request_body = AllowedTimeConfig,
    responses(
        (status = 200, description = "Allowed time updated", body = AllowedTimeConfig),
        (status = 400, description = "Malformed 12-hour time", body = Object, example = json!({
            "error": "expected `H:MM AM|PM`, got \"25:00\""
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn update_allowed_time(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    payload: web::Json<AllowedTimeConfig>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if let Err(e) = AllowedTimeWindow::from_config(&payload) {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() })));
    }

    backend
        .set_allowed_time(&payload)
        .await
        .map_err(backend_error)?;

    tracing::info!(
        user_id = %auth.id,
        value = %payload.as_path_value(),
        "Allowed time updated"
    );

    Ok(HttpResponse::Ok().json(payload.into_inner()))
}

/// Latest time-in of every employee
#[utoipa::path(
    get,
    path = "/api/v1/admin/latest-time-in",
    responses(
        (status = 200, description = "Backend records, passed through", body = [Object]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn latest_time_in(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let rows = backend.all_latest_time_in().await.map_err(backend_error)?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Every time-in/out record
#[utoipa::path(
    get,
    path = "/api/v1/admin/time-records",
    responses(
        (status = 200, description = "Backend records, passed through", body = [Object]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn time_records(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let rows = backend.all_time_in_out().await.map_err(backend_error)?;
    Ok(HttpResponse::Ok().json(rows))
}
