use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::backend_error;
use crate::{
    auth::{auth::AuthContext, guard::role_forbidden},
    client::AttendanceBackend,
    config::Config,
    model::{
        role::Role,
        time_record::{TimeInToday, TimeOutToday},
    },
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClockRequest {
    /// Defaults to now.
    #[schema(value_type = Option<String>, format = DateTime, example = "2024-05-06T08:02:00+08:00")]
    pub at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CorrectionRequest {
    #[schema(value_type = String, format = DateTime)]
    pub time_in: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub time_out: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeOutResponse {
    pub id: String,
    #[schema(example = "8h 12m")]
    pub total_time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayStatus {
    pub time_in: TimeInToday,
    pub time_out: TimeOutToday,
}

fn stamp(body: Option<web::Json<ClockRequest>>, config: &Config) -> DateTime<FixedOffset> {
    body.and_then(|b| b.into_inner().at)
        .unwrap_or_else(|| config.zone.now())
}

/// Clock in the calling user
#[utoipa::path(
    post,
    path = "/api/v1/time/in",
    request_body(content = ClockRequest, description = "Optional; omit to stamp now"),
    responses(
        (status = 201, description = "Timed in", body = Object, example = json!({ "id": "101" })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time"
)]
pub async fn time_in(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
    body: Option<web::Json<ClockRequest>>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(Role::TIME_KEEPERS)?;

    let at = stamp(body, &config);
    let created = backend.time_in(&auth.id, at).await.map_err(backend_error)?;

    tracing::info!(user_id = %auth.id, record_id = %created.id, "Timed in");

    Ok(HttpResponse::Created().json(json!({ "id": created.id })))
}

/// Clock out and store the record's total time
///
/// Time-out, total-time lookup and total-time write run in order; the first
/// failure stops the chain. Non-admins may only close their own open record
/// from today.
#[utoipa::path(
    put,
    path = "/api/v1/time/out/{id}",
    params(
        ("id" = String, Path, description = "Time record id")
    ),
    request_body(content = ClockRequest, description = "Optional; omit to stamp now"),
    responses(
        (status = 200, description = "Timed out", body = TimeOutResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time"
)]
pub async fn time_out(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
    path: web::Path<String>,
    body: Option<web::Json<ClockRequest>>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(Role::TIME_KEEPERS)?;

    let id = path.into_inner();
    if auth.role != Role::Admin {
        let today = backend
            .check_time_in_today(&auth.id)
            .await
            .map_err(backend_error)?;
        if today.id.as_deref() != Some(id.as_str()) {
            tracing::warn!(user_id = %auth.id, record_id = %id, "Time-out on a record not owned by caller");
            return Err(role_forbidden());
        }
    }
    let at = stamp(body, &config);

    backend.time_out(&id, at).await.map_err(backend_error)?;
    let total = backend.total_time(&id).await.map_err(backend_error)?;
    backend
        .set_total_time(&id, &total.total_time)
        .await
        .map_err(backend_error)?;

    tracing::info!(user_id = %auth.id, record_id = %id, total = %total.total_time, "Timed out");

    Ok(HttpResponse::Ok().json(TimeOutResponse {
        id,
        total_time: total.total_time,
    }))
}

/// Whether the calling user has timed in and out today
#[utoipa::path(
    get,
    path = "/api/v1/time/today",
    responses(
        (status = 200, description = "Today's time-in and time-out", body = TodayStatus),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time"
)]
pub async fn today(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
) -> actix_web::Result<impl Responder> {
    auth.require_any(Role::TIME_KEEPERS)?;

    let (time_in, time_out) = futures::try_join!(
        backend.check_time_in_today(&auth.id),
        backend.check_time_out_today(&auth.id),
    )
    .map_err(backend_error)?;

    Ok(HttpResponse::Ok().json(TodayStatus { time_in, time_out }))
}

/// Correct a time record
#[utoipa::path(
    put,
    path = "/api/v1/time/records/{id}",
    params(
        ("id" = String, Path, description = "Time record id")
    ),
    request_body = CorrectionRequest,
    responses(
        (status = 200, description = "Record updated", body = Object, example = json!({
            "message": "Record updated"
        })),
        (status = 400, description = "time_out is before time_in"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Time"
)]
pub async fn update_record(
    auth: AuthContext,
    backend: web::Data<dyn AttendanceBackend>,
    path: web::Path<String>,
    payload: web::Json<CorrectionRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.time_out < payload.time_in {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "time_out is before time_in"
        })));
    }

    let id = path.into_inner();
    backend
        .update_time_record(&id, payload.time_in, payload.time_out)
        .await
        .map_err(backend_error)?;

    tracing::info!(user_id = %auth.id, record_id = %id, "Time record corrected");

    Ok(HttpResponse::Ok().json(json!({ "message": "Record updated" })))
}
