/// Builds a test service whose requests already carry an [`AuthContext`]
/// for user `7` with the given role. `@shared` takes an `Arc` so the test
/// can keep inspecting the backend.
///
/// [`AuthContext`]: crate::auth::auth::AuthContext
#[cfg(test)]
macro_rules! signed_in_app {
    ($backend:expr, $role:expr, $routes:expr) => {
        signed_in_app!(@shared std::sync::Arc::new($backend), $role, $routes)
    };
    (@shared $backend:expr, $role:expr, $routes:expr) => {{
        use actix_web::HttpMessage;

        let backend: std::sync::Arc<dyn crate::client::AttendanceBackend> = $backend;
        let role: crate::model::role::Role = $role;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(backend))
                .app_data(actix_web::web::Data::new(crate::config::Config::for_tests()))
                .wrap_fn(move |req: actix_web::dev::ServiceRequest, srv| {
                    req.extensions_mut().insert(crate::auth::auth::AuthContext {
                        id: "7".into(),
                        role,
                        claims: Vec::new(),
                        token_id: "t".into(),
                    });
                    actix_web::dev::Service::call(srv, req)
                })
                .configure($routes),
        )
        .await
    }};
}

pub mod admin;
pub mod clock;
pub mod dashboard;
pub mod time_entry;

use actix_web::{HttpResponse, error::InternalError};
use serde_json::json;

use crate::client::BackendError;
use crate::dashboard::presenter::DashboardError;

/// Backend trouble is the gateway's fault, not the caller's.
pub(crate) fn backend_error(e: BackendError) -> actix_web::Error {
    tracing::error!(error = %e, "Backend call failed");
    InternalError::from_response(
        e.to_string(),
        HttpResponse::BadGateway().json(json!({ "error": "Attendance backend unavailable" })),
    )
    .into()
}

pub(crate) fn dashboard_error(e: DashboardError) -> actix_web::Error {
    match e {
        DashboardError::Backend(e) => backend_error(e),
        DashboardError::Window(e) => {
            tracing::error!(error = %e, "Allowed time is misconfigured");
            actix_web::error::ErrorInternalServerError("Allowed time is misconfigured")
        }
    }
}
