use crate::auth::auth::AuthContext;
use crate::auth::guard::LOGIN_ROUTE;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::models::TokenType;
use crate::utils::session_store::SessionStore;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

fn reject(req: ServiceRequest, error: &str, details: Option<String>) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(json!({
        "error": error,
        "details": details,
        "redirect": LOGIN_ROUTE
    }));
    req.into_response(resp.map_into_boxed_body())
}

/// Verifies the bearer token and attaches the caller's [`AuthContext`].
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;
    let sessions = req
        .app_data::<Data<SessionStore>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Session store missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => match h.to_str() {
            Ok(v) => v.to_string(),
            Err(_) => return Ok(reject(req, "Invalid Authorization header encoding", None)),
        },
        None => return Ok(reject(req, "Missing Authorization header", None)),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return Ok(reject(
                req,
                "Authorization header must start with Bearer",
                None,
            ));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => return Ok(reject(req, "Invalid or expired token", Some(e))),
    };

    if claims.token_type != TokenType::Access {
        return Ok(reject(req, "Access token required", None));
    }

    if sessions.is_revoked(&claims.jti) {
        return Ok(reject(req, "Session has ended", None));
    }

    req.extensions_mut().insert(AuthContext::from(claims));

    next.call(req).await
}
