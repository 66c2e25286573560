use actix_web::{HttpResponse, error::InternalError};
use serde_json::json;

use crate::{auth::auth::AuthContext, model::role::Role};

pub const LOGIN_ROUTE: &str = "/login";
/// Catch-all route callers are sent to when their role is not allowed.
pub const FALLBACK_ROUTE: &str = "/**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToFallback,
}

/// Allow-list check for a route.
pub fn authorize(context: Option<&AuthContext>, allowed: &[Role]) -> GuardDecision {
    match context {
        None => GuardDecision::RedirectToLogin,
        Some(c) if allowed.contains(&c.role) => GuardDecision::Allow,
        Some(_) => GuardDecision::RedirectToFallback,
    }
}

pub fn login_required() -> actix_web::Error {
    InternalError::from_response(
        "login required",
        HttpResponse::Unauthorized().json(json!({
            "error": "Login required",
            "redirect": LOGIN_ROUTE
        })),
    )
    .into()
}

pub fn role_forbidden() -> actix_web::Error {
    InternalError::from_response(
        "role not allowed",
        HttpResponse::Forbidden().json(json!({
            "error": "Role not allowed for this route",
            "redirect": FALLBACK_ROUTE
        })),
    )
    .into()
}

impl GuardDecision {
    pub fn into_result(self) -> actix_web::Result<()> {
        match self {
            GuardDecision::Allow => Ok(()),
            GuardDecision::RedirectToLogin => Err(login_required()),
            GuardDecision::RedirectToFallback => Err(role_forbidden()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            id: "1".into(),
            role,
            claims: Vec::new(),
            token_id: "t".into(),
        }
    }

    #[test]
    fn missing_identity_goes_to_login() {
        assert_eq!(authorize(None, Role::ADMIN_ONLY), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn allow_list_is_respected() {
        assert_eq!(
            authorize(Some(&context(Role::Admin)), Role::ADMIN_ONLY),
            GuardDecision::Allow
        );
        assert_eq!(
            authorize(Some(&context(Role::Tablet)), Role::DASHBOARD),
            GuardDecision::RedirectToFallback
        );
        assert_eq!(
            authorize(Some(&context(Role::Tablet)), Role::TIME_KEEPERS),
            GuardDecision::Allow
        );
    }

    #[test]
    fn rejections_map_to_status_codes() {
        let err = GuardDecision::RedirectToLogin.into_result().unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let err = GuardDecision::RedirectToFallback.into_result().unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);

        assert!(GuardDecision::Allow.into_result().is_ok());
    }
}
