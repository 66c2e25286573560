use crate::{
    auth::guard::{authorize, login_required},
    model::role::Role,
    models::Claims,
};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Who is calling: created at login, dropped at logout, read-only in between.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub id: String,
    pub role: Role,
    pub claims: Vec<String>,

    /// Id of the access token this context was read from.
    pub token_id: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            claims: claims.claims,
            token_id: claims.jti,
        }
    }
}

impl FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = req.extensions().get::<AuthContext>().cloned();
        ready(context.ok_or_else(login_required))
    }
}

impl AuthContext {
    pub fn require_any(&self, allowed: &[Role]) -> actix_web::Result<()> {
        authorize(Some(self), allowed).into_result()
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        self.require_any(Role::ADMIN_ONLY)
    }
}
