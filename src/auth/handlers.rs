use crate::{
    auth::{
        auth::AuthContext,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
    },
    client::{AttendanceBackend, BackendError},
    config::Config,
    model::role::Role,
    models::{Claims, LoginReqDto, LoginResponse, TokenPair, TokenType},
    utils::session_store::SessionStore,
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn issue_pair(
    context: &AuthContext,
    config: &Config,
) -> Result<(String, String, Claims), jsonwebtoken::errors::Error> {
    let (refresh_token, refresh_claims) =
        generate_refresh_token(context, &config.jwt_secret, config.refresh_token_ttl)?;
    let (access_token, _) = generate_access_token(
        context,
        &refresh_claims.jti,
        &config.jwt_secret,
        config.access_token_ttl,
    )?;
    Ok((access_token, refresh_token, refresh_claims))
}

/// Login with backend credentials
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(backend, config, sessions, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    backend: web::Data<dyn AttendanceBackend>,
    config: web::Data<Config>,
    sessions: web::Data<SessionStore>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().json(json!({
            "error": "Username or password required"
        }));
    }

    debug!("Checking credentials with backend");

    let identity = match backend.login(user.username.trim(), &user.password).await {
        Ok(identity) => identity,
        Err(BackendError::Unauthorized) => {
            info!("Invalid credentials");
            return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
        }
        Err(e) => {
            error!(error = %e, "Backend login failed");
            return HttpResponse::BadGateway().finish();
        }
    };

    let Some(role) = Role::from_name(&identity.role) else {
        warn!(role = %identity.role, "Backend returned an unknown role");
        return HttpResponse::Unauthorized().json(json!({ "error": "Invalid role" }));
    };

    let context = AuthContext {
        id: identity.id,
        role,
        claims: identity.claims,
        token_id: String::new(),
    };

    let (access_token, refresh_token, refresh_claims) = match issue_pair(&context, &config) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!(error = %e, "Failed to sign tokens");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!(user_id = %context.id, jti = %refresh_claims.jti, "Opening session");
    sessions.open(&refresh_claims.jti, &context.id).await;

    info!(user_id = %context.id, role = %role, "Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        id: context.id,
        role,
        claims: context.claims,
    })
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Refresh token invalid, used or closed")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    config: web::Data<Config>,
    sessions: web::Data<SessionStore>,
) -> impl Responder {
    let Some(token) = bearer(&req) else {
        return HttpResponse::Unauthorized().body("No token");
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    let old_jti = claims.jti.clone();
    let context = AuthContext::from(claims);

    let (access_token, refresh_token, new_claims) = match issue_pair(&context, &config) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!(error = %e, "Failed to sign tokens");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !sessions
        .rotate(&old_jti, &new_claims.jti, &context.id)
        .await
    {
        warn!(user_id = %context.id, jti = %old_jti, "Refresh token reused or closed");
        return HttpResponse::Unauthorized().finish();
    }

    HttpResponse::Ok().json(TokenPair {
        access_token,
        refresh_token,
    })
}

/// End the session of the presented token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Session closed (also when it did not exist)")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    config: web::Data<Config>,
    sessions: web::Data<SessionStore>,
) -> impl Responder {
    let Some(token) = bearer(&req) else {
        return HttpResponse::NoContent().finish();
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    match claims.token_type {
        TokenType::Refresh => sessions.close(&claims.jti).await,
        TokenType::Access => {
            sessions.revoke_access(&claims.jti).await;
            if let Some(session) = &claims.sid {
                sessions.close(session).await;
            }
        }
    }

    info!(user_id = %claims.sub, "Logged out");

    HttpResponse::NoContent().finish()
}
