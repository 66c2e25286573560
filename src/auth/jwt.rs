use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{
    auth::auth::AuthContext,
    models::{Claims, TokenType},
};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

fn issue(
    context: &AuthContext,
    token_type: TokenType,
    session: Option<&str>,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        sub: context.id.clone(),
        role: context.role,
        claims: context.claims.clone(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        sid: session.map(str::to_string),
        token_type,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

/// `session` is the refresh jti issued alongside, so logout can end both.
pub fn generate_access_token(
    context: &AuthContext,
    session: &str,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    issue(context, TokenType::Access, Some(session), secret, ttl)
}

pub fn generate_refresh_token(
    context: &AuthContext,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    issue(context, TokenType::Refresh, None, secret, ttl)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
