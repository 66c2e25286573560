use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub id: String,
    pub role: Role,
    pub claims: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Backend user id.
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub claims: Vec<String>,
    pub exp: usize,
    pub jti: String,
    /// Refresh jti of the session an access token was issued with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
