use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use dotenvy::dotenv;

use crate::utils::timestamp::ViewerZone;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    /// Base url of the attendance REST backend.
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub jwt_secret: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Zone dashboards are computed in (weekday, minute of day, "today").
    pub zone: ViewerZone,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let zone = viewer_zone(env::var("UTC_OFFSET_MINUTES").ok().as_deref())?;

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            backend_url: required("BACKEND_URL")?,
            backend_timeout: Duration::from_secs(parsed_or("BACKEND_TIMEOUT_SECS", 30)?),
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed_or("ACCESS_TOKEN_TTL", 900)?, // default 15 min
            refresh_token_ttl: parsed_or("REFRESH_TOKEN_TTL", 604_800)?, // default 7 days

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_refresh_per_min: parsed_or("RATE_REFRESH_PER_MIN", 30)?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            zone,
        })
    }
}

/// A fixed offset when `UTC_OFFSET_MINUTES` is given, otherwise the host zone.
pub fn viewer_zone(minutes: Option<&str>) -> Result<ViewerZone> {
    let Some(raw) = minutes else {
        return Ok(ViewerZone::Local);
    };
    let minutes = raw
        .trim()
        .parse()
        .with_context(|| format!("UTC_OFFSET_MINUTES is not a number: {raw:?}"))?;
    offset_from_minutes(minutes).map(ViewerZone::Fixed)
}

pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("UTC offset of {minutes} minutes is out of range"))
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".into(),
            backend_url: "http://backend.test/".into(),
            backend_timeout: Duration::from_secs(1),
            jwt_secret: "test-secret".into(),
            access_token_ttl: 900,
            refresh_token_ttl: 3600,
            rate_login_per_min: 60,
            rate_refresh_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api/v1".into(),
            zone: ViewerZone::Fixed(FixedOffset::east_opt(0).unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_offsets_from_minutes() {
        assert_eq!(offset_from_minutes(480).unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(offset_from_minutes(-330).unwrap().local_minus_utc(), -330 * 60);
        assert!(offset_from_minutes(24 * 60).is_err());
    }

    #[test]
    fn huge_offsets_are_rejected_not_overflowed() {
        assert!(offset_from_minutes(i32::MAX).is_err());
        assert!(offset_from_minutes(i32::MIN).is_err());
    }

    #[test]
    fn zone_is_local_unless_minutes_are_given() {
        assert_eq!(viewer_zone(None).unwrap(), ViewerZone::Local);
        assert_eq!(
            viewer_zone(Some(" 120 ")).unwrap(),
            ViewerZone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap())
        );
        assert!(viewer_zone(Some("two hours")).is_err());
    }
}
