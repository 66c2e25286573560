//! Client side of the attendance REST backend.

mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpBackend;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;
use crate::model::time_record::{
    AllowedTimeConfig, CreatedTimeIn, TimeInOutRecord, TimeInToday, TimeOutToday, TotalTime,
};
use crate::utils::serde_ext::{id_string, string_list};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("backend rejected the credentials")]
    Unauthorized,
}

/// Identity the backend hands back for valid credentials.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginIdentity {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub role: String,
    #[serde(default, deserialize_with = "string_list")]
    pub claims: Vec<String>,
}

/// Every backend operation the service relies on.
///
/// Implementations must not retry; callers decide what a failure means.
#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginIdentity, BackendError>;

    /// `POST /time_in`
    async fn time_in(
        &self,
        user_id: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<CreatedTimeIn, BackendError>;

    /// `PUT /time_out/{id}`
    async fn time_out(&self, record_id: &str, at: DateTime<FixedOffset>)
    -> Result<(), BackendError>;

    /// `GET /total_time/{id}`
    async fn total_time(&self, record_id: &str) -> Result<TotalTime, BackendError>;

    /// `PUT /set_total_time/{id}`
    async fn set_total_time(&self, record_id: &str, total_time: &str) -> Result<(), BackendError>;

    /// `GET /allowed-time`
    async fn allowed_time(&self) -> Result<AllowedTimeConfig, BackendError>;

    /// `PUT /allowed-time/{value}`
    async fn set_allowed_time(&self, allowed: &AllowedTimeConfig) -> Result<(), BackendError>;

    /// `GET /check_time_in_today/{userId}`
    async fn check_time_in_today(&self, user_id: &str) -> Result<TimeInToday, BackendError>;

    /// `GET /check_time_out_today/{userId}`
    async fn check_time_out_today(&self, user_id: &str) -> Result<TimeOutToday, BackendError>;

    /// `GET /get_time_in_and_out/{userId}`
    async fn time_in_and_out(&self, user_id: &str) -> Result<TimeInOutRecord, BackendError>;

    /// `PUT /update_Data/{id}`
    async fn update_time_record(
        &self,
        record_id: &str,
        time_in: DateTime<FixedOffset>,
        time_out: DateTime<FixedOffset>,
    ) -> Result<(), BackendError>;

    /// `GET /all_latest_time_in`
    async fn all_latest_time_in(&self) -> Result<Vec<Value>, BackendError>;

    /// `GET /get_all_data_time_in_out`
    async fn all_time_in_out(&self) -> Result<Vec<Value>, BackendError>;

    /// `GET /employee_attendance`
    async fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, BackendError>;
}
