use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{AttendanceBackend, BackendError, LoginIdentity};
use crate::model::attendance::AttendanceRecord;
use crate::model::time_record::{
    AllowedTimeConfig, CreatedTimeIn, TimeInOutRecord, TimeInToday, TimeOutToday, TotalTime,
};

const USER_AGENT: &str = concat!("whereabouts/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`AttendanceBackend`].
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("BACKEND_URL is not a valid url: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("BACKEND_URL cannot be used as a base url: {base_url}");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Vec<u8>, BackendError> {
        let endpoint = segments.first().copied().unwrap_or_default().to_string();
        let url = self.url(segments)?;

        debug!(%method, %url, "Backend request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if endpoint == "login"
            && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Backend answered with an error");
            return Err(BackendError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        let bytes = self.call(Method::GET, segments, None).await?;
        decode(segments, &bytes)
    }

    /// GET for endpoints that answer `null` or an empty body when there is
    /// nothing recorded yet.
    async fn get_json_or_default<T>(&self, segments: &[&str]) -> Result<T, BackendError>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = self.call(Method::GET, segments, None).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        decode::<Option<T>>(segments, &bytes).map(Option::unwrap_or_default)
    }
}

fn decode<T: DeserializeOwned>(segments: &[&str], bytes: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(bytes).map_err(|source| BackendError::Decode {
        endpoint: segments.first().copied().unwrap_or_default().to_string(),
        source,
    })
}

#[async_trait]
impl AttendanceBackend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<LoginIdentity, BackendError> {
        let body = json!({ "username": username, "password": password });
        let bytes = self.call(Method::POST, &["login"], Some(body)).await?;
        decode(&["login"], &bytes)
    }

    async fn time_in(
        &self,
        user_id: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<CreatedTimeIn, BackendError> {
        let body = json!({ "user_Id": user_id, "time_in": at.to_rfc3339() });
        let bytes = self.call(Method::POST, &["time_in"], Some(body)).await?;
        decode(&["time_in"], &bytes)
    }

    async fn time_out(
        &self,
        record_id: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<(), BackendError> {
        let body = json!({ "time_out": at.to_rfc3339() });
        self.call(Method::PUT, &["time_out", record_id], Some(body))
            .await
            .map(drop)
    }

    async fn total_time(&self, record_id: &str) -> Result<TotalTime, BackendError> {
        self.get_json(&["total_time", record_id]).await
    }

    async fn set_total_time(&self, record_id: &str, total_time: &str) -> Result<(), BackendError> {
        let body = json!({ "total_time": total_time });
        self.call(Method::PUT, &["set_total_time", record_id], Some(body))
            .await
            .map(drop)
    }

    async fn allowed_time(&self) -> Result<AllowedTimeConfig, BackendError> {
        self.get_json(&["allowed-time"]).await
    }

    async fn set_allowed_time(&self, allowed: &AllowedTimeConfig) -> Result<(), BackendError> {
        let value = allowed.as_path_value();
        self.call(Method::PUT, &["allowed-time", &value], Some(json!({})))
            .await
            .map(drop)
    }

    async fn check_time_in_today(&self, user_id: &str) -> Result<TimeInToday, BackendError> {
        self.get_json_or_default(&["check_time_in_today", user_id])
            .await
    }

    async fn check_time_out_today(&self, user_id: &str) -> Result<TimeOutToday, BackendError> {
        self.get_json_or_default(&["check_time_out_today", user_id])
            .await
    }

    async fn time_in_and_out(&self, user_id: &str) -> Result<TimeInOutRecord, BackendError> {
        self.get_json_or_default(&["get_time_in_and_out", user_id])
            .await
    }

    async fn update_time_record(
        &self,
        record_id: &str,
        time_in: DateTime<FixedOffset>,
        time_out: DateTime<FixedOffset>,
    ) -> Result<(), BackendError> {
        let body = json!({
            "time_in": time_in.to_rfc3339(),
            "time_out": time_out.to_rfc3339(),
        });
        self.call(Method::PUT, &["update_Data", record_id], Some(body))
            .await
            .map(drop)
    }

    async fn all_latest_time_in(&self) -> Result<Vec<Value>, BackendError> {
        self.get_json_or_default(&["all_latest_time_in"]).await
    }

    async fn all_time_in_out(&self) -> Result<Vec<Value>, BackendError> {
        self.get_json_or_default(&["get_all_data_time_in_out"])
            .await
    }

    async fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, BackendError> {
        self.get_json_or_default(&["employee_attendance"]).await
    }
}
