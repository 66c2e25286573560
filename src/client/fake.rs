//! In-memory backend used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use super::{AttendanceBackend, BackendError, LoginIdentity};
use crate::model::attendance::AttendanceRecord;
use crate::model::time_record::{
    AllowedTimeConfig, CreatedTimeIn, TimeInOutRecord, TimeInToday, TimeOutToday, TotalTime,
};

pub struct FakeBackend {
    pub allowed: Option<AllowedTimeConfig>,
    pub records: Option<Vec<AttendanceRecord>>,
    pub time_in_out: Option<TimeInOutRecord>,
    pub identity: Option<LoginIdentity>,
    pub total_time: String,
    pub fail_time_out: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            allowed: Some(AllowedTimeConfig {
                start_time: "08:00 AM".into(),
                end_time: "05:00 PM".into(),
            }),
            records: Some(Vec::new()),
            time_in_out: Some(TimeInOutRecord::default()),
            identity: None,
            total_time: "8h 0m".into(),
            fail_time_out: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_records(records: Vec<AttendanceRecord>) -> Self {
        Self {
            records: Some(records),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record_call(&self, call: impl Into<String>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.into());
        }
    }
}

fn unavailable(endpoint: &str) -> BackendError {
    BackendError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

pub fn record(employee_id: &str, time_in: &str, status: &str) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: employee_id.into(),
        time_in: Some(time_in.into()),
        time_out: None,
        status: Some(status.into()),
        date: time_in.get(..10).unwrap_or_default().into(),
    }
}

#[async_trait]
impl AttendanceBackend for FakeBackend {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginIdentity, BackendError> {
        self.record_call(format!("login {username}"));
        self.identity.clone().ok_or(BackendError::Unauthorized)
    }

    async fn time_in(
        &self,
        user_id: &str,
        _at: DateTime<FixedOffset>,
    ) -> Result<CreatedTimeIn, BackendError> {
        self.record_call(format!("time_in {user_id}"));
        Ok(CreatedTimeIn { id: "101".into() })
    }

    async fn time_out(
        &self,
        record_id: &str,
        _at: DateTime<FixedOffset>,
    ) -> Result<(), BackendError> {
        self.record_call(format!("time_out {record_id}"));
        if self.fail_time_out {
            return Err(unavailable("time_out"));
        }
        Ok(())
    }

    async fn total_time(&self, record_id: &str) -> Result<TotalTime, BackendError> {
        self.record_call(format!("total_time {record_id}"));
        Ok(TotalTime {
            total_time: self.total_time.clone(),
        })
    }

    async fn set_total_time(&self, record_id: &str, total_time: &str) -> Result<(), BackendError> {
        self.record_call(format!("set_total_time {record_id} {total_time}"));
        Ok(())
    }

    async fn allowed_time(&self) -> Result<AllowedTimeConfig, BackendError> {
        self.record_call("allowed_time");
        self.allowed.clone().ok_or_else(|| unavailable("allowed-time"))
    }

    async fn set_allowed_time(&self, allowed: &AllowedTimeConfig) -> Result<(), BackendError> {
        self.record_call(format!("set_allowed_time {}", allowed.as_path_value()));
        Ok(())
    }

    async fn check_time_in_today(&self, user_id: &str) -> Result<TimeInToday, BackendError> {
        self.record_call(format!("check_time_in_today {user_id}"));
        Ok(TimeInToday {
            time_in: Some("08:01".into()),
            id: Some("101".into()),
        })
    }

    async fn check_time_out_today(&self, user_id: &str) -> Result<TimeOutToday, BackendError> {
        self.record_call(format!("check_time_out_today {user_id}"));
        Ok(TimeOutToday::default())
    }

    async fn time_in_and_out(&self, user_id: &str) -> Result<TimeInOutRecord, BackendError> {
        self.record_call(format!("time_in_and_out {user_id}"));
        self.time_in_out
            .clone()
            .ok_or_else(|| unavailable("get_time_in_and_out"))
    }

    async fn update_time_record(
        &self,
        record_id: &str,
        _time_in: DateTime<FixedOffset>,
        _time_out: DateTime<FixedOffset>,
    ) -> Result<(), BackendError> {
        self.record_call(format!("update_time_record {record_id}"));
        Ok(())
    }

    async fn all_latest_time_in(&self) -> Result<Vec<Value>, BackendError> {
        self.record_call("all_latest_time_in");
        Ok(vec![serde_json::json!({ "user_Id": "7", "time_in": "08:00" })])
    }

    async fn all_time_in_out(&self) -> Result<Vec<Value>, BackendError> {
        self.record_call("all_time_in_out");
        Ok(Vec::new())
    }

    async fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, BackendError> {
        self.record_call("attendance_records");
        self.records
            .clone()
            .ok_or_else(|| unavailable("employee_attendance"))
    }
}
