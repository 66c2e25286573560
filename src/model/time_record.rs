use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::serde_ext::{non_empty, opt_id_string};

/// Fallback shown when the backend has no total for the user yet.
pub const DEFAULT_TOTAL_TIME: &str = "0h 0m";

/// The user's current time-in/out record as kept by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeInOutRecord {
    #[serde(rename = "Id", default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub time_in: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub time_out: Option<String>,

    #[serde(
        rename = "totalTime",
        alias = "total_time",
        default,
        deserialize_with = "non_empty"
    )]
    pub total_time: Option<String>,

    #[serde(rename = "formattedItem", default, deserialize_with = "non_empty")]
    pub formatted_item: Option<String>,
}

impl TimeInOutRecord {
    pub fn total_time_display(&self) -> String {
        self.total_time
            .as_deref()
            .or(self.formatted_item.as_deref())
            .unwrap_or(DEFAULT_TOTAL_TIME)
            .to_string()
    }
}

/// `GET /allowed-time` payload. Both values are 12-hour strings like `08:00 AM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllowedTimeConfig {
    #[schema(example = "08:00 AM")]
    pub start_time: String,
    #[schema(example = "05:00 PM")]
    pub end_time: String,
}

impl AllowedTimeConfig {
    /// Path segment used by `PUT /allowed-time/{value}`.
    pub fn as_path_value(&self) -> String {
        format!("{}-{}", self.start_time.trim(), self.end_time.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeInToday {
    #[serde(rename = "dataOfTimeIn", default, deserialize_with = "non_empty")]
    pub time_in: Option<String>,
    #[serde(rename = "Id", default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeOutToday {
    #[serde(rename = "dataOfTimeOut", default, deserialize_with = "non_empty")]
    pub time_out: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTimeIn {
    #[serde(rename = "Id", deserialize_with = "crate::utils::serde_ext::id_string")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalTime {
    pub total_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_time_prefers_total_then_formatted_item() {
        let record: TimeInOutRecord = serde_json::from_value(serde_json::json!({
            "Id": 3,
            "totalTime": "7h 45m",
            "formattedItem": "7:45"
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("3"));
        assert_eq!(record.total_time_display(), "7h 45m");

        let record: TimeInOutRecord =
            serde_json::from_value(serde_json::json!({ "formattedItem": "7:45" })).unwrap();
        assert_eq!(record.total_time_display(), "7:45");

        assert_eq!(TimeInOutRecord::default().total_time_display(), "0h 0m");
    }

    #[test]
    fn allowed_time_uses_camel_case_keys() {
        let cfg: AllowedTimeConfig = serde_json::from_value(serde_json::json!({
            "startTime": "08:00 AM",
            "endTime": "05:00 PM"
        }))
        .unwrap();
        assert_eq!(cfg.as_path_value(), "08:00 AM-05:00 PM");
    }
}
