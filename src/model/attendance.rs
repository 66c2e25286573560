use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::serde_ext::{id_string, non_empty};
use crate::utils::timestamp::{ViewerZone, parse_timestamp};

/// Status label the streak counter looks for.
pub const PRESENT_STATUS: &str = "Present";
pub const SICK_LEAVE_STATUS: &str = "Sick Leave";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": "42",
    "time_in": "2024-05-06T08:02:00Z",
    "time_out": "2024-05-06T17:01:00Z",
    "status": "Present",
    "date": "2024-05-06"
}))]
pub struct AttendanceRecord {
    #[serde(deserialize_with = "id_string")]
    pub employee_id: String,

    #[serde(default, deserialize_with = "non_empty")]
    pub time_in: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub time_out: Option<String>,

    /// Free-form label such as "Present", "Late" or "Sick Leave".
    #[serde(default, deserialize_with = "non_empty")]
    pub status: Option<String>,

    #[serde(default)]
    pub date: String,
}

impl AttendanceRecord {
    pub fn time_in_at(&self, zone: &ViewerZone) -> Option<DateTime<FixedOffset>> {
        self.time_in
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, zone))
    }

    pub fn is_present(&self) -> bool {
        self.status.as_deref() == Some(PRESENT_STATUS)
    }

    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee_id == employee_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_ids_and_missing_fields() {
        let record: AttendanceRecord = serde_json::from_value(serde_json::json!({
            "employee_id": 7,
            "time_in": "2024-05-06T08:00:00Z",
            "time_out": null,
            "date": "2024-05-06"
        }))
        .unwrap();

        assert_eq!(record.employee_id, "7");
        assert!(record.time_out.is_none());
        assert!(record.status.is_none());
        assert!(!record.is_present());
        assert!(record.belongs_to("7"));
    }

    #[test]
    fn empty_time_in_counts_as_missing() {
        let record: AttendanceRecord = serde_json::from_value(serde_json::json!({
            "employee_id": "a1",
            "time_in": "",
            "status": "Present"
        }))
        .unwrap();

        assert!(record.time_in.is_none());
        assert!(record.is_present());
        assert_eq!(record.date, "");
    }
}
