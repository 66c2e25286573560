use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::model::time_record::TimeInOutRecord;
use crate::stats::summary::{format_streak, frequent_status, longest_streak};
use crate::stats::time_window::AllowedTimeWindow;
use crate::stats::weekly::aggregate_weekly;
use crate::utils::timestamp::ViewerZone;

/// Shown for every summary until a load succeeds.
pub const PLACEHOLDER: &str = "Not configured";

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[display(fmt = "idle")]
    Idle,
    #[display(fmt = "loading")]
    Loading,
    #[display(fmt = "ready")]
    Ready,
    #[display(fmt = "error")]
    Error,
}

/// What the dashboard renders: the weekly chart series plus three summary
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "labels": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
    "present": [1, 1, 0, 1, 0],
    "absent": [0, 0, 1, 0, 0],
    "total_time": "7h 45m",
    "frequent_status": "Present",
    "longest_streak": "2 days"
}))]
pub struct DashboardViewModel {
    pub labels: Vec<String>,
    pub present: Vec<u32>,
    pub absent: Vec<u32>,
    pub total_time: String,
    pub frequent_status: String,
    pub longest_streak: String,
}

impl Default for DashboardViewModel {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            present: Vec::new(),
            absent: Vec::new(),
            total_time: PLACEHOLDER.to_string(),
            frequent_status: PLACEHOLDER.to_string(),
            longest_streak: PLACEHOLDER.to_string(),
        }
    }
}

impl DashboardViewModel {
    pub fn build(
        records: &[AttendanceRecord],
        window: &AllowedTimeWindow,
        time_in_out: &TimeInOutRecord,
        zone: &ViewerZone,
    ) -> Self {
        let weekly = aggregate_weekly(records, window, zone);

        Self {
            labels: weekly.labels(),
            present: weekly.present_series(),
            absent: weekly.absent_series(),
            total_time: time_in_out.total_time_display(),
            frequent_status: frequent_status(records),
            longest_streak: format_streak(longest_streak(records, zone)),
        }
    }

    pub fn has_chart_data(&self) -> bool {
        !self.labels.is_empty()
    }

    /// `(day, present, absent)` per chart label.
    pub fn rows(&self) -> impl Iterator<Item = (&str, u32, u32)> {
        self.labels
            .iter()
            .zip(self.present.iter().zip(self.absent.iter()))
            .map(|(day, (present, absent))| (day.as_str(), *present, *absent))
    }
}
