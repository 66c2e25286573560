use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::presenter::{DashboardError, fetch_allowed_window};
use crate::client::AttendanceBackend;
use crate::model::attendance::{AttendanceRecord, SICK_LEAVE_STATUS};
use crate::stats::time_window::AllowedTimeWindow;
use crate::stats::weekly::{WeeklyStats, aggregate_weekly};
use crate::utils::timestamp::ViewerZone;

/// Company-wide numbers for the admin screen.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminOverview {
    #[schema(value_type = String, format = "date", example = "2024-05-06")]
    pub today: NaiveDate,
    /// Timed in today and not yet timed out.
    pub in_office: usize,
    pub sick_leave: usize,
    pub window: AllowedTimeWindow,
    #[schema(value_type = Object)]
    pub weekly: WeeklyStats,
}

pub fn in_office_count(records: &[AttendanceRecord], today: NaiveDate, zone: &ViewerZone) -> usize {
    records
        .iter()
        .filter(|r| r.time_out.is_none())
        .filter(|r| r.time_in_at(zone).is_some_and(|at| at.date_naive() == today))
        .count()
}

pub fn sick_leave_count(records: &[AttendanceRecord], today: NaiveDate) -> usize {
    let today = today.format("%Y-%m-%d").to_string();
    records
        .iter()
        .filter(|r| r.status.as_deref() == Some(SICK_LEAVE_STATUS) && r.date == today)
        .count()
}

impl AdminOverview {
    pub fn build(
        records: &[AttendanceRecord],
        window: AllowedTimeWindow,
        today: NaiveDate,
        zone: &ViewerZone,
    ) -> Self {
        Self {
            today,
            in_office: in_office_count(records, today, zone),
            sick_leave: sick_leave_count(records, today),
            window,
            weekly: aggregate_weekly(records, &window, zone),
        }
    }

    pub async fn load(
        backend: &dyn AttendanceBackend,
        today: NaiveDate,
        zone: &ViewerZone,
    ) -> Result<Self, DashboardError> {
        let window = fetch_allowed_window(backend).await?;
        let records = backend.attendance_records().await?;
        Ok(Self::build(&records, window, today, zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeBackend, record};

    fn utc() -> ViewerZone {
        ViewerZone::Fixed(chrono::FixedOffset::east_opt(0).unwrap())
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn counts_people_still_in_the_office_today() {
        let mut gone_home = record("2", "2024-05-06T08:00:00Z", "Present");
        gone_home.time_out = Some("2024-05-06T17:00:00Z".into());

        let records = vec![
            record("1", "2024-05-06T08:00:00Z", "Present"),
            gone_home,
            record("3", "2024-05-03T08:00:00Z", "Present"),
        ];

        assert_eq!(in_office_count(&records, monday(), &utc()), 1);
    }

    #[test]
    fn counts_sick_leave_by_record_date() {
        let mut sick_today = record("1", "2024-05-06T08:00:00Z", "Sick Leave");
        sick_today.date = "2024-05-06".into();
        let mut sick_friday = record("2", "2024-05-03T08:00:00Z", "Sick Leave");
        sick_friday.date = "2024-05-03".into();

        let records = vec![sick_today, sick_friday, record("3", "2024-05-06T08:00:00Z", "Present")];
        assert_eq!(sick_leave_count(&records, monday()), 1);
    }

    #[actix_web::test]
    async fn loads_overview_over_all_employees() {
        let backend = FakeBackend::with_records(vec![
            record("1", "2024-05-06T08:00:00Z", "Present"),
            record("2", "2024-05-06T18:00:00Z", "Present"),
        ]);

        let overview = AdminOverview::load(&backend, monday(), &utc()).await.unwrap();

        assert_eq!(overview.in_office, 2);
        assert_eq!(overview.weekly.present_series(), vec![1, 0, 0, 0, 0]);
        assert_eq!(overview.weekly.absent_series(), vec![1, 0, 0, 0, 0]);
        assert_eq!(backend.calls()[0], "allowed_time");
    }
}
