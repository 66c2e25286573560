use chrono::{Datelike, Timelike, Weekday};
use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::debug;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::stats::time_window::AllowedTimeWindow;
use crate::utils::timestamp::ViewerZone;

pub const WEEKDAY_LABELS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DayTally {
    pub present: u32,
    pub absent: u32,
}

/// Present/absent counts for Monday through Friday, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyStats {
    days: [DayTally; 5],
}

impl WeeklyStats {
    pub fn day(&self, weekday: Weekday) -> Option<&DayTally> {
        weekday_index(weekday).map(|idx| &self.days[idx])
    }

    pub fn labels(&self) -> Vec<String> {
        WEEKDAY_LABELS.iter().map(|d| d.to_string()).collect()
    }

    pub fn present_series(&self) -> Vec<u32> {
        self.days.iter().map(|d| d.present).collect()
    }

    pub fn absent_series(&self) -> Vec<u32> {
        self.days.iter().map(|d| d.absent).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DayTally)> {
        WEEKDAY_LABELS.iter().copied().zip(self.days.iter())
    }

    pub fn total(&self) -> u32 {
        self.days.iter().map(|d| d.present + d.absent).sum()
    }
}

impl Serialize for WeeklyStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (label, tally) in self.iter() {
            map.serialize_entry(label, tally)?;
        }
        map.end()
    }
}

fn weekday_index(weekday: Weekday) -> Option<usize> {
    match weekday {
        Weekday::Sat | Weekday::Sun => None,
        day => Some(day.num_days_from_monday() as usize),
    }
}

/// Buckets records by the weekday of their time-in and classifies each one
/// against `window`.
///
/// Weekend records and records without a parseable time-in are skipped.
/// The status label plays no part here.
pub fn aggregate_weekly(
    records: &[AttendanceRecord],
    window: &AllowedTimeWindow,
    zone: &ViewerZone,
) -> WeeklyStats {
    let mut stats = WeeklyStats::default();
    let mut skipped = 0usize;

    for record in records {
        let Some(time_in) = record.time_in_at(zone) else {
            skipped += 1;
            continue;
        };
        let Some(idx) = weekday_index(time_in.weekday()) else {
            skipped += 1;
            continue;
        };

        let minute = (time_in.hour() * 60 + time_in.minute()) as u16;
        let tally = &mut stats.days[idx];
        if window.contains(minute) {
            tally.present += 1;
        } else {
            tally.absent += 1;
        }
    }

    debug!(
        records = records.len(),
        skipped,
        counted = stats.total(),
        "Weekly attendance aggregated"
    );

    stats
}
