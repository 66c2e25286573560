use crate::model::attendance::AttendanceRecord;
use crate::utils::timestamp::ViewerZone;

pub const UNKNOWN_STATUS: &str = "Unknown";
/// Reported when there is nothing to tally.
pub const DEFAULT_FREQUENT_STATUS: &str = "On Time";

/// Most common status label. Ties go to the label seen first.
pub fn frequent_status(records: &[AttendanceRecord]) -> String {
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for record in records {
        let status = record.status.as_deref().unwrap_or(UNKNOWN_STATUS);
        match counts.iter_mut().find(|(label, _)| *label == status) {
            Some((_, n)) => *n += 1,
            None => counts.push((status, 1)),
        }
    }

    counts
        .iter()
        .fold(None::<(&str, u32)>, |best, &(label, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((label, n)),
        })
        .map(|(label, _)| label.to_string())
        .unwrap_or_else(|| DEFAULT_FREQUENT_STATUS.to_string())
}

/// Longest run of consecutive "Present" records ordered by time-in.
///
/// Calendar gaps between records do not break a run; any other status does.
/// Records without a parseable time-in are left out.
pub fn longest_streak(records: &[AttendanceRecord], zone: &ViewerZone) -> u32 {
    let mut timeline: Vec<_> = records
        .iter()
        .filter_map(|r| r.time_in_at(zone).map(|at| (at, r.is_present())))
        .collect();
    timeline.sort_by_key(|(at, _)| *at);

    let mut current = 0u32;
    let mut longest = 0u32;
    for (_, present) in timeline {
        if present {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

pub fn format_streak(days: u32) -> String {
    format!("{} days", days)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::FixedOffset;

    fn utc() -> ViewerZone {
        FixedOffset::east_opt(0).unwrap().into()
    }

    fn record(time_in: Option<&str>, status: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "1".into(),
            time_in: time_in.map(String::from),
            time_out: None,
            status: status.map(String::from),
            date: String::new(),
        }
    }

    fn statuses(labels: &[&str]) -> Vec<AttendanceRecord> {
        labels
            .iter()
            .enumerate()
            .map(|(day, status)| {
                let ts = format!("2024-05-{:02}T08:30:00Z", day + 1);
                record(Some(&ts), Some(status))
            })
            .collect()
    }

    #[test]
    fn frequent_status_picks_the_majority() {
        let records = statuses(&["Present", "Present", "Sick Leave"]);
        assert_eq!(frequent_status(&records), "Present");
    }

    #[test]
    fn frequent_status_defaults_when_empty() {
        assert_eq!(frequent_status(&[]), "On Time");
    }

    #[test]
    fn frequent_status_breaks_ties_by_first_seen() {
        let records = statuses(&["Late", "Present", "Present", "Late"]);
        assert_eq!(frequent_status(&records), "Late");
    }

    #[test]
    fn missing_status_is_tallied_as_unknown() {
        let records = vec![
            record(None, None),
            record(None, None),
            record(None, Some("Present")),
        ];
        assert_eq!(frequent_status(&records), "Unknown");
    }

    #[test]
    fn streak_resets_on_non_present() {
        let records = statuses(&["Present", "Present", "Absent", "Present"]);
        assert_eq!(format_streak(longest_streak(&records, &utc())), "2 days");
    }

    #[test]
    fn streak_is_zero_without_present_records() {
        let records = statuses(&["Absent", "Sick Leave", "Late"]);
        assert_eq!(format_streak(longest_streak(&records, &utc())), "0 days");
        assert_eq!(longest_streak(&[], &utc()), 0);
    }

    #[test]
    fn streak_orders_by_time_in_not_input_order() {
        let mut records = statuses(&["Present", "Present", "Present", "Absent"]);
        records.swap(1, 3);
        assert_eq!(longest_streak(&records, &utc()), 3);
    }

    #[test]
    fn streak_ignores_records_without_time_in() {
        let mut records = statuses(&["Present", "Present"]);
        records.insert(1, record(None, Some("Absent")));
        assert_eq!(longest_streak(&records, &utc()), 2);
    }

    #[test]
    fn streak_spans_calendar_gaps() {
        let records = vec![
            record(Some("2024-05-03T09:00:00Z"), Some("Present")),
            record(Some("2024-05-06T09:00:00Z"), Some("Present")),
            record(Some("2024-05-20T09:00:00Z"), Some("Present")),
        ];
        assert_eq!(longest_streak(&records, &utc()), 3);
    }
}
