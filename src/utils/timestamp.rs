use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Time zone weekdays, minutes of day and "today" are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerZone {
    /// Host zone. The offset is looked up per instant, so daylight saving
    /// applies to each timestamp on its own date.
    Local,
    Fixed(FixedOffset),
}

impl ViewerZone {
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            ViewerZone::Local => Local.offset_from_utc_datetime(utc),
            ViewerZone::Fixed(offset) => *offset,
        }
    }

    pub fn convert<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset_at(&at.naive_utc()))
    }

    /// Wall-clock time in this zone. Ambiguous local times take the earlier
    /// instant; times skipped by a DST jump have none.
    pub fn resolve_local(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            ViewerZone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|at| self.convert(&at)),
            ViewerZone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.convert(&Utc::now())
    }
}

impl From<FixedOffset> for ViewerZone {
    fn from(offset: FixedOffset) -> Self {
        ViewerZone::Fixed(offset)
    }
}

impl fmt::Display for ViewerZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerZone::Local => f.write_str("local"),
            ViewerZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Parses a backend timestamp into the viewer's zone.
///
/// Timestamps carrying `Z` or an explicit offset are converted; naive ones are
/// taken as already being viewer-local. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str, zone: &ViewerZone) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(zone.convert(&dt));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| zone.resolve_local(&naive))
}
