use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::info;
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::timestamp::ViewerZone;

const FULL_FORMAT: &str = "%B %d, %Y, %I:%M:%S %p";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClockDisplay {
    #[schema(example = "October 18, 2026, 03:04:05 PM")]
    pub full: String,
    #[schema(example = "15:04:05")]
    pub time: String,
    #[schema(example = "October 18, 2026")]
    pub date: String,
}

impl ClockDisplay {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self {
            full: now.format(FULL_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
            date: now.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Clock strings shared between the ticker and request handlers.
#[derive(Clone)]
pub struct LiveClock {
    zone: ViewerZone,
    display: Arc<RwLock<ClockDisplay>>,
}

impl LiveClock {
    pub fn new(zone: ViewerZone) -> Self {
        let clock = Self {
            zone,
            display: Arc::new(RwLock::new(ClockDisplay::default())),
        };
        clock.refresh(Utc::now());
        clock
    }

    pub fn refresh(&self, now: DateTime<Utc>) {
        let next = ClockDisplay::at(self.zone.convert(&now));
        let mut display = self.display.write().unwrap_or_else(|e| e.into_inner());
        *display = next;
    }

    pub fn snapshot(&self) -> ClockDisplay {
        self.display
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Refreshes the display once a second for as long as the runtime lives.
    pub fn spawn_ticker(&self) {
        let clock = self.clone();
        actix_web::rt::spawn(async move {
            info!(zone = %clock.zone, "Clock ticker started");
            let mut ticks = actix_web::rt::time::interval(Duration::from_secs(1));
            loop {
                ticks.tick().await;
                clock.refresh(Utc::now());
            }
        });
    }
}
