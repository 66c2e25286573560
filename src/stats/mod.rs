//! Attendance analytics: allowed time windows, weekly present/absent
//! bucketing and streak/status summaries.

pub mod summary;
pub mod time_window;
pub mod weekly;
