pub mod attendance;
pub mod role;
pub mod time_record;
