pub mod serde_ext;
pub mod session_store;
pub mod timestamp;
