pub mod overview;
pub mod presenter;
pub mod view_model;
