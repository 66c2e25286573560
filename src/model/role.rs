use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    User,
    Admin,
    Tablet,
}

impl Role {
    /// Roles allowed to clock in and out.
    pub const TIME_KEEPERS: &'static [Role] = &[Role::User, Role::Admin, Role::Tablet];
    /// Roles allowed to see a personal dashboard.
    pub const DASHBOARD: &'static [Role] = &[Role::User, Role::Admin];
    pub const ADMIN_ONLY: &'static [Role] = &[Role::Admin];

    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}
