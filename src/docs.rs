use crate::api::dashboard::DashboardResponse;
use crate::api::time_entry::{ClockRequest, CorrectionRequest, TimeOutResponse, TodayStatus};
use crate::clock::ClockDisplay;
use crate::dashboard::overview::AdminOverview;
use crate::dashboard::view_model::{DashboardViewModel, LoadState};
use crate::model::role::Role;
use crate::model::time_record::{AllowedTimeConfig, TimeInToday, TimeOutToday};
use crate::models::{LoginReqDto, LoginResponse, TokenPair};
use crate::stats::time_window::AllowedTimeWindow;
use crate::stats::weekly::DayTally;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Whereabouts API",
        version = "1.0.0",
        description = r#"
## Whereabouts attendance dashboard

Backend-for-frontend over the attendance REST backend. Every response is
computed fresh from backend data; nothing is cached.

### 🔹 Key Features
- **Dashboard**
  - Weekly present/absent chart, total time, most frequent status, longest streak
  - Spreadsheet export of the weekly chart
- **Admin**
  - People in the office, sick leave today, company-wide weekly chart
  - Allowed time-in window
- **Time entry**
  - Time in, time out, today's status, record corrections

### 🔐 Security
Protected endpoints take a **JWT Bearer** access token from `/auth/login`.
Roles are `user`, `admin` and `tablet`.

---
Built with **Rust**, **Actix Web**, **reqwest** and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::clock::current_time,

        crate::api::dashboard::get_dashboard,
        crate::api::dashboard::export_dashboard,

        crate::api::admin::get_overview,
        crate::api::admin::get_allowed_time,
        crate::api::admin::update_allowed_time,
        crate::api::admin::latest_time_in,
        crate::api::admin::time_records,

        crate::api::time_entry::time_in,
        crate::api::time_entry::time_out,
        crate::api::time_entry::today,
        crate::api::time_entry::update_record
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            TokenPair,
            Role,
            ClockDisplay,
            LoadState,
            DashboardViewModel,
            DashboardResponse,
            AdminOverview,
            AllowedTimeConfig,
            AllowedTimeWindow,
            DayTally,
            ClockRequest,
            CorrectionRequest,
            TimeOutResponse,
            TodayStatus,
            TimeInToday,
            TimeOutToday
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, token refresh and logout"),
        (name = "Clock", description = "Live clock"),
        (name = "Dashboard", description = "Per-user attendance dashboard"),
        (name = "Admin", description = "Company-wide attendance administration"),
        (name = "Time", description = "Time-in and time-out workflow"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
