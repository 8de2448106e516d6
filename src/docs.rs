use crate::api::attendance::{HeartbeatRequest, StatsQuery};
use crate::attendance::stats::StatsPeriod;
use crate::attendance::views::{
    CheckOutResult, CheckOutSummary, HeartbeatSummary, StatsRecordView, StatsView, StatusView,
};
use crate::model::attendance::{AttendanceRecord, HourlyLog};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Interior Ops Attendance API",
        version = "1.0.0",
        description = r#"
## Employee attendance

Attendance tracking for site and studio staff of an interior design and contracting business.

### Key Features
- **Sessions**: daily check-in and check-out, resumable within the same day
- **Heartbeats**: per-hour activity reporting, merged so retries never double count
- **Overnight shifts**: an open session keeps running past midnight
- **Statistics**: daily, weekly and monthly totals and averages, per employee for owners

### Security
All endpoints require a **JWT Bearer** access token. Employee statistics are restricted to the **Owner** role.

### Response Format
Every response is wrapped as `{ success, message?, data }`. Errors are `{ success: false, message, error }`
where `error` is a machine-readable kind such as `NO_ACTIVE_SESSION`.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::heartbeat,
        crate::api::attendance::check_out,
        crate::api::attendance::status,
        crate::api::attendance::stats,
        crate::api::attendance::employee_stats
    ),
    components(
        schemas(
            AttendanceRecord,
            HourlyLog,
            HeartbeatRequest,
            HeartbeatSummary,
            CheckOutSummary,
            CheckOutResult,
            StatusView,
            StatsPeriod,
            StatsQuery,
            StatsView,
            StatsRecordView
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance tracking APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}
