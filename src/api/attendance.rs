use crate::api::response::{self, ApiError};
use crate::attendance::AttendanceError;
use crate::attendance::AttendanceTracker;
use crate::attendance::stats::StatsPeriod;
use crate::attendance::validation::DEFAULT_ACTIVE_MINUTES;
use crate::auth::auth::AuthUser;
use crate::directory::UserDirectory;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    /// Minutes of activity in the current hour, clamped to 0-60. Defaults to 60.
    #[schema(example = 45)]
    pub active_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// daily, weekly or monthly. Anything else means weekly.
    #[schema(example = "weekly")]
    pub period: Option<String>,
}

/// Heartbeat bodies are optional; an empty body means the defaults.
fn parse_heartbeat(body: &[u8]) -> Result<HeartbeatRequest, AttendanceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HeartbeatRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AttendanceError::Validation(format!("Invalid heartbeat body: {e}")))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    responses(
        (status = 201, description = "Checked in successfully", body = Object, example = json!({
            "success": true,
            "message": "Checked in successfully",
            "data": {
                "id": 1, "user": 42, "date": "2026-01-05",
                "checkInTime": "2026-01-05T08:58:12Z", "checkOutTime": null,
                "hourlyLogs": [], "totalActiveMinutes": 0, "isCheckedIn": true,
                "lastHeartbeat": "2026-01-05T08:58:12Z"
            }
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "success": false,
            "message": "Already checked in today",
            "error": "ALREADY_CHECKED_IN"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
) -> Result<HttpResponse, ApiError> {
    let record = tracker.check_in(auth.user_id, tracker.now()).await.map_err(|e| {
        log_failure(&e, auth.user_id, "Check-in failed");
        e
    })?;

    info!(user_id = auth.user_id, username = %auth.username, "Check-in accepted");
    Ok(response::created("Checked in successfully", record))
}

/// Heartbeat endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/heartbeat",
    request_body(content = HeartbeatRequest, description = "Optional; activeMinutes defaults to 60"),
    responses(
        (status = 200, description = "Heartbeat recorded", body = Object, example = json!({
            "success": true,
            "message": "Heartbeat recorded",
            "data": { "hour": 14, "totalActiveMinutes": 135, "totalActiveHours": 2.3 }
        })),
        (status = 400, description = "No active session or invalid body", body = Object, example = json!({
            "success": false,
            "message": "No active session found. Please check in first",
            "error": "NO_ACTIVE_SESSION"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Concurrent update, retry"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn heartbeat(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = parse_heartbeat(&body)?;
    let active_minutes = request.active_minutes.unwrap_or(DEFAULT_ACTIVE_MINUTES);

    let summary = tracker
        .heartbeat(auth.user_id, tracker.now(), active_minutes)
        .await
        .map_err(|e| {
            log_failure(&e, auth.user_id, "Heartbeat failed");
            e
        })?;

    Ok(response::ok_with_message("Heartbeat recorded", summary))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "success": true,
            "message": "Checked out successfully",
            "data": {
                "attendance": { "id": 1, "isCheckedIn": false },
                "summary": {
                    "checkIn": "2026-01-05T08:58:12Z",
                    "checkOut": "2026-01-05T17:02:40Z",
                    "totalActiveHours": 7.5
                }
            }
        })),
        (status = 400, description = "No active session or already checked out", body = Object, example = json!({
            "success": false,
            "message": "No active session found. Please check in first",
            "error": "NO_ACTIVE_SESSION"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
) -> Result<HttpResponse, ApiError> {
    let result = tracker.check_out(auth.user_id, tracker.now()).await.map_err(|e| {
        log_failure(&e, auth.user_id, "Check-out failed");
        e
    })?;

    Ok(response::ok_with_message("Checked out successfully", result))
}

/// Current attendance status
#[utoipa::path(
    get,
    path = "/api/attendance/status",
    responses(
        (status = 200, description = "Current or last session", body = Object, example = json!({
            "success": true,
            "data": {
                "isCheckedIn": false, "checkInTime": null, "checkOutTime": null,
                "totalActiveMinutes": 0, "totalActiveHours": 0.0, "lastHeartbeat": null
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn status(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
) -> Result<HttpResponse, ApiError> {
    let status = tracker.status(auth.user_id, tracker.now()).await.map_err(|e| {
        log_failure(&e, auth.user_id, "Status lookup failed");
        e
    })?;

    Ok(response::ok(status))
}

/// Own attendance statistics
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregated attendance", body = Object, example = json!({
            "success": true,
            "data": {
                "period": "weekly", "totalDays": 3, "totalHours": 13.0,
                "totalMinutes": 780, "averageHoursPerDay": 4.3, "records": []
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn stats(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, ApiError> {
    let period = StatsPeriod::parse_or_default(query.period.as_deref());

    let stats = tracker
        .stats(auth.user_id, period, tracker.now())
        .await
        .map_err(|e| {
            log_failure(&e, auth.user_id, "Stats lookup failed");
            e
        })?;

    Ok(response::ok(stats))
}

/// Attendance statistics of an employee (owner only)
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee user ID"),
        StatsQuery
    ),
    responses(
        (status = 200, description = "Aggregated attendance of the employee", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Owner only"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn employee_stats(
    auth: AuthUser,
    tracker: web::Data<AttendanceTracker>,
    directory: web::Data<dyn UserDirectory>,
    path: web::Path<u64>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_owner()?;

    let employee_id = path.into_inner();

    let role = directory.find_role(employee_id).await.map_err(|e| {
        let e = AttendanceError::from(e);
        log_failure(&e, employee_id, "Employee lookup failed");
        e
    })?;
    if role.is_none() {
        return Err(AttendanceError::NotFound("Employee not found".to_string()).into());
    }

    let period = StatsPeriod::parse_or_default(query.period.as_deref());
    let stats = tracker
        .stats(employee_id, period, tracker.now())
        .await
        .map_err(|e| {
            log_failure(&e, employee_id, "Employee stats lookup failed");
            e
        })?;

    Ok(response::ok(stats))
}

fn log_failure(e: &AttendanceError, user_id: u64, what: &str) {
    match e {
        AttendanceError::StoreUnavailable(_) => {
            tracing::error!(error = %e, user_id, "{}", what)
        }
        _ => warn!(error = %e, kind = e.kind(), user_id, "{}", what),
    }
}
