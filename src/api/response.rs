use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde::Serialize;
use serde_json::Value;

use crate::attendance::AttendanceError;

/// `{success, message?, data}`
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

/// `{success: false, message, error, data?}`
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: None,
        data,
    })
}

pub fn ok_with_message<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: Some(message.to_string()),
        data,
    })
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse {
        success: true,
        message: Some(message.to_string()),
        data,
    })
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Attendance(AttendanceError),

    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    #[display(fmt = "{}", _0)]
    Forbidden(String),
}

impl From<AttendanceError> for ApiError {
    fn from(e: AttendanceError) -> Self {
        ApiError::Attendance(e)
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Attendance(e) => e.kind(),
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Attendance(e) => match e {
                AttendanceError::AlreadyCheckedIn(_)
                | AttendanceError::AlreadyCheckedOut
                | AttendanceError::NoActiveSession
                | AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
                AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
                AttendanceError::ConcurrentModification => StatusCode::CONFLICT,
                AttendanceError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let data = match self {
            ApiError::Attendance(AttendanceError::AlreadyCheckedIn(record)) => {
                serde_json::to_value(record.as_ref()).ok()
            }
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            message: self.to_string(),
            error: self.kind(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_envelope() {
        let err = ApiError::from(AttendanceError::NoActiveSession);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "NO_ACTIVE_SESSION");
        assert_eq!(json["message"], "No active session found. Please check in first");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AttendanceError::AlreadyCheckedOut, StatusCode::BAD_REQUEST),
            (AttendanceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AttendanceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AttendanceError::ConcurrentModification, StatusCode::CONFLICT),
            (
                AttendanceError::StoreUnavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
