use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::EduManagerError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 业务错误对应的 HTTP 状态码与错误码
pub fn error_status(err: &EduManagerError) -> (StatusCode, ErrorCode) {
    match err {
        EduManagerError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        EduManagerError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        EduManagerError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        EduManagerError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        EduManagerError::NotEnrolled(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::StudentNotEnrolled,
        ),
        EduManagerError::OutOfRange(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::GradeOutOfRange)
        }
        EduManagerError::DuplicateGrade(_) => (StatusCode::CONFLICT, ErrorCode::GradeAlreadyExists),
        EduManagerError::ConstraintViolation(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

/// 将业务错误转换为统一格式的 HTTP 响应
///
/// 存储层故障只记录日志，不向客户端暴露细节。
pub fn error_response(err: &EduManagerError) -> HttpResponse {
    let (status, code) = error_status(err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("{}", err);
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&EduManagerError::duplicate_grade("x")),
            (StatusCode::CONFLICT, ErrorCode::GradeAlreadyExists)
        );
        assert_eq!(
            error_status(&EduManagerError::authorization("x")),
            (StatusCode::FORBIDDEN, ErrorCode::Forbidden)
        );
        assert_eq!(
            error_status(&EduManagerError::not_enrolled("x")).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&EduManagerError::database_operation("x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_hides_storage_details() {
        let resp = error_response(&EduManagerError::database_operation("disk I/O error"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = error_response(&EduManagerError::out_of_range("too high"));
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
