pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod grades;
pub(crate) mod ownership;
pub mod students;
pub mod subjects;

pub use activities::ActivityService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use grades::{GradeRecorder, GradeService};
pub use students::StudentService;
pub use subjects::SubjectService;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 取当前登录教师 ID，缺失时返回 401 响应
pub(crate) fn require_teacher_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        ))
    })
}
