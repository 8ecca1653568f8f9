use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::services::require_teacher_id;

pub async fn delete_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match service.recorder(request).delete_grade(grade_id, uid).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grade deleted successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}
