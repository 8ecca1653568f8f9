use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::common::error_response;
use crate::models::{ApiResponse, grades::requests::CreateGradeRequest};
use crate::services::require_teacher_id;

pub async fn record_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_data: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match service
        .recorder(request)
        .record_grade(
            grade_data.student_id,
            grade_data.activity_id,
            &grade_data.value,
            uid,
        )
        .await
    {
        Ok(grade) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(grade, "Grade recorded successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
