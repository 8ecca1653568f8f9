use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::common::error_response;
use crate::models::{ApiResponse, grades::requests::UpdateGradeRequest};
use crate::services::require_teacher_id;

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    update_data: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match service
        .recorder(request)
        .update_grade(grade_id, &update_data.value, uid)
        .await
    {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade updated successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}
