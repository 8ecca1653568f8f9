use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::models::grades::requests::GradeListQuery;
use crate::services::require_teacher_id;

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match service.recorder(request).list_grades(uid, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "Grades retrieved successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}
