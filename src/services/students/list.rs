use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::models::students::requests::StudentListQuery;
use crate::services::require_teacher_id;

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.list_students_with_pagination(uid, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
