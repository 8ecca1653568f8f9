use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::ApiResponse;
use crate::models::activities::requests::ActivityListQuery;
use crate::models::common::error_response;
use crate::services::require_teacher_id;

pub async fn list_activities(
    service: &ActivityService,
    request: &HttpRequest,
    query: ActivityListQuery,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.list_activities_with_pagination(uid, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list,
            "Activities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
