use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ActivityService;
use crate::errors::{EduManagerError, Result};
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;

pub async fn delete_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match delete_owned_activity(storage.as_ref(), activity_id, uid).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Activity deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 删除活动及其全部成绩
pub(crate) async fn delete_owned_activity(
    storage: &dyn Storage,
    activity_id: i64,
    teacher_id: i64,
) -> Result<()> {
    ownership::require_owned_activity(storage, activity_id, teacher_id).await?;

    if !storage.delete_activity(activity_id).await? {
        return Err(EduManagerError::not_found(format!(
            "Activity {activity_id} not found"
        )));
    }

    info!("Teacher {} deleted activity {}", teacher_id, activity_id);
    Ok(())
}
