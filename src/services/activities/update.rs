use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::errors::{EduManagerError, Result};
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    activities::{entities::Activity, requests::UpdateActivityRequest},
};
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn update_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
    update_data: UpdateActivityRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match update_owned_activity(storage.as_ref(), activity_id, update_data, uid).await {
        Ok(activity) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(activity, "Activity updated successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) async fn update_owned_activity(
    storage: &dyn Storage,
    activity_id: i64,
    mut update_data: UpdateActivityRequest,
    teacher_id: i64,
) -> Result<Activity> {
    let (activity, _) = ownership::require_owned_activity(storage, activity_id, teacher_id).await?;

    // 移动到其他科目时，目标科目也必须由本人任教
    if let Some(target) = update_data.subject_id
        && target != activity.subject_id
    {
        ownership::require_owned_subject(storage, target, teacher_id).await?;
    }

    if let Some(name) = update_data.name.as_deref() {
        update_data.name = Some(validate_name("Activity name", name)?);
    }

    storage
        .update_activity(activity_id, update_data)
        .await?
        .ok_or_else(|| EduManagerError::not_found(format!("Activity {activity_id} not found")))
}
