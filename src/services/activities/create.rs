use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ActivityService;
use crate::errors::Result;
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    activities::{entities::Activity, requests::CreateActivityRequest},
};
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_data: CreateActivityRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match create_owned_activity(storage.as_ref(), activity_data, uid).await {
        Ok(activity) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(activity, "Activity created successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) async fn create_owned_activity(
    storage: &dyn Storage,
    mut activity_data: CreateActivityRequest,
    teacher_id: i64,
) -> Result<Activity> {
    ownership::require_owned_subject(storage, activity_data.subject_id, teacher_id).await?;
    activity_data.name = validate_name("Activity name", &activity_data.name)?;

    let activity = storage.create_activity(activity_data).await?;
    info!(
        "Teacher {} created activity {} in subject {}",
        teacher_id, activity.id, activity.subject_id
    );
    Ok(activity)
}
