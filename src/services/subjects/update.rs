use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::errors::{EduManagerError, Result};
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    subjects::{entities::Subject, requests::UpdateSubjectRequest},
};
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    update_data: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match rename_owned_subject(storage.as_ref(), subject_id, &update_data.name, uid).await {
        Ok(subject) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(subject, "Subject updated successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) async fn rename_owned_subject(
    storage: &dyn Storage,
    subject_id: i64,
    name: &str,
    teacher_id: i64,
) -> Result<Subject> {
    ownership::require_owned_subject(storage, subject_id, teacher_id).await?;
    let name = validate_name("Subject name", name)?;

    storage
        .update_subject(subject_id, &name)
        .await?
        .ok_or_else(|| EduManagerError::not_found(format!("Subject {subject_id} not found")))
}
