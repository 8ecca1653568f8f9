use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::errors::{EduManagerError, Result};
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;

pub async fn delete_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match delete_owned_subject(storage.as_ref(), subject_id, uid).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 删除科目，其活动、选课与成绩一并删除
pub(crate) async fn delete_owned_subject(
    storage: &dyn Storage,
    subject_id: i64,
    teacher_id: i64,
) -> Result<()> {
    ownership::require_owned_subject(storage, subject_id, teacher_id).await?;

    if !storage.delete_subject(subject_id).await? {
        return Err(EduManagerError::not_found(format!(
            "Subject {subject_id} not found"
        )));
    }

    info!("Teacher {} deleted subject {}", teacher_id, subject_id);
    Ok(())
}
