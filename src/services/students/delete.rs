use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::{EduManagerError, Result};
use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match delete_visible_student(storage.as_ref(), student_id, uid).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Student deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) async fn delete_visible_student(
    storage: &dyn Storage,
    student_id: i64,
    teacher_id: i64,
) -> Result<()> {
    ownership::require_visible_student(storage, student_id, teacher_id).await?;

    if !storage.delete_student(student_id).await? {
        return Err(EduManagerError::not_found(format!(
            "Student {student_id} not found"
        )));
    }

    info!("Teacher {} deleted student {}", teacher_id, student_id);
    Ok(())
}
