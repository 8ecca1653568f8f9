use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::errors::Result;
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    subjects::{entities::Subject, requests::CreateSubjectRequest},
};
use crate::services::require_teacher_id;
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match create_owned_subject(storage.as_ref(), uid, &subject_data.name).await {
        Ok(subject) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(subject, "Subject created successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) async fn create_owned_subject(
    storage: &dyn Storage,
    teacher_id: i64,
    name: &str,
) -> Result<Subject> {
    let name = validate_name("Subject name", name)?;
    let subject = storage.create_subject(teacher_id, &name).await?;
    info!("Teacher {} created subject {}", teacher_id, subject.id);
    Ok(subject)
}
