use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, email_taken, normalize_email};
use crate::errors::{EduManagerError, Result};
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    students::{entities::StudentWithSubjects, requests::UpdateStudentRequest},
};
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match update_visible_student(storage.as_ref(), student_id, update_data, uid).await {
        Ok(student) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(student, "Student updated successfully"))),
        Err(EduManagerError::ConstraintViolation(_)) => Ok(email_taken()),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 更新学生；给出 subject_ids 时只替换当前教师科目内的选课
pub(crate) async fn update_visible_student(
    storage: &dyn Storage,
    student_id: i64,
    update_data: UpdateStudentRequest,
    teacher_id: i64,
) -> Result<StudentWithSubjects> {
    let (_, teacher_subjects) =
        ownership::require_visible_student(storage, student_id, teacher_id).await?;

    let name = update_data
        .name
        .as_deref()
        .map(|name| validate_name("Student name", name))
        .transpose()?;
    let email = update_data.email.as_deref().map(normalize_email).transpose()?;

    let replace = match update_data.subject_ids {
        Some(ids) => Some((
            teacher_subjects.clone(),
            ownership::require_owned_subjects(storage, &ids, teacher_id).await?,
        )),
        None => None,
    };

    let student = storage
        .update_student(student_id, name, email, replace)
        .await?
        .ok_or_else(|| EduManagerError::not_found(format!("Student {student_id} not found")))?;

    let subject_ids = storage
        .list_student_subject_ids(student_id, &teacher_subjects)
        .await?;

    Ok(StudentWithSubjects {
        student,
        subject_ids,
    })
}
