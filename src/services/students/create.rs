use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, email_taken, normalize_email};
use crate::errors::{EduManagerError, Result};
use crate::models::common::error_response;
use crate::models::{
    ApiResponse,
    students::{entities::StudentWithSubjects, requests::CreateStudentRequest},
};
use crate::services::{ownership, require_teacher_id};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let uid = match require_teacher_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match create_enrolled_student(storage.as_ref(), student_data, uid).await {
        Ok(student) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(student, "Student created successfully"))),
        Err(EduManagerError::ConstraintViolation(_)) => Ok(email_taken()),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 创建学生并选修给定科目，科目必须全部由当前教师任教
pub(crate) async fn create_enrolled_student(
    storage: &dyn Storage,
    student_data: CreateStudentRequest,
    teacher_id: i64,
) -> Result<StudentWithSubjects> {
    let name = validate_name("Student name", &student_data.name)?;
    let email = normalize_email(&student_data.email)?;
    let subject_ids =
        ownership::require_owned_subjects(storage, &student_data.subject_ids, teacher_id).await?;

    let student = storage.create_student(&name, &email, &subject_ids).await?;
    info!(
        "Teacher {} created student {} in subjects {:?}",
        teacher_id, student.id, subject_ids
    );

    Ok(StudentWithSubjects {
        student,
        subject_ids,
    })
}
