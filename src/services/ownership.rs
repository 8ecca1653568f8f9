//! 教师对科目、活动、学生的归属校验

use tracing::warn;

use crate::errors::{EduManagerError, Result};
use crate::models::{
    activities::entities::Activity, students::entities::Student, subjects::entities::Subject,
};
use crate::storage::Storage;

/// 科目存在且由该教师任教
pub(crate) async fn require_owned_subject(
    storage: &dyn Storage,
    subject_id: i64,
    teacher_id: i64,
) -> Result<Subject> {
    let subject = storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| EduManagerError::not_found(format!("Subject {subject_id} not found")))?;

    if subject.teacher_id != teacher_id {
        warn!(
            "Teacher {} tried to access subject {} owned by {}",
            teacher_id, subject.id, subject.teacher_id
        );
        return Err(EduManagerError::authorization(format!(
            "You do not teach subject '{}'",
            subject.name
        )));
    }

    Ok(subject)
}

/// 校验一组科目全部归该教师所有，返回去重后的 ID
pub(crate) async fn require_owned_subjects(
    storage: &dyn Storage,
    subject_ids: &[i64],
    teacher_id: i64,
) -> Result<Vec<i64>> {
    let mut ids = subject_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Err(EduManagerError::validation(
            "A student must be enrolled in at least one subject",
        ));
    }

    for id in &ids {
        require_owned_subject(storage, *id, teacher_id).await?;
    }
    Ok(ids)
}

/// 活动存在且其科目由该教师任教
pub(crate) async fn require_owned_activity(
    storage: &dyn Storage,
    activity_id: i64,
    teacher_id: i64,
) -> Result<(Activity, Subject)> {
    let activity = storage
        .get_activity_by_id(activity_id)
        .await?
        .ok_or_else(|| EduManagerError::not_found(format!("Activity {activity_id} not found")))?;
    let subject = require_owned_subject(storage, activity.subject_id, teacher_id).await?;
    Ok((activity, subject))
}

/// 学生对该教师可见：至少选修了其一门科目
///
/// 返回学生以及教师名下全部科目 ID。不可见与不存在同样返回 NotFound。
pub(crate) async fn require_visible_student(
    storage: &dyn Storage,
    student_id: i64,
    teacher_id: i64,
) -> Result<(Student, Vec<i64>)> {
    let not_found = || EduManagerError::not_found(format!("Student {student_id} not found"));

    let student = storage
        .get_student_by_id(student_id)
        .await?
        .ok_or_else(not_found)?;

    let teacher_subjects = storage.list_subject_ids_by_teacher(teacher_id).await?;
    let enrolled = storage
        .list_student_subject_ids(student_id, &teacher_subjects)
        .await?;
    if enrolled.is_empty() {
        return Err(not_found());
    }

    Ok((student, teacher_subjects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::tests_support::*;

    #[tokio::test]
    async fn test_owned_subject_checks() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;

        assert!(
            require_owned_subject(&storage, fx.subject_id, fx.teacher_id)
                .await
                .is_ok()
        );
        assert!(matches!(
            require_owned_subject(&storage, fx.subject_id, t2).await,
            Err(EduManagerError::Authorization(_))
        ));
        assert!(matches!(
            require_owned_subject(&storage, 999, fx.teacher_id).await,
            Err(EduManagerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_owned_subjects_dedup_and_reject_empty() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;

        let ids = require_owned_subjects(
            &storage,
            &[fx.subject_id, fx.subject_id],
            fx.teacher_id,
        )
        .await
        .unwrap();
        assert_eq!(ids, vec![fx.subject_id]);

        assert!(matches!(
            require_owned_subjects(&storage, &[], fx.teacher_id).await,
            Err(EduManagerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_student_visibility() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;

        let (student, subjects) = require_visible_student(&storage, fx.student_id, fx.teacher_id)
            .await
            .unwrap();
        assert_eq!(student.id, fx.student_id);
        assert_eq!(subjects, vec![fx.subject_id]);

        assert!(matches!(
            require_visible_student(&storage, fx.student_id, t2).await,
            Err(EduManagerError::NotFound(_))
        ));
    }
}
