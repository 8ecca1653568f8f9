//! 成绩录入
//!
//! 录入、修改、删除成绩的全部业务规则都在这里校验，
//! 调用方只需传入当前教师 ID。

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{EduManagerError, Result};
use crate::models::{
    PaginatedResponse,
    activities::entities::Activity,
    grades::{
        entities::{Grade, GradeDetail, NewGrade},
        requests::{GradeListQuery, ScoreInput},
    },
    subjects::entities::Subject,
};
use crate::services::ownership;
use crate::storage::Storage;

pub struct GradeRecorder {
    storage: Arc<dyn Storage>,
}

impl GradeRecorder {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 录入一条成绩
    ///
    /// 按顺序校验：活动存在、教师拥有该科目、学生存在、学生已选课、分数在范围内，
    /// 最后写入。任一步失败都不会写入数据，并发重复写入由唯一索引拦截。
    pub async fn record_grade(
        &self,
        student_id: i64,
        activity_id: i64,
        value: &ScoreInput,
        acting_teacher_id: i64,
    ) -> Result<Grade> {
        let activity = self.require_activity(activity_id).await?;
        let subject = self
            .require_owned_subject(&activity, acting_teacher_id)
            .await?;

        let student = self
            .storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| EduManagerError::not_found(format!("Student {student_id} not found")))?;

        if !self
            .storage
            .enrollment_exists(student.id, subject.id)
            .await?
        {
            return Err(EduManagerError::not_enrolled(format!(
                "Student '{}' is not enrolled in subject '{}'",
                student.name, subject.name
            )));
        }

        let value = validate_score(value)?;

        let grade = self
            .storage
            .insert_grade(NewGrade {
                student_id,
                activity_id,
                value,
            })
            .await
            .map_err(translate_insert_error)?;

        info!(
            "Teacher {} recorded grade {} for student {} in activity {}",
            acting_teacher_id, grade.value, student_id, activity_id
        );
        Ok(grade)
    }

    /// 修改已有成绩的分数
    pub async fn update_grade(
        &self,
        grade_id: i64,
        value: &ScoreInput,
        acting_teacher_id: i64,
    ) -> Result<Grade> {
        let grade = self.require_grade(grade_id).await?;
        let activity = self.require_activity(grade.activity_id).await?;
        let subject = self
            .require_owned_subject(&activity, acting_teacher_id)
            .await?;

        if !self
            .storage
            .enrollment_exists(grade.student_id, subject.id)
            .await?
        {
            return Err(EduManagerError::not_enrolled(format!(
                "Student {} is not enrolled in subject '{}'",
                grade.student_id, subject.name
            )));
        }

        let value = validate_score(value)?;

        let updated = self
            .storage
            .update_grade_value(grade_id, value)
            .await?
            .ok_or_else(|| EduManagerError::not_found(format!("Grade {grade_id} not found")))?;

        info!(
            "Teacher {} changed grade {} from {} to {}",
            acting_teacher_id, grade_id, grade.value, updated.value
        );
        Ok(updated)
    }

    /// 删除成绩
    pub async fn delete_grade(&self, grade_id: i64, acting_teacher_id: i64) -> Result<()> {
        let grade = self.require_grade(grade_id).await?;
        let activity = self.require_activity(grade.activity_id).await?;
        self.require_owned_subject(&activity, acting_teacher_id)
            .await?;

        if !self.storage.delete_grade(grade_id).await? {
            return Err(EduManagerError::not_found(format!(
                "Grade {grade_id} not found"
            )));
        }

        info!("Teacher {} deleted grade {}", acting_teacher_id, grade_id);
        Ok(())
    }

    /// 列出教师本人科目下的成绩
    pub async fn list_grades(
        &self,
        acting_teacher_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<GradeDetail>> {
        self.storage
            .list_grades_with_pagination(acting_teacher_id, query)
            .await
    }

    async fn require_grade(&self, grade_id: i64) -> Result<Grade> {
        self.storage
            .get_grade_by_id(grade_id)
            .await?
            .ok_or_else(|| EduManagerError::not_found(format!("Grade {grade_id} not found")))
    }

    async fn require_activity(&self, activity_id: i64) -> Result<Activity> {
        self.storage
            .get_activity_by_id(activity_id)
            .await?
            .ok_or_else(|| EduManagerError::not_found(format!("Activity {activity_id} not found")))
    }

    async fn require_owned_subject(
        &self,
        activity: &Activity,
        acting_teacher_id: i64,
    ) -> Result<Subject> {
        ownership::require_owned_subject(
            self.storage.as_ref(),
            activity.subject_id,
            acting_teacher_id,
        )
        .await
    }
}

/// 校验分数：必须是有限数值且落在 [MIN_SCORE, MAX_SCORE] 闭区间内
pub fn validate_score(input: &ScoreInput) -> Result<f64> {
    match input.parse() {
        Some(v) if (Activity::MIN_SCORE..=Activity::MAX_SCORE).contains(&v) => Ok(v),
        Some(v) => Err(EduManagerError::out_of_range(format!(
            "Grade {v} must be between {} and {}",
            Activity::MIN_SCORE,
            Activity::MAX_SCORE
        ))),
        None => Err(EduManagerError::out_of_range(format!(
            "Grade must be a number between {} and {}",
            Activity::MIN_SCORE,
            Activity::MAX_SCORE
        ))),
    }
}

// 唯一索引冲突说明有并发录入抢先写入了同一 (学生, 活动)
fn translate_insert_error(err: EduManagerError) -> EduManagerError {
    match err {
        EduManagerError::ConstraintViolation(detail) => {
            warn!("Concurrent grade submission rejected by unique index: {detail}");
            EduManagerError::duplicate_grade("A grade for this student and activity already exists")
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::tests_support::*;

    async fn setup() -> (SeaOrmStorage, MathFixture, GradeRecorder) {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let recorder = GradeRecorder::new(Arc::new(storage.clone()));
        (storage, fx, recorder)
    }

    async fn grade_count(storage: &SeaOrmStorage, teacher_id: i64) -> i64 {
        storage
            .list_grades_with_pagination_impl(teacher_id, GradeListQuery::default())
            .await
            .unwrap()
            .pagination
            .total
    }

    #[test]
    fn test_validate_score_bounds() {
        assert_eq!(validate_score(&ScoreInput::from(0.0)), Ok(0.0));
        assert_eq!(validate_score(&ScoreInput::from(10.0)), Ok(10.0));
        assert_eq!(validate_score(&ScoreInput::from("8.5")), Ok(8.5));
        assert!(matches!(
            validate_score(&ScoreInput::from(-0.01)),
            Err(EduManagerError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_score(&ScoreInput::from(10.01)),
            Err(EduManagerError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_score(&ScoreInput::from("ten")),
            Err(EduManagerError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_constraint_violation_becomes_duplicate_grade() {
        let err = translate_insert_error(EduManagerError::constraint_violation(
            "UNIQUE constraint failed: grades.student_id, grades.activity_id",
        ));
        assert!(matches!(err, EduManagerError::DuplicateGrade(_)));

        let err = translate_insert_error(EduManagerError::database_operation("disk full"));
        assert!(matches!(err, EduManagerError::DatabaseOperation(_)));
    }

    #[tokio::test]
    async fn test_every_value_in_range_is_stored_exactly() {
        let (storage, fx, recorder) = setup().await;

        for step in 0..=20 {
            let value = f64::from(step) * 0.5;
            let activity_id = seed_activity(&storage, fx.subject_id, &format!("Quiz {step}")).await;
            let grade = recorder
                .record_grade(
                    fx.student_id,
                    activity_id,
                    &ScoreInput::from(value),
                    fx.teacher_id,
                )
                .await
                .unwrap();
            assert_eq!(grade.value, value);

            let stored = storage
                .get_grade_by_id_impl(grade.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.value, value);
        }

        // 非半分刻度的值同样原样保存
        let activity_id = seed_activity(&storage, fx.subject_id, "Quiz pi").await;
        let grade = recorder
            .record_grade(
                fx.student_id,
                activity_id,
                &ScoreInput::from(std::f64::consts::PI),
                fx.teacher_id,
            )
            .await
            .unwrap();
        assert_eq!(grade.value, std::f64::consts::PI);
    }

    #[tokio::test]
    async fn test_out_of_range_values_insert_nothing() {
        let (storage, fx, recorder) = setup().await;

        for value in [
            ScoreInput::from(-1.0),
            ScoreInput::from(-0.001),
            ScoreInput::from(10.5),
            ScoreInput::from(11.0),
            ScoreInput::from(1e9),
            ScoreInput::from("abc"),
            ScoreInput::from(""),
        ] {
            let err = recorder
                .record_grade(fx.student_id, fx.activity_id, &value, fx.teacher_id)
                .await
                .unwrap_err();
            assert!(matches!(err, EduManagerError::OutOfRange(_)), "{value:?}");
        }

        assert_eq!(grade_count(&storage, fx.teacher_id).await, 0);
    }

    #[tokio::test]
    async fn test_second_submission_is_duplicate() {
        let (storage, fx, recorder) = setup().await;

        recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(6.0),
                fx.teacher_id,
            )
            .await
            .unwrap();
        let err = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(9.0),
                fx.teacher_id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::DuplicateGrade(_)));

        assert_eq!(grade_count(&storage, fx.teacher_id).await, 1);
        let stored = storage
            .get_grade_by_student_and_activity_impl(fx.student_id, fx.activity_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.value, 6.0);
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_everywhere() {
        let (storage, fx, recorder) = setup().await;
        let intruder = seed_teacher(&storage, "teacher2").await;

        let err = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(5.0),
                intruder,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::Authorization(_)));
        assert_eq!(grade_count(&storage, fx.teacher_id).await, 0);

        let grade = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(5.0),
                fx.teacher_id,
            )
            .await
            .unwrap();

        let err = recorder
            .update_grade(grade.id, &ScoreInput::from(1.0), intruder)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::Authorization(_)));

        let err = recorder.delete_grade(grade.id, intruder).await.unwrap_err();
        assert!(matches!(err, EduManagerError::Authorization(_)));

        let stored = storage
            .get_grade_by_id_impl(grade.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.value, 5.0);
    }

    #[tokio::test]
    async fn test_unenrolled_student_is_rejected() {
        let (storage, fx, recorder) = setup().await;
        let t2 = seed_teacher(&storage, "teacher2").await;
        let history = storage.create_subject_impl(t2, "History").await.unwrap();
        let outsider = storage
            .create_student_impl("S9", "s9@school.edu", &[history.id])
            .await
            .unwrap();

        let err = recorder
            .record_grade(
                outsider.id,
                fx.activity_id,
                &ScoreInput::from(7.0),
                fx.teacher_id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotEnrolled(_)));
        assert_eq!(grade_count(&storage, fx.teacher_id).await, 0);
    }

    #[tokio::test]
    async fn test_checks_run_in_order() {
        let (storage, fx, recorder) = setup().await;
        let intruder = seed_teacher(&storage, "teacher2").await;

        // 活动不存在优先于其他错误
        let err = recorder
            .record_grade(999, 999, &ScoreInput::from(50.0), intruder)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotFound(_)));

        // 权限先于学生存在性检查
        let err = recorder
            .record_grade(999, fx.activity_id, &ScoreInput::from(50.0), intruder)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::Authorization(_)));

        // 学生不存在
        let err = recorder
            .record_grade(999, fx.activity_id, &ScoreInput::from(50.0), fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotFound(_)));
    }

    // 文件库 + 多连接池，两次录入真正并发执行
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_yield_one_grade() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SeaOrmStorage::new_file_backed(&dir.path().join("grades.db"))
            .await
            .unwrap();
        let fx = seed_math_fixture(&storage).await;
        let recorder = Arc::new(GradeRecorder::new(Arc::new(storage.clone())));

        const ROUNDS: usize = 40;
        for round in 0..ROUNDS {
            let activity_id = seed_activity(&storage, fx.subject_id, &format!("Race {round}")).await;

            let handles: Vec<_> = [7.0, 8.0]
                .into_iter()
                .map(|value| {
                    let recorder = recorder.clone();
                    let (student_id, teacher_id) = (fx.student_id, fx.teacher_id);
                    tokio::spawn(async move {
                        recorder
                            .record_grade(
                                student_id,
                                activity_id,
                                &ScoreInput::from(value),
                                teacher_id,
                            )
                            .await
                    })
                })
                .collect();

            let mut results = Vec::with_capacity(handles.len());
            for handle in handles {
                results.push(handle.await.unwrap());
            }

            let winners: Vec<&Grade> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
            assert_eq!(winners.len(), 1, "round {round}: {results:?}");
            assert!(
                results
                    .iter()
                    .any(|r| matches!(r, Err(EduManagerError::DuplicateGrade(_)))),
                "round {round}: {results:?}"
            );

            let stored = storage
                .get_grade_by_student_and_activity_impl(fx.student_id, activity_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.id, winners[0].id);
            assert_eq!(stored.value, winners[0].value);
        }

        assert_eq!(grade_count(&storage, fx.teacher_id).await, ROUNDS as i64);
    }

    #[tokio::test]
    async fn test_update_requires_enrollment() {
        use crate::entity::enrollments::{Column, Entity as Enrollments};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

        let (storage, fx, recorder) = setup().await;
        let grade = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(5.0),
                fx.teacher_id,
            )
            .await
            .unwrap();

        // 只删选课行，保留成绩
        Enrollments::delete_many()
            .filter(Column::StudentId.eq(fx.student_id))
            .exec(&storage.db)
            .await
            .unwrap();

        let err = recorder
            .update_grade(grade.id, &ScoreInput::from(9.0), fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotEnrolled(_)));

        let stored = storage
            .get_grade_by_id_impl(grade.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.value, 5.0);
    }

    #[tokio::test]
    async fn test_update_and_delete_grade() {
        let (storage, fx, recorder) = setup().await;
        let grade = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(3.0),
                fx.teacher_id,
            )
            .await
            .unwrap();

        let err = recorder
            .update_grade(grade.id, &ScoreInput::from(12.0), fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::OutOfRange(_)));

        let updated = recorder
            .update_grade(grade.id, &ScoreInput::from("9.25"), fx.teacher_id)
            .await
            .unwrap();
        assert_eq!(updated.value, 9.25);

        recorder.delete_grade(grade.id, fx.teacher_id).await.unwrap();
        assert!(
            storage
                .get_grade_by_id_impl(grade.id)
                .await
                .unwrap()
                .is_none()
        );

        let err = recorder
            .delete_grade(grade.id, fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotFound(_)));
        let err = recorder
            .update_grade(grade.id, &ScoreInput::from(1.0), fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_math_class_scenario() {
        // S1 选修 Math，A1 属于 Math，T1 任教 Math
        let (storage, fx, recorder) = setup().await;

        let grade = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(8.5),
                fx.teacher_id,
            )
            .await
            .unwrap();
        assert_eq!(grade.value, 8.5);
        assert_eq!(grade.student_id, fx.student_id);
        assert_eq!(grade.activity_id, fx.activity_id);

        let err = recorder
            .record_grade(
                fx.student_id,
                fx.activity_id,
                &ScoreInput::from(8.5),
                fx.teacher_id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::DuplicateGrade(_)));

        let a2 = seed_activity(&storage, fx.subject_id, "A2").await;
        let err = recorder
            .record_grade(fx.student_id, a2, &ScoreInput::from(11.0), fx.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::OutOfRange(_)));
    }
}
