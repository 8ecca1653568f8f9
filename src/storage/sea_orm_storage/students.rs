//! 学生与选课存储操作

use super::SeaOrmStorage;
use crate::entity::activities::{Column as ActivityColumn, Entity as Activities};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{EduManagerError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::normalize_page,
    students::{
        entities::{Student, StudentWithSubjects},
        requests::StudentListQuery,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建学生并写入选课
    pub async fn create_student_impl(
        &self,
        name: &str,
        email: &str,
        subject_ids: &[i64],
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let student = model
            .insert(&txn)
            .await
            .map_err(|e| EduManagerError::from_db("创建学生失败", e))?;

        Self::insert_enrollments(&txn, student.id, subject_ids).await?;

        txn.commit()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(student.into_student())
    }

    async fn insert_enrollments<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        subject_ids: &[i64],
    ) -> Result<()> {
        if subject_ids.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().timestamp();
        let models = subject_ids.iter().map(|&subject_id| EnrollmentActiveModel {
            student_id: Set(student_id),
            subject_id: Set(subject_id),
            enrolled_at: Set(now),
            ..Default::default()
        });

        Enrollments::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| EduManagerError::from_db("写入选课失败", e))?;

        Ok(())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出在教师任一科目中选课的学生
    pub async fn list_students_with_pagination_impl(
        &self,
        teacher_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentWithSubjects>> {
        let (page, size) = normalize_page(query.page, query.size);

        let teacher_subject_ids = self.list_subject_ids_by_teacher_impl(teacher_id).await?;

        // 科目筛选只能落在教师本人的科目内
        let scope: Vec<i64> = match query.subject_id {
            Some(subject_id) => teacher_subject_ids
                .iter()
                .copied()
                .filter(|id| *id == subject_id)
                .collect(),
            None => teacher_subject_ids.clone(),
        };

        if scope.is_empty() {
            return Ok(PaginatedResponse {
                items: Vec::new(),
                pagination: PaginationInfo::empty(page, size),
            });
        }

        let enrolled = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::SubjectId.is_in(scope))
            .into_query();

        let mut select = Students::find().filter(Column::Id.in_subquery(enrolled));

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search))),
            );
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生页数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生列表失败: {e}")))?;

        let mut items = Vec::with_capacity(students.len());
        for model in students {
            let subject_ids = self
                .list_student_subject_ids_impl(model.id, &teacher_subject_ids)
                .await?;
            items.push(StudentWithSubjects {
                student: model.into_student(),
                subject_ids,
            });
        }

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 学生在给定科目范围内的选课
    pub async fn list_student_subject_ids_impl(
        &self,
        student_id: i64,
        within_subject_ids: &[i64],
    ) -> Result<Vec<i64>> {
        if within_subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::SubjectId)
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::SubjectId.is_in(within_subject_ids.to_vec()))
            .order_by_asc(EnrollmentColumn::SubjectId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生选课失败: {e}")))
    }

    /// 更新学生信息
    ///
    /// `replace` 为 `Some((scope, subject_ids))` 时，删除 scope 内的旧选课并写入
    /// subject_ids，scope 之外的选课不受影响。被移出的科目下该学生的成绩一并删除。
    pub async fn update_student_impl(
        &self,
        student_id: i64,
        name: Option<String>,
        email: Option<String>,
        replace: Option<(Vec<i64>, Vec<i64>)>,
    ) -> Result<Option<Student>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("开启事务失败: {e}")))?;

        // 首条语句即为写入，事务开始就拿到写锁，避免 SQLite 读锁升级失败
        let mut update = Students::update_many()
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(student_id));
        if let Some(name) = name {
            update = update.col_expr(Column::Name, Expr::value(name));
        }
        if let Some(email) = email {
            update = update.col_expr(Column::Email, Expr::value(email));
        }

        let result = update
            .exec(&txn)
            .await
            .map_err(|e| EduManagerError::from_db("更新学生失败", e))?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        if let Some((scope, subject_ids)) = replace {
            let removed: Vec<i64> = scope
                .iter()
                .copied()
                .filter(|id| !subject_ids.contains(id))
                .collect();

            if !removed.is_empty() {
                let activities = Activities::find()
                    .select_only()
                    .column(ActivityColumn::Id)
                    .filter(ActivityColumn::SubjectId.is_in(removed))
                    .into_query();

                Grades::delete_many()
                    .filter(GradeColumn::StudentId.eq(student_id))
                    .filter(GradeColumn::ActivityId.in_subquery(activities))
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        EduManagerError::database_operation(format!("删除退课成绩失败: {e}"))
                    })?;
            }

            if !scope.is_empty() {
                Enrollments::delete_many()
                    .filter(EnrollmentColumn::StudentId.eq(student_id))
                    .filter(EnrollmentColumn::SubjectId.is_in(scope))
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        EduManagerError::database_operation(format!("删除旧选课失败: {e}"))
                    })?;
            }
            Self::insert_enrollments(&txn, student_id, &subject_ids).await?;
        }

        let updated = Students::find_by_id(student_id)
            .one(&txn)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.map(|m| m.into_student()))
    }

    /// 删除学生，选课与成绩由外键级联删除
    pub async fn delete_student_impl(&self, student_id: i64) -> Result<bool> {
        let result = Students::delete_by_id(student_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生是否选修了该科目
    pub async fn enrollment_exists_impl(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::{entities::NewGrade, requests::GradeListQuery};
    use crate::storage::sea_orm_storage::tests_support::*;

    #[tokio::test]
    async fn test_create_student_writes_enrollments() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let t1 = seed_teacher(&storage, "teacher1").await;
        let math = storage.create_subject_impl(t1, "Math").await.unwrap().id;
        let physics = storage.create_subject_impl(t1, "Physics").await.unwrap().id;

        let student = storage
            .create_student_impl("S1", "s1@school.edu", &[math, physics])
            .await
            .unwrap();

        assert!(storage.enrollment_exists_impl(student.id, math).await.unwrap());
        assert!(
            storage
                .enrollment_exists_impl(student.id, physics)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_duplicate_student_email_rolls_back() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;

        let err = storage
            .create_student_impl("Other", "s1@school.edu", &[fx.subject_id])
            .await
            .unwrap_err();
        assert!(matches!(err, EduManagerError::ConstraintViolation(_)));

        let list = storage
            .list_students_with_pagination_impl(fx.teacher_id, StudentListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_list_students_scoped_to_teacher() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;
        let history = storage.create_subject_impl(t2, "History").await.unwrap().id;
        storage
            .create_student_impl("S2", "s2@school.edu", &[history])
            .await
            .unwrap();

        let list = storage
            .list_students_with_pagination_impl(fx.teacher_id, StudentListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].student.id, fx.student_id);
        assert_eq!(list.items[0].subject_ids, vec![fx.subject_id]);

        // 筛选他人科目得到空结果
        let foreign = storage
            .list_students_with_pagination_impl(
                fx.teacher_id,
                StudentListQuery {
                    subject_id: Some(history),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(foreign.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_student_keeps_other_teachers_enrollments() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let physics = storage
            .create_subject_impl(fx.teacher_id, "Physics")
            .await
            .unwrap()
            .id;
        let t2 = seed_teacher(&storage, "teacher2").await;
        let history = storage.create_subject_impl(t2, "History").await.unwrap().id;
        storage
            .update_student_impl(
                fx.student_id,
                None,
                None,
                Some((vec![history], vec![history])),
            )
            .await
            .unwrap();

        // teacher1 把 Math 换成 Physics
        let updated = storage
            .update_student_impl(
                fx.student_id,
                Some("S1 renamed".to_string()),
                None,
                Some((vec![fx.subject_id, physics], vec![physics])),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "S1 renamed");

        assert!(
            !storage
                .enrollment_exists_impl(fx.student_id, fx.subject_id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .enrollment_exists_impl(fx.student_id, physics)
                .await
                .unwrap()
        );
        assert!(
            storage
                .enrollment_exists_impl(fx.student_id, history)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_unenrolling_removes_grades_of_that_subject() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let physics = storage
            .create_subject_impl(fx.teacher_id, "Physics")
            .await
            .unwrap()
            .id;
        let lab = seed_activity(&storage, physics, "Lab 1").await;
        storage
            .update_student_impl(
                fx.student_id,
                None,
                None,
                Some((vec![fx.subject_id, physics], vec![fx.subject_id, physics])),
            )
            .await
            .unwrap();

        let math_grade = storage
            .insert_grade_impl(NewGrade {
                student_id: fx.student_id,
                activity_id: fx.activity_id,
                value: 8.0,
            })
            .await
            .unwrap();
        let lab_grade = storage
            .insert_grade_impl(NewGrade {
                student_id: fx.student_id,
                activity_id: lab,
                value: 6.0,
            })
            .await
            .unwrap();

        // 退出 Math，只保留 Physics
        storage
            .update_student_impl(
                fx.student_id,
                None,
                None,
                Some((vec![fx.subject_id, physics], vec![physics])),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(
            storage
                .get_grade_by_id_impl(math_grade.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_grade_by_id_impl(lab_grade.id)
                .await
                .unwrap()
                .is_some()
        );

        // 剩下的每条成绩，学生都选修了活动所属科目
        let grades = storage
            .list_grades_with_pagination_impl(fx.teacher_id, GradeListQuery::default())
            .await
            .unwrap();
        assert_eq!(grades.pagination.total, 1);
        for detail in grades.items {
            assert!(
                storage
                    .enrollment_exists_impl(detail.grade.student_id, detail.subject_id)
                    .await
                    .unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_update_missing_student_returns_none() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage
            .update_student_impl(42, Some("x".to_string()), None, None)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
