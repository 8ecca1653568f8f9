//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::activities::{Column as ActivityColumn, Entity as Activities};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::grades::Entity as Grades;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{EduManagerError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::normalize_page,
    dashboard::responses::DashboardResponse,
    subjects::{
        entities::{Subject, SubjectSummary},
        requests::SubjectListQuery,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(&self, teacher_id: i64, name: &str) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduManagerError::from_db("创建科目失败", e))?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 分页列出教师本人的科目，附带学生数与活动数
    pub async fn list_subjects_with_pagination_impl(
        &self,
        teacher_id: i64,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<SubjectSummary>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Subjects::find().filter(Column::TeacherId.eq(teacher_id));

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        // 排序
        select = select.order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询科目总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询科目页数失败: {e}")))?;

        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询科目列表失败: {e}")))?;

        let mut items = Vec::with_capacity(subjects.len());
        for model in subjects {
            let student_count = Enrollments::find()
                .filter(EnrollmentColumn::SubjectId.eq(model.id))
                .count(&self.db)
                .await
                .map_err(|e| {
                    EduManagerError::database_operation(format!("统计科目学生数失败: {e}"))
                })?;
            let activity_count = Activities::find()
                .filter(ActivityColumn::SubjectId.eq(model.id))
                .count(&self.db)
                .await
                .map_err(|e| {
                    EduManagerError::database_operation(format!("统计科目活动数失败: {e}"))
                })?;

            items.push(SubjectSummary {
                subject: model.into_subject(),
                student_count: student_count as i64,
                activity_count: activity_count as i64,
            });
        }

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 教师名下全部科目 ID
    pub async fn list_subject_ids_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<i64>> {
        Subjects::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::TeacherId.eq(teacher_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询教师科目失败: {e}")))
    }

    /// 重命名科目
    pub async fn update_subject_impl(&self, subject_id: i64, name: &str) -> Result<Option<Subject>> {
        // 先检查科目是否存在
        let existing = self.get_subject_by_id_impl(subject_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(subject_id),
            name: Set(name.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduManagerError::from_db("更新科目失败", e))?;

        Ok(Some(result.into_subject()))
    }

    /// 删除科目，选课、活动与成绩由外键级联删除
    pub async fn delete_subject_impl(&self, subject_id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(subject_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 教师首页统计
    pub async fn get_dashboard_impl(&self, teacher_id: i64) -> Result<DashboardResponse> {
        let subjects: Vec<Subject> = Subjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询教师科目失败: {e}")))?
            .into_iter()
            .map(|m| m.into_subject())
            .collect();

        if subjects.is_empty() {
            return Ok(DashboardResponse::default());
        }

        let subject_ids: Vec<i64> = subjects.iter().map(|s| s.id).collect();

        let student_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .distinct()
            .filter(EnrollmentColumn::SubjectId.is_in(subject_ids.clone()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("统计学生数失败: {e}")))?;

        let activity_count = Activities::find()
            .filter(ActivityColumn::SubjectId.is_in(subject_ids.clone()))
            .count(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("统计活动数失败: {e}")))?;

        let grade_count = Grades::find()
            .inner_join(Activities)
            .filter(ActivityColumn::SubjectId.is_in(subject_ids))
            .count(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("统计成绩数失败: {e}")))?;

        Ok(DashboardResponse {
            subjects,
            student_count: student_ids.len() as i64,
            activity_count: activity_count as i64,
            grade_count: grade_count as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::tests_support::*;

    #[tokio::test]
    async fn test_list_subjects_only_returns_own() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let t1 = seed_teacher(&storage, "teacher1").await;
        let t2 = seed_teacher(&storage, "teacher2").await;
        let math = storage.create_subject_impl(t1, "Math").await.unwrap();
        storage.create_subject_impl(t1, "Physics").await.unwrap();
        storage.create_subject_impl(t2, "History").await.unwrap();
        storage
            .create_student_impl("S1", "s1@school.edu", &[math.id])
            .await
            .unwrap();

        let list = storage
            .list_subjects_with_pagination_impl(t1, SubjectListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert!(list.items.iter().all(|s| s.subject.teacher_id == t1));

        let math_summary = list
            .items
            .iter()
            .find(|s| s.subject.id == math.id)
            .unwrap();
        assert_eq!(math_summary.student_count, 1);
        assert_eq!(math_summary.activity_count, 0);

        let searched = storage
            .list_subjects_with_pagination_impl(
                t1,
                SubjectListQuery {
                    search: Some("phy".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);
        assert_eq!(searched.items[0].subject.name, "Physics");
    }

    #[tokio::test]
    async fn test_delete_subject_cascades() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        storage
            .insert_grade_impl(crate::models::grades::entities::NewGrade {
                student_id: fx.student_id,
                activity_id: fx.activity_id,
                value: 8.0,
            })
            .await
            .unwrap();

        assert!(storage.delete_subject_impl(fx.subject_id).await.unwrap());

        assert!(
            storage
                .get_activity_by_id_impl(fx.activity_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            !storage
                .enrollment_exists_impl(fx.student_id, fx.subject_id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .get_grade_by_student_and_activity_impl(fx.student_id, fx.activity_id)
                .await
                .unwrap()
                .is_none()
        );
        // 学生本身保留
        assert!(
            storage
                .get_student_by_id_impl(fx.student_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        storage
            .create_student_impl("S2", "s2@school.edu", &[fx.subject_id])
            .await
            .unwrap();
        storage
            .insert_grade_impl(crate::models::grades::entities::NewGrade {
                student_id: fx.student_id,
                activity_id: fx.activity_id,
                value: 6.5,
            })
            .await
            .unwrap();

        let dashboard = storage.get_dashboard_impl(fx.teacher_id).await.unwrap();
        assert_eq!(dashboard.subjects.len(), 1);
        assert_eq!(dashboard.student_count, 2);
        assert_eq!(dashboard.activity_count, 1);
        assert_eq!(dashboard.grade_count, 1);

        let other = seed_teacher(&storage, "teacher9").await;
        let empty = storage.get_dashboard_impl(other).await.unwrap();
        assert!(empty.subjects.is_empty());
        assert_eq!(empty.grade_count, 0);
    }
}
