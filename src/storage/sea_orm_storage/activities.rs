//! 活动存储操作

use super::SeaOrmStorage;
use crate::entity::activities::{ActiveModel, Column, Entity as Activities};
use crate::errors::{EduManagerError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    activities::{
        entities::Activity,
        requests::{ActivityListQuery, CreateActivityRequest, UpdateActivityRequest},
    },
    common::normalize_page,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建活动
    pub async fn create_activity_impl(&self, req: CreateActivityRequest) -> Result<Activity> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            category: Set(req.category.code().to_string()),
            activity_date: Set(req.activity_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduManagerError::from_db("创建活动失败", e))?;

        Ok(result.into_activity())
    }

    /// 通过 ID 获取活动
    pub async fn get_activity_by_id_impl(&self, activity_id: i64) -> Result<Option<Activity>> {
        let result = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_activity()))
    }

    /// 分页列出教师本人科目下的活动，按日期倒序
    pub async fn list_activities_with_pagination_impl(
        &self,
        teacher_id: i64,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<Activity>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut scope = self.list_subject_ids_by_teacher_impl(teacher_id).await?;
        if let Some(subject_id) = query.subject_id {
            scope.retain(|id| *id == subject_id);
        }

        if scope.is_empty() {
            return Ok(PaginatedResponse {
                items: Vec::new(),
                pagination: PaginationInfo::empty(page, size),
            });
        }

        let select = Activities::find()
            .filter(Column::SubjectId.is_in(scope))
            .order_by_desc(Column::ActivityDate)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动页数失败: {e}")))?;

        let activities = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: activities.into_iter().map(|m| m.into_activity()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新活动
    pub async fn update_activity_impl(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>> {
        let existing = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(category) = update.category {
            model.category = Set(category.code().to_string());
        }

        if let Some(activity_date) = update.activity_date {
            model.activity_date = Set(activity_date);
        }

        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduManagerError::from_db("更新活动失败", e))?;

        Ok(Some(result.into_activity()))
    }

    /// 删除活动，成绩由外键级联删除
    pub async fn delete_activity_impl(&self, activity_id: i64) -> Result<bool> {
        let result = Activities::delete_by_id(activity_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("删除活动失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activities::entities::ActivityCategory;
    use crate::storage::sea_orm_storage::tests_support::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_activity_category_round_trips_through_store() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;

        let updated = storage
            .update_activity_impl(
                fx.activity_id,
                UpdateActivityRequest {
                    category: Some(ActivityCategory::Practice),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.category, ActivityCategory::Practice);
        assert_eq!(updated.name, "A1");
    }

    #[tokio::test]
    async fn test_list_activities_ordered_by_date() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let later = storage
            .create_activity_impl(CreateActivityRequest {
                subject_id: fx.subject_id,
                name: "Final".to_string(),
                category: ActivityCategory::Exam,
                activity_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            })
            .await
            .unwrap();

        let list = storage
            .list_activities_with_pagination_impl(fx.teacher_id, ActivityListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.items[0].id, later.id);
        assert_eq!(list.items[1].id, fx.activity_id);

        let other = seed_teacher(&storage, "teacher2").await;
        let empty = storage
            .list_activities_with_pagination_impl(other, ActivityListQuery::default())
            .await
            .unwrap();
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn test_delete_activity_cascades_grades() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let grade = storage
            .insert_grade_impl(crate::models::grades::entities::NewGrade {
                student_id: fx.student_id,
                activity_id: fx.activity_id,
                value: 9.0,
            })
            .await
            .unwrap();

        assert!(storage.delete_activity_impl(fx.activity_id).await.unwrap());
        assert!(storage.get_grade_by_id_impl(grade.id).await.unwrap().is_none());
    }
}
