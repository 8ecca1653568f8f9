pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activities::requests::{
    ActivityListQuery, CreateActivityRequest, UpdateActivityRequest,
};
use crate::storage::Storage;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 列出本人科目下的活动
    pub async fn list_activities(
        &self,
        request: &HttpRequest,
        query: ActivityListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_activities(self, request, query).await
    }

    // 创建活动
    pub async fn create_activity(
        &self,
        request: &HttpRequest,
        activity_data: CreateActivityRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_activity(self, request, activity_data).await
    }

    // 更新活动
    pub async fn update_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        update_data: UpdateActivityRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_activity(self, request, activity_id, update_data).await
    }

    // 删除活动
    pub async fn delete_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_activity(self, request, activity_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduManagerError;
    use crate::models::activities::entities::ActivityCategory;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::tests_support::*;
    use chrono::NaiveDate;

    fn new_activity(subject_id: i64, name: &str) -> CreateActivityRequest {
        CreateActivityRequest {
            subject_id,
            name: name.to_string(),
            category: ActivityCategory::Assignment,
            activity_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_activity_in_owned_subject_only() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;

        let activity =
            create::create_owned_activity(&storage, new_activity(fx.subject_id, " Quiz 1 "), fx.teacher_id)
                .await
                .unwrap();
        assert_eq!(activity.name, "Quiz 1");
        assert_eq!(activity.category, ActivityCategory::Assignment);

        assert!(matches!(
            create::create_owned_activity(&storage, new_activity(fx.subject_id, "X"), t2).await,
            Err(EduManagerError::Authorization(_))
        ));
        assert!(matches!(
            create::create_owned_activity(&storage, new_activity(999, "X"), fx.teacher_id).await,
            Err(EduManagerError::NotFound(_))
        ));
        assert!(matches!(
            create::create_owned_activity(&storage, new_activity(fx.subject_id, ""), fx.teacher_id)
                .await,
            Err(EduManagerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_moving_activity_requires_owning_target() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;
        let history = storage.create_subject_impl(t2, "History").await.unwrap();
        let physics = storage
            .create_subject_impl(fx.teacher_id, "Physics")
            .await
            .unwrap();

        let err = update::update_owned_activity(
            &storage,
            fx.activity_id,
            UpdateActivityRequest {
                subject_id: Some(history.id),
                ..Default::default()
            },
            fx.teacher_id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EduManagerError::Authorization(_)));

        let moved = update::update_owned_activity(
            &storage,
            fx.activity_id,
            UpdateActivityRequest {
                subject_id: Some(physics.id),
                name: Some(" Final ".to_string()),
                ..Default::default()
            },
            fx.teacher_id,
        )
        .await
        .unwrap();
        assert_eq!(moved.subject_id, physics.id);
        assert_eq!(moved.name, "Final");
    }

    #[tokio::test]
    async fn test_delete_activity_ownership() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let fx = seed_math_fixture(&storage).await;
        let t2 = seed_teacher(&storage, "teacher2").await;

        assert!(matches!(
            delete::delete_owned_activity(&storage, fx.activity_id, t2).await,
            Err(EduManagerError::Authorization(_))
        ));
        delete::delete_owned_activity(&storage, fx.activity_id, fx.teacher_id)
            .await
            .unwrap();
        assert!(matches!(
            delete::delete_owned_activity(&storage, fx.activity_id, fx.teacher_id).await,
            Err(EduManagerError::NotFound(_))
        ));
    }
}
