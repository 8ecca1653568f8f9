use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ApiResponse;
use crate::models::common::error_response;
use crate::services::require_teacher_id;
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
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

    // 教师首页统计
    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let uid = match require_teacher_id(request) {
            Ok(id) => id,
            Err(resp) => return Ok(resp),
        };

        match self.get_storage(request).get_dashboard(uid).await {
            Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                dashboard,
                "Dashboard retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
