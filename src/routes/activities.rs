use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activities::requests::{
    ActivityListQuery, CreateActivityRequest, UpdateActivityRequest,
};
use crate::services::ActivityService;
use crate::utils::SafeIDI64;

static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);

pub async fn list_activities(
    req: HttpRequest,
    query: web::Query<ActivityListQuery>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .list_activities(&req, query.into_inner())
        .await
}

pub async fn create_activity(
    req: HttpRequest,
    activity_data: web::Json<CreateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .create_activity(&req, activity_data.into_inner())
        .await
}

pub async fn update_activity(
    req: HttpRequest,
    activity_id: SafeIDI64,
    update_data: web::Json<UpdateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .update_activity(&req, activity_id.0, update_data.into_inner())
        .await
}

pub async fn delete_activity(
    req: HttpRequest,
    activity_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.delete_activity(&req, activity_id.0).await
}

pub fn configure_activities_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/activities")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_activities))
                    .route(web::post().to(create_activity)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_activity))
                    .route(web::delete().to(delete_activity)),
            ),
    );
}
