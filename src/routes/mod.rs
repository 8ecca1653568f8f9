pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod grades;
pub mod students;
pub mod subjects;

pub use activities::configure_activities_routes;
pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use grades::configure_grades_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_subjects_routes)
        .configure(configure_students_routes)
        .configure(configure_activities_routes)
        .configure(configure_grades_routes);
}

#[cfg(test)]
mod tests;
