pub mod activities;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod grades;
pub mod students;
pub mod subjects;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo};

// 服务启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
