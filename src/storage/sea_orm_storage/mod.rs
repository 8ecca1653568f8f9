//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activities;
mod grades;
mod students;
mod subjects;
mod users;

#[cfg(test)]
pub(crate) mod tests_support;

use crate::config::AppConfig;
use crate::errors::{EduManagerError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite 实例，单连接保证所有操作看到同一个库
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| EduManagerError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| EduManagerError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await?;

        Ok(Self { db })
    }

    /// 文件 SQLite 实例，连接参数与生产环境一致，用于多连接并发场景
    #[cfg(test)]
    pub(crate) async fn new_file_backed(path: &std::path::Path) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = Self::connect_sqlite(&url, 10, 30).await?;
        Self::migrate(&db).await?;

        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + 外键）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduManagerError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EduManagerError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EduManagerError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduManagerError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    activities::{
        entities::Activity,
        requests::{ActivityListQuery, CreateActivityRequest, UpdateActivityRequest},
    },
    dashboard::responses::DashboardResponse,
    grades::{
        entities::{Grade, GradeDetail, NewGrade},
        requests::GradeListQuery,
    },
    students::{
        entities::{Student, StudentWithSubjects},
        requests::StudentListQuery,
    },
    subjects::{
        entities::{Subject, SubjectSummary},
        requests::SubjectListQuery,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 教师账号模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 科目模块
    async fn create_subject(&self, teacher_id: i64, name: &str) -> Result<Subject> {
        self.create_subject_impl(teacher_id, name).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        teacher_id: i64,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<SubjectSummary>> {
        self.list_subjects_with_pagination_impl(teacher_id, query)
            .await
    }

    async fn list_subject_ids_by_teacher(&self, teacher_id: i64) -> Result<Vec<i64>> {
        self.list_subject_ids_by_teacher_impl(teacher_id).await
    }

    async fn update_subject(&self, subject_id: i64, name: &str) -> Result<Option<Subject>> {
        self.update_subject_impl(subject_id, name).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    // 学生模块
    async fn create_student(
        &self,
        name: &str,
        email: &str,
        subject_ids: &[i64],
    ) -> Result<Student> {
        self.create_student_impl(name, email, subject_ids).await
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn list_students_with_pagination(
        &self,
        teacher_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentWithSubjects>> {
        self.list_students_with_pagination_impl(teacher_id, query)
            .await
    }

    async fn list_student_subject_ids(
        &self,
        student_id: i64,
        within_subject_ids: &[i64],
    ) -> Result<Vec<i64>> {
        self.list_student_subject_ids_impl(student_id, within_subject_ids)
            .await
    }

    async fn update_student(
        &self,
        student_id: i64,
        name: Option<String>,
        email: Option<String>,
        replace: Option<(Vec<i64>, Vec<i64>)>,
    ) -> Result<Option<Student>> {
        self.update_student_impl(student_id, name, email, replace)
            .await
    }

    async fn delete_student(&self, student_id: i64) -> Result<bool> {
        self.delete_student_impl(student_id).await
    }

    async fn enrollment_exists(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        self.enrollment_exists_impl(student_id, subject_id).await
    }

    // 活动模块
    async fn create_activity(&self, req: CreateActivityRequest) -> Result<Activity> {
        self.create_activity_impl(req).await
    }

    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>> {
        self.get_activity_by_id_impl(activity_id).await
    }

    async fn list_activities_with_pagination(
        &self,
        teacher_id: i64,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<Activity>> {
        self.list_activities_with_pagination_impl(teacher_id, query)
            .await
    }

    async fn update_activity(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>> {
        self.update_activity_impl(activity_id, update).await
    }

    async fn delete_activity(&self, activity_id: i64) -> Result<bool> {
        self.delete_activity_impl(activity_id).await
    }

    // 成绩模块
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(grade_id).await
    }

    async fn get_grade_by_student_and_activity(
        &self,
        student_id: i64,
        activity_id: i64,
    ) -> Result<Option<Grade>> {
        self.get_grade_by_student_and_activity_impl(student_id, activity_id)
            .await
    }

    async fn insert_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.insert_grade_impl(grade).await
    }

    async fn update_grade_value(&self, grade_id: i64, value: f64) -> Result<Option<Grade>> {
        self.update_grade_value_impl(grade_id, value).await
    }

    async fn delete_grade(&self, grade_id: i64) -> Result<bool> {
        self.delete_grade_impl(grade_id).await
    }

    async fn list_grades_with_pagination(
        &self,
        teacher_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<GradeDetail>> {
        self.list_grades_with_pagination_impl(teacher_id, query)
            .await
    }

    // 统计
    async fn get_dashboard(&self, teacher_id: i64) -> Result<DashboardResponse> {
        self.get_dashboard_impl(teacher_id).await
    }
}
