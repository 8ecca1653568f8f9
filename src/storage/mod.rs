use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 教师账号方法
    // 创建教师账号，password 字段传入的是已哈希的密码
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取教师
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取教师
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取教师
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取教师
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 科目管理方法
    // 创建科目
    async fn create_subject(&self, teacher_id: i64, name: &str) -> Result<Subject>;
    // 通过ID获取科目
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    // 列出教师本人的科目
    async fn list_subjects_with_pagination(
        &self,
        teacher_id: i64,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<SubjectSummary>>;
    // 教师名下全部科目ID
    async fn list_subject_ids_by_teacher(&self, teacher_id: i64) -> Result<Vec<i64>>;
    // 重命名科目
    async fn update_subject(&self, subject_id: i64, name: &str) -> Result<Option<Subject>>;
    // 删除科目，级联删除选课、活动与成绩
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;

    /// 学生与选课方法
    // 创建学生并写入选课，同一事务
    async fn create_student(
        &self,
        name: &str,
        email: &str,
        subject_ids: &[i64],
    ) -> Result<Student>;
    // 通过ID获取学生
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>>;
    // 列出在教师任一科目中选课的学生
    async fn list_students_with_pagination(
        &self,
        teacher_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<StudentWithSubjects>>;
    // 学生在给定科目范围内的选课
    async fn list_student_subject_ids(
        &self,
        student_id: i64,
        within_subject_ids: &[i64],
    ) -> Result<Vec<i64>>;
    // 更新学生信息；replace 为 Some((范围, 新集合)) 时只替换范围内的选课
    async fn update_student(
        &self,
        student_id: i64,
        name: Option<String>,
        email: Option<String>,
        replace: Option<(Vec<i64>, Vec<i64>)>,
    ) -> Result<Option<Student>>;
    // 删除学生，级联删除选课与成绩
    async fn delete_student(&self, student_id: i64) -> Result<bool>;
    // 学生是否选修了该科目
    async fn enrollment_exists(&self, student_id: i64, subject_id: i64) -> Result<bool>;

    /// 活动管理方法
    // 创建活动
    async fn create_activity(&self, req: CreateActivityRequest) -> Result<Activity>;
    // 通过ID获取活动
    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>>;
    // 列出教师本人科目下的活动
    async fn list_activities_with_pagination(
        &self,
        teacher_id: i64,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<Activity>>;
    // 更新活动
    async fn update_activity(
        &self,
        activity_id: i64,
        update: UpdateActivityRequest,
    ) -> Result<Option<Activity>>;
    // 删除活动，级联删除成绩
    async fn delete_activity(&self, activity_id: i64) -> Result<bool>;

    /// 成绩方法
    // 通过ID获取成绩
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>>;
    // 通过 (学生, 活动) 获取成绩
    async fn get_grade_by_student_and_activity(
        &self,
        student_id: i64,
        activity_id: i64,
    ) -> Result<Option<Grade>>;
    // 事务内先查后插；已存在返回 DuplicateGrade，并发冲突返回 ConstraintViolation
    async fn insert_grade(&self, grade: NewGrade) -> Result<Grade>;
    // 修改成绩分数
    async fn update_grade_value(&self, grade_id: i64, value: f64) -> Result<Option<Grade>>;
    // 删除成绩
    async fn delete_grade(&self, grade_id: i64) -> Result<bool>;
    // 列出教师本人科目下的成绩
    async fn list_grades_with_pagination(
        &self,
        teacher_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<GradeDetail>>;

    /// 统计
    async fn get_dashboard(&self, teacher_id: i64) -> Result<DashboardResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
