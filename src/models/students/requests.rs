use serde::Deserialize;
use ts_rs::TS;

// 学生列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 只看某一科目的学生
    pub subject_id: Option<i64>,
    /// 按姓名或邮箱搜索
    pub search: Option<String>,
}

// 创建学生请求，subject_ids 必须全部属于当前教师
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub subject_ids: Vec<i64>,
}

// 更新学生请求
//
// subject_ids 为 Some 时替换该学生在当前教师名下的选课，
// 其他教师科目下的选课保持不变
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject_ids: Option<Vec<i64>>,
}
