use serde::Serialize;
use ts_rs::TS;

use crate::models::subjects::entities::Subject;

// 教师首页统计
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardResponse {
    pub subjects: Vec<Subject>,
    /// 在本人各科目中选课的学生数（去重）
    pub student_count: i64,
    pub activity_count: i64,
    pub grade_count: i64,
}
