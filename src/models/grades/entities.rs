use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 一条成绩记录，(student_id, activity_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub activity_id: i64,
    pub value: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的成绩，值已经过校验
#[derive(Debug, Clone, PartialEq)]
pub struct NewGrade {
    pub student_id: i64,
    pub activity_id: i64,
    pub value: f64,
}

// 列表展示用的成绩详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub grade: Grade,
    pub student_name: String,
    pub activity_name: String,
    pub subject_id: i64,
    pub subject_name: String,
}
