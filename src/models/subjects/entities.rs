use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    // 科目ID
    pub id: i64,
    // 科目名称
    pub name: String,
    // 所属教师ID
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 科目列表项：附带学生数与活动数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub subject: Subject,
    pub student_count: i64,
    pub activity_count: i64,
}
