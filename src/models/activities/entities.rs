use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 活动类别，数据库中保存两位代码
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum ActivityCategory {
    Exam,       // EX
    Assignment, // TR
    Practice,   // PR
    Other,      // OT
}

impl ActivityCategory {
    pub fn code(&self) -> &'static str {
        match self {
            ActivityCategory::Exam => "EX",
            ActivityCategory::Assignment => "TR",
            ActivityCategory::Practice => "PR",
            ActivityCategory::Other => "OT",
        }
    }
}

impl std::fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for ActivityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EX" => Ok(ActivityCategory::Exam),
            "TR" => Ok(ActivityCategory::Assignment),
            "PR" => Ok(ActivityCategory::Practice),
            "OT" => Ok(ActivityCategory::Other),
            _ => Err(format!("Invalid activity category: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct Activity {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub category: ActivityCategory,
    pub activity_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Activity {
    /// 成绩下限（含）
    pub const MIN_SCORE: f64 = 0.0;
    /// 成绩上限（含）
    pub const MAX_SCORE: f64 = 10.0;
}
