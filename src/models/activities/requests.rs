use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::ActivityCategory;

// 活动列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
}

// 创建活动请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct CreateActivityRequest {
    pub subject_id: i64,
    pub name: String,
    pub category: ActivityCategory,
    pub activity_date: NaiveDate,
}

// 更新活动请求，移到其他科目时目标科目也必须属于当前教师
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct UpdateActivityRequest {
    pub subject_id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<ActivityCategory>,
    pub activity_date: Option<NaiveDate>,
}
