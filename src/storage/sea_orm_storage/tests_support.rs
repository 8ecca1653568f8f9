//! 测试用数据构造

use chrono::NaiveDate;

use super::SeaOrmStorage;
use crate::models::activities::{entities::ActivityCategory, requests::CreateActivityRequest};
use crate::models::users::requests::CreateUserRequest;

/// 一位教师、一门科目、一名已选课学生、一个活动
pub(crate) struct MathFixture {
    pub teacher_id: i64,
    pub subject_id: i64,
    pub student_id: i64,
    pub activity_id: i64,
}

pub(crate) async fn seed_teacher(storage: &SeaOrmStorage, username: &str) -> i64 {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.edu"),
            password: "hashed".to_string(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_activity(storage: &SeaOrmStorage, subject_id: i64, name: &str) -> i64 {
    storage
        .create_activity_impl(CreateActivityRequest {
            subject_id,
            name: name.to_string(),
            category: ActivityCategory::Exam,
            activity_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        })
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_math_fixture(storage: &SeaOrmStorage) -> MathFixture {
    let teacher_id = seed_teacher(storage, "teacher1").await;
    let subject_id = storage
        .create_subject_impl(teacher_id, "Math")
        .await
        .unwrap()
        .id;
    let student_id = storage
        .create_student_impl("S1", "s1@school.edu", &[subject_id])
        .await
        .unwrap()
        .id;
    let activity_id = seed_activity(storage, subject_id, "A1").await;

    MathFixture {
        teacher_id,
        subject_id,
        student_id,
        activity_id,
    }
}
