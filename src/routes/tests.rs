use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use super::configure_api_routes;
use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::CacheConfig;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::{json_error_handler, query_error_handler};

const PASSWORD: &str = "SecurePass123";

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_grade_workflow_over_http() {
    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_config(&CacheConfig {
        default_ttl: 60,
        max_capacity: 100,
    }));

    let app = test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(configure_api_routes),
    )
    .await;

    // 注册与登录
    for username in ["teacher1", "teacher2"] {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(json!({
                    "username": username,
                    "email": format!("{username}@school.edu"),
                    "password": PASSWORD,
                }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": "teacher1",
                "email": "other@school.edu",
                "password": PASSWORD,
            }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3004);

    let mut tokens = Vec::new();
    for username in ["teacher1", "teacher2"] {
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "username": username, "password": PASSWORD }))
        );
        assert_eq!(status, StatusCode::OK);
        tokens.push(body["data"]["access_token"].as_str().unwrap().to_string());
    }
    let (t1, t2) = (tokens[0].clone(), tokens[1].clone());

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/v1/subjects"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&t1))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "teacher1");

    // 科目、学生、活动
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&t1))
            .set_json(json!({ "name": "Math" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let math = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/students")
            .insert_header(bearer(&t1))
            .set_json(json!({ "name": "S1", "email": "s1@school.edu", "subject_ids": [math] }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let s1 = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/activities")
            .insert_header(bearer(&t1))
            .set_json(json!({
                "subject_id": math,
                "name": "A1",
                "category": "exam",
                "activity_date": "2025-03-14",
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let a1 = body["data"]["id"].as_i64().unwrap();

    // 录入成绩
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/grades")
            .insert_header(bearer(&t1))
            .set_json(json!({ "student_id": s1, "activity_id": a1, "value": 8.5 }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["value"], 8.5);
    let grade_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/grades")
            .insert_header(bearer(&t1))
            .set_json(json!({ "student_id": s1, "activity_id": a1, "value": 8.5 }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7001);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/grades")
            .insert_header(bearer(&t2))
            .set_json(json!({ "student_id": s1, "activity_id": a1, "value": 5 }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/grades/{grade_id}"))
            .insert_header(bearer(&t1))
            .set_json(json!({ "value": "11" }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/grades/{grade_id}"))
            .insert_header(bearer(&t1))
            .set_json(json!({ "value": "9" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], 9.0);

    // 列表只包含本人科目
    let (_, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/grades")
            .insert_header(bearer(&t1))
    );
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["subject_name"], "Math");

    let (_, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/grades")
            .insert_header(bearer(&t2))
    );
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/dashboard")
            .insert_header(bearer(&t1))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["student_count"], 1);
    assert_eq!(body["data"]["grade_count"], 1);

    // 删除
    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri("/api/v1/grades/0")
            .insert_header(bearer(&t1))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/grades/{grade_id}"))
            .insert_header(bearer(&t1))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/grades/{grade_id}"))
            .insert_header(bearer(&t1))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}
