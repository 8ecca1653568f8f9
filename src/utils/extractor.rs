//! 路径参数提取器

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径中的 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

fn parse_id(raw: Option<&str>) -> Result<i64, &'static str> {
    match raw.map(str::parse::<i64>) {
        Some(Ok(id)) if id > 0 => Ok(id),
        Some(_) => Err("Invalid id: must be a positive integer"),
        None => Err("Missing id in path"),
    }
}

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = parse_id(req.match_info().get("id"))
            .map(SafeIDI64)
            .map_err(|msg| {
                InternalError::from_response(
                    msg,
                    HttpResponse::BadRequest()
                        .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)),
                )
                .into()
            });
        ready(result)
    }
}
