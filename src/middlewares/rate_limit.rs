/*!
 * 速率限制中间件
 *
 * 此中间件用于限制请求频率，防止暴力破解和 DDoS 攻击。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RateLimit;
 *
 * App::new()
 *     .service(
 *         web::scope("/api/v1/auth")
 *             .wrap(RateLimit::login())
 *             .route("/login", web::post().to(login_handler))
 *     )
 * ```
 *
 * ## 限制规则
 *
 * - 已认证请求以教师 ID 为限制键，否则使用客户端 IP
 * - 每个键的计数在窗口到期后清零
 * - 超过限制返回 429 Too Many Requests
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 全局速率限制计数
/// 键: 前缀:标识，值: (窗口内请求数, 窗口开始时间)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u32, Instant)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600)) // 兜底清理，窗口本身按条目时间判断
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册端点限制：3次/分钟/IP
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 刷新令牌限制：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 成绩写入限制：120次/分钟/教师
    pub fn grade_write() -> Self {
        Self::new(120, 60).with_prefix("grades")
    }

    fn cache_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }
}

/// 计一次请求，返回窗口内剩余次数；超限时返回 None
async fn consume(
    cache: &Cache<String, (u32, Instant)>,
    key: &str,
    max_requests: u32,
    window: Duration,
) -> Option<u32> {
    let now = Instant::now();
    let (count, started) = match cache.get(key).await {
        Some((count, started)) if now.duration_since(started) < window => (count, started),
        _ => (0, now),
    };

    if count >= max_requests {
        return None;
    }

    cache.insert(key.to_string(), (count + 1, started)).await;
    Some(max_requests - count - 1)
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理之后时依赖代理设置的 X-Forwarded-For / X-Real-IP 头。
fn extract_client_ip(req: &ServiceRequest) -> String {
    // 尝试从连接信息获取真实 IP（最可信）
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    // 如果连接信息有有效 IP，优先使用
    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 从 X-Forwarded-For 头获取（用于反向代理场景）
    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 从 X-Real-IP 头获取
    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 如果都没有有效 IP，使用连接信息的默认值
    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

/// 验证 IP 地址格式是否有效
fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 已认证教师的 ID
fn extract_teacher_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = extract_teacher_id(&req)
                .map(|id| format!("teacher:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = limit.cache_key(&identifier);

            let Some(remaining) = consume(
                &RATE_LIMIT_CACHE,
                &cache_key,
                limit.max_requests,
                Duration::from_secs(limit.window_secs),
            )
            .await
            else {
                warn!(
                    "Rate limit exceeded for key: {} (limit {}/{}s)",
                    cache_key, limit.max_requests, limit.window_secs
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            };

            req.extensions_mut().insert(RateLimitInfo {
                remaining,
                limit: limit.max_requests,
                reset: limit.window_secs,
            });

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 速率限制信息（可在响应中添加）
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_cache() -> Cache<String, (u32, Instant)> {
        Cache::builder().max_capacity(100).build()
    }

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.cache_key("ip:1.2.3.4"), "login:ip:1.2.3.4");

        let register = RateLimit::register();
        assert_eq!(register.max_requests, 3);

        assert_eq!(RateLimit::new(1, 1).cache_key("teacher:7"), "teacher:7");
    }

    #[tokio::test]
    async fn test_consume_blocks_after_limit() {
        let cache = local_cache();
        let window = Duration::from_secs(60);

        assert_eq!(consume(&cache, "k", 3, window).await, Some(2));
        assert_eq!(consume(&cache, "k", 3, window).await, Some(1));
        assert_eq!(consume(&cache, "k", 3, window).await, Some(0));
        assert_eq!(consume(&cache, "k", 3, window).await, None);

        // 不同键互不影响
        assert_eq!(consume(&cache, "other", 3, window).await, Some(2));
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let cache = local_cache();
        let window = Duration::from_millis(20);

        assert_eq!(consume(&cache, "k", 1, window).await, Some(0));
        assert_eq!(consume(&cache, "k", 1, window).await, None);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(consume(&cache, "k", 1, window).await, Some(0));
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }
}
