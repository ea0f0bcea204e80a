/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一键在 `window_secs` 内最多 `max_requests` 次，超出返回 429。
 * 已认证请求按账号计数，否则按客户端 IP。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
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
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 键 -> (窗口起点秒, 已用次数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (i64, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
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

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 导出：20次/分钟
    pub fn export() -> Self {
        Self::new(20, 60).with_prefix("export")
    }

    fn cache_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }
}

/// 计入一次请求，返回剩余次数；超限返回 None
fn consume(
    entry: Option<(i64, u32)>,
    now: i64,
    max_requests: u32,
    window_secs: u64,
) -> (Option<u32>, (i64, u32)) {
    let (start, used) = match entry {
        Some((start, used)) if now - start < window_secs as i64 => (start, used),
        _ => (now, 0),
    };
    if used >= max_requests {
        return (None, (start, used));
    }
    let used = used + 1;
    (Some(max_requests - used), (start, used))
}

// 优先连接地址，其次转发头，均需是合法 IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && ip.parse::<IpAddr>().is_ok()
    {
        return ip.clone();
    }

    for header in ["X-Forwarded-For", "X-Real-IP"] {
        if let Some(value) = req.headers().get(header)
            && let Ok(value) = value.to_str()
            && let Some(ip) = value.split(',').next()
            && ip.trim().parse::<IpAddr>().is_ok()
        {
            return ip.trim().to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
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
            let identifier = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = limit.cache_key(&identifier);

            let now = chrono::Utc::now().timestamp();
            let entry = RATE_LIMIT_CACHE.get(&cache_key).await;
            let (remaining, updated) =
                consume(entry, now, limit.max_requests, limit.window_secs);
            RATE_LIMIT_CACHE.insert(cache_key.clone(), updated).await;

            if remaining.is_none() {
                warn!(
                    "Rate limit exceeded for key: {} ({}/{})",
                    cache_key, updated.1, limit.max_requests
                );
                let retry_after = (updated.0 + limit.window_secs as i64 - now).max(1) as u64;
                return Ok(req.into_response(
                    create_rate_limit_response(retry_after).map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.cache_key("ip:1.2.3.4"), "login:ip:1.2.3.4");
        assert_eq!(RateLimit::refresh_token().max_requests, 10);
    }

    #[test]
    fn test_fixed_window_counting() {
        let mut entry = None;
        for expected in [1, 0] {
            let (remaining, updated) = consume(entry, 100, 2, 60);
            assert_eq!(remaining, Some(expected));
            entry = Some(updated);
        }
        // 第三次超限
        let (remaining, updated) = consume(entry, 120, 2, 60);
        assert_eq!(remaining, None);
        assert_eq!(updated, (100, 2));

        // 窗口过后重新计数
        let (remaining, updated) = consume(Some(updated), 160, 2, 60);
        assert_eq!(remaining, Some(1));
        assert_eq!(updated, (160, 1));
    }
}
