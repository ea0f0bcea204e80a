/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access_token>`，通过后把当前账号（`User`）
 * 放入请求扩展，供后续中间件与处理程序读取。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 *
 * 处理程序中：
 *
 * ```rust,ignore
 * let user = RequireJWT::extract_user_claims(&req);
 * let uid = RequireJWT::extract_user_id(&req);
 * ```
 *
 * 账号信息按 token 缓存 `cache.default_ttl` 秒；注销时通过
 * [`RequireJWT::cache_key`] 删除对应条目。停用的账号一律拒绝。
 */

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 access token，返回当前账号
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, String> {
    let token = JwtUtils::extract_bearer_token(req.request())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let cache_key = RequireJWT::cache_key(&token);
    if let Some(user) = cache.get_json::<User>(&cache_key).await {
        return Ok(user);
    }
    debug!("User not cached for token, loading from storage");

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {} for JWT: {}", user_id, e);
            "Failed to retrieve user from storage".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    if !user.is_active() {
        return Err("User is not active".to_string());
    }

    cache
        .insert_json(cache_key, &user, AppConfig::get().cache.default_ttl)
        .await;

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // CORS 预检
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 账号缓存键
    pub fn cache_key(token: &str) -> String {
        format!("user:{token}")
    }

    /// 从请求扩展中提取当前账号
    /// 须在应用了 RequireJWT 的路由中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use actix_web::test::TestRequest;

    fn teacher() -> User {
        User {
            id: 5,
            username: "lee_math".to_string(),
            email: "lee@school.kr".to_string(),
            password_hash: String::new(),
            device_token: None,
            role: UserRole::Teacher,
            status: UserStatus::Active,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_extract_helpers_read_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(RequireJWT::extract_user_id(&req).is_none());

        req.extensions_mut().insert(teacher());
        assert_eq!(RequireJWT::extract_user_id(&req), Some(5));
        assert_eq!(RequireJWT::extract_user_role(&req), Some(UserRole::Teacher));
    }

    #[test]
    fn test_cache_key_is_per_token() {
        assert_eq!(RequireJWT::cache_key("abc"), "user:abc");
        assert_ne!(RequireJWT::cache_key("abc"), RequireJWT::cache_key("abd"));
    }
}
