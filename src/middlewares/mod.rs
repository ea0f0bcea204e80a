//! 认证授权中间件
//!
//! - `RequireJWT`：校验 Bearer access token 并把账号放入请求扩展
//! - `RequireRole`：按账号角色放行
//! - `RequireHomeroom`：管理员或该班级班主任放行
//! - `RateLimit`：按 IP / 账号限制请求频率

pub mod rate_limit;
pub mod require_homeroom;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_homeroom::RequireHomeroom;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

// 中间件拒绝请求时的统一响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}
