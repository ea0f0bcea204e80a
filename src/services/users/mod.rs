pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_password;

crate::services::define_service!(
    /// 登录账号管理（仅管理员）
    UserService
);

impl UserService {
    // 获取账号列表
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: UserListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, request, query).await
    }

    // 创建账号
    pub async fn create_user(
        &self,
        request: &HttpRequest,
        body: CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, request, body).await
    }

    // 根据ID获取账号
    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        get::get_user(self, request, user_id).await
    }

    // 更新账号
    pub async fn update_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
        body: UpdateUserRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, request, user_id, body).await
    }

    // 删除账号
    pub async fn delete_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, request, user_id).await
    }
}

/// 密码不满足策略时返回 400 响应
pub(crate) fn password_policy_violation(password: &str) -> Option<HttpResponse> {
    let result = validate_password(password);
    if result.is_valid {
        return None;
    }
    Some(HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::PasswordPolicyViolation,
        result.error_message(),
    )))
}

pub(crate) fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "User not found",
    ))
}
