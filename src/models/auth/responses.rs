use crate::models::teachers::entities::Teacher;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// 当前用户信息，教师账号附带教师档案
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
    pub teacher: Option<Teacher>,
}
