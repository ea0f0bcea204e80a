pub mod login;
pub mod logout;
pub mod profile;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::auth::requests::{ChangePasswordRequest, DeviceTokenRequest, LoginRequest};

crate::services::define_service!(
    /// 登录、令牌刷新与当前账号资料
    AuthService
);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }

    // 当前账号信息
    pub async fn get_me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_me(self, request).await
    }

    pub async fn change_password(
        &self,
        body: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_change_password(self, body, request).await
    }

    // 登记推送设备
    pub async fn update_device_token(
        &self,
        body: DeviceTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_device_token(self, body, request).await
    }
}
