use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

// 清除 cookie 并要求重新登录
fn login_required(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Refresh token rejected: {}", e);
            return Ok(login_required("Login expired or invalid, please login again"));
        }
    };

    // 令牌有效期内账号可能已被停用或删除，角色也可能变化
    let storage = service.get_storage(request)?;
    let user = match claims.user_id() {
        Some(id) => storage.get_user_by_id(id).await?,
        None => None,
    };
    let Some(user) = user.filter(|u| u.is_active()) else {
        warn!("Refresh token presented for unavailable account {}", claims.sub);
        return Ok(login_required("Account is not available, please login again"));
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl_seconds(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            warn!("Failed to issue access token: {}", e);
            Ok(login_required("Unable to refresh token, please login again"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserStatus, requests::UpdateUserRequest};
    use crate::services::test_support::{admin, body_json, storage};
    use crate::utils::jwt::{REFRESH_COOKIE_NAME, TokenType};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn with_cookie(token: &str) -> HttpRequest {
        TestRequest::default()
            .cookie(Cookie::new(REFRESH_COOKIE_NAME, token.to_string()))
            .to_http_request()
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let (_, shared) = storage().await;
        let user = admin(&shared).await;
        let service = AuthService::with_storage(shared.clone());
        let pair = user.generate_token_pair(false).unwrap();

        let resp = handle_refresh_token(&service, &with_cookie(&pair.refresh_token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        let access = body["data"]["access_token"].as_str().unwrap();
        assert!(JwtUtils::verify_access_token(access).is_ok());

        // access token 不能当作 refresh token 使用
        let resp = handle_refresh_token(&service, &with_cookie(&pair.access_token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.cookies().any(|c| c.name() == REFRESH_COOKIE_NAME));
    }

    #[tokio::test]
    async fn test_refresh_rejects_inactive_account() {
        let (_, shared) = storage().await;
        let user = admin(&shared).await;
        let service = AuthService::with_storage(shared.clone());
        let refresh = JwtUtils::generate_token(
            user.id,
            "admin",
            TokenType::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();

        shared
            .update_user(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let resp = handle_refresh_token(&service, &with_cookie(&refresh))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = handle_refresh_token(&service, &TestRequest::default().to_http_request())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
