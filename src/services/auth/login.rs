use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identifier = login_request.username.trim();
    if identifier.is_empty() || login_request.password.is_empty() {
        return Ok(auth_failed());
    }

    let storage = service.get_storage(request)?;

    // 1. 用户名或邮箱查找账号
    let Some(user) = storage.get_user_by_username_or_email(identifier).await? else {
        return Ok(auth_failed());
    };

    // 2. 校验密码
    if !verify_password(&login_request.password, &user.password_hash) {
        warn!("Failed login attempt for {}", identifier);
        return Ok(auth_failed());
    }

    // 3. 停用账号不允许登录
    if !user.is_active() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::UserInactive,
            "Account is not active",
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 签发令牌对
    let token_pair = match user.generate_token_pair(login_request.remember_me) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    info!("User {} logged in successfully", user.username);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(
        &token_pair.refresh_token,
        token_pair.refresh_expiry_days,
    );
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: service.get_config().jwt.access_token_expiry * 60,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest},
    };
    use crate::services::test_support::{body_json, storage};
    use crate::utils::jwt::REFRESH_COOKIE_NAME;
    use crate::utils::password::hash_password;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_login_flow() {
        let (_, shared) = storage().await;
        let user = shared
            .create_user(CreateUserRequest {
                username: "teacher01".to_string(),
                email: "teacher01@school.test".to_string(),
                password: hash_password("Secret#2025").unwrap(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();
        let service = AuthService::with_storage(shared.clone());
        let request = TestRequest::default().to_http_request();

        let resp = handle_login(&service, login("teacher01", "wrong"), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // 邮箱同样可以登录
        let resp = handle_login(
            &service,
            login("teacher01@school.test", "Secret#2025"),
            &request,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            resp.cookies()
                .any(|c| c.name() == REFRESH_COOKIE_NAME && !c.value().is_empty())
        );
        let body = body_json(resp).await;
        assert!(body["data"]["access_token"].as_str().is_some());
        assert!(body["data"]["user"].get("password_hash").is_none());

        let refreshed = shared.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(refreshed.last_login.is_some());

        shared
            .update_user(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let resp = handle_login(&service, login("teacher01", "Secret#2025"), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await["code"], ErrorCode::UserInactive as i32);
    }
}
