use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::auth::requests::{ChangePasswordRequest, DeviceTokenRequest};
use crate::models::auth::responses::UserInfoResponse;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::{password_policy_violation, user_not_found};
use crate::services::{current_teacher, current_user};
use crate::utils::password::{hash_password, verify_password};

use super::AuthService;

const DEVICE_TOKEN_MAX_LEN: usize = 4096;

pub async fn handle_get_me(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let teacher = current_teacher(&storage, &user).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, teacher },
        "User information retrieved successfully",
    )))
}

pub async fn handle_change_password(
    service: &AuthService,
    body: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 中间件缓存的账号可能是旧的，以数据库为准
    let Some(stored) = storage.get_user_by_id(user.id).await? else {
        return Ok(user_not_found());
    };
    if !verify_password(&body.current_password, &stored.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }
    if let Some(resp) = password_policy_violation(&body.new_password) {
        return Ok(resp);
    }

    let update = UpdateUserRequest {
        password: Some(hash_password(&body.new_password)?),
        ..Default::default()
    };
    match storage.update_user(user.id, update).await? {
        Some(_) => {
            info!("User {} changed password", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
        }
        None => Ok(user_not_found()),
    }
}

pub async fn handle_update_device_token(
    service: &AuthService,
    body: DeviceTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let token = body.token.trim();
    if token.len() > DEVICE_TOKEN_MAX_LEN {
        return Err(crate::errors::SchoolSystemError::validation("Device token is too long").into());
    }
    let token = (!token.is_empty()).then(|| token.to_string());
    let registered = token.is_some();

    let storage = service.get_storage(request)?;
    if !storage.update_device_token(user.id, token).await? {
        return Ok(user_not_found());
    }

    let message = if registered {
        "Device registered for push notifications"
    } else {
        "Device unregistered"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_me_includes_teacher_profile() {
        let (raw, shared) = storage().await;
        let teacher = fixtures::teacher(&raw, "teacher01").await;
        let service = AuthService::with_storage(shared.clone());

        let resp = handle_get_me(&service, &request_as(user_of(&shared, &teacher).await))
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["username"], "teacher01");
        assert_eq!(body["data"]["teacher"]["id"], teacher.id);

        let resp = handle_get_me(&service, &request_as(admin(&shared).await))
            .await
            .unwrap();
        assert!(body_json(resp).await["data"]["teacher"].is_null());
    }

    #[tokio::test]
    async fn test_change_password() {
        let (_, shared) = storage().await;
        let mut user = admin(&shared).await;
        shared
            .update_user(
                user.id,
                UpdateUserRequest {
                    password: Some(hash_password("Old#Pass2025").unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        user = shared.get_user_by_id(user.id).await.unwrap().unwrap();
        let service = AuthService::with_storage(shared.clone());
        let request = request_as(user.clone());

        let resp = handle_change_password(
            &service,
            ChangePasswordRequest {
                current_password: "wrong".to_string(),
                new_password: "New#Pass2025".to_string(),
            },
            &request,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = handle_change_password(
            &service,
            ChangePasswordRequest {
                current_password: "Old#Pass2025".to_string(),
                new_password: "short".to_string(),
            },
            &request,
        )
        .await
        .unwrap();
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::PasswordPolicyViolation as i32
        );

        let resp = handle_change_password(
            &service,
            ChangePasswordRequest {
                current_password: "Old#Pass2025".to_string(),
                new_password: "New#Pass2025".to_string(),
            },
            &request,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let stored = shared.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(verify_password("New#Pass2025", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_device_token_register_and_clear() {
        let (_, shared) = storage().await;
        let user = admin(&shared).await;
        let service = AuthService::with_storage(shared.clone());
        let request = request_as(user.clone());

        handle_update_device_token(
            &service,
            DeviceTokenRequest {
                token: " fcm-device-1 ".to_string(),
            },
            &request,
        )
        .await
        .unwrap();
        let stored = shared.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.device_token.as_deref(), Some("fcm-device-1"));

        handle_update_device_token(
            &service,
            DeviceTokenRequest {
                token: String::new(),
            },
            &request,
        )
        .await
        .unwrap();
        let stored = shared.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.device_token.is_none());
    }
}
