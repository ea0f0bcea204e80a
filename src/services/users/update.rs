use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, password_policy_violation, user_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::UpdateUserRequest,
    },
};
use crate::services::current_user;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_email;

pub async fn update_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
    mut body: UpdateUserRequest,
) -> ActixResult<HttpResponse> {
    let operator = current_user(request)?;

    // 管理员不能把自己降级或停用
    if operator.id == user_id
        && (body.role.as_ref().is_some_and(|r| *r != UserRole::Admin)
            || body.status.as_ref().is_some_and(|s| *s != UserStatus::Active))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Cannot change your own role or status",
        )));
    }

    if let Some(email) = &body.email {
        validate_email(email).map_err(SchoolSystemError::validation)?;
    }
    if let Some(password) = body.password.take() {
        if let Some(resp) = password_policy_violation(&password) {
            return Ok(resp);
        }
        body.password = Some(hash_password(&password)?);
    }

    let storage = service.get_storage(request)?;

    match storage.update_user(user_id, body).await {
        Ok(Some(user)) => {
            info!("User {} updated by {}", user.id, operator.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(user_not_found()),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserAlreadyExists, "Email already exists"),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_admin_cannot_demote_self() {
        let (_raw, shared) = storage().await;
        let me = admin(&shared).await;
        let request = request_as(me.clone());
        let service = UserService::with_storage(shared.clone());

        let resp = update_user(
            &service,
            &request,
            me.id,
            UpdateUserRequest {
                role: Some(UserRole::Teacher),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = update_user(
            &service,
            &request,
            me.id,
            UpdateUserRequest {
                email: Some("root@school.test".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = UserService::with_storage(shared.clone());

        let resp = update_user(
            &service,
            &request,
            999,
            UpdateUserRequest {
                status: Some(UserStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
