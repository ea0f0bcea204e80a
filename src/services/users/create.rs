use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, password_policy_violation};
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_username};

pub async fn create_user(
    service: &UserService,
    request: &HttpRequest,
    mut body: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    validate_username(&body.username).map_err(SchoolSystemError::validation)?;
    validate_email(&body.email).map_err(SchoolSystemError::validation)?;
    if let Some(resp) = password_policy_violation(&body.password) {
        return Ok(resp);
    }
    body.password = hash_password(&body.password)?;

    let storage = service.get_storage(request)?;

    match storage.create_user(body).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username or email already exists",
            ),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use actix_web::http::StatusCode;

    fn new_user(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: password.to_string(),
            role: UserRole::Teacher,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_and_rejects_duplicates() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = UserService::with_storage(shared.clone());

        let resp = create_user(&service, &request, new_user("teacher01", "Secur3Pass"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert!(body["data"].get("password_hash").is_none());

        let stored = shared
            .get_user_by_username("teacher01")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "Secur3Pass");

        let resp = create_user(&service, &request, new_user("teacher01", "Secur3Pass"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = UserService::with_storage(shared.clone());

        let err = create_user(&service, &request, new_user("ab", "Secur3Pass"))
            .await
            .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);

        let resp = create_user(&service, &request, new_user("teacher02", "weak"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::PasswordPolicyViolation as i32);
    }
}
