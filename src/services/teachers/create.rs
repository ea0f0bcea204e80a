use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, subject_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode, teachers::requests::CreateTeacherRequest};
use crate::services::users::password_policy_violation;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_phone, validate_text, validate_username};

/// 创建教师：账号与档案在同一事务中写入
pub async fn create_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    mut body: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    validate_username(&body.username).map_err(SchoolSystemError::validation)?;
    validate_email(&body.email).map_err(SchoolSystemError::validation)?;
    validate_text("name", &body.name, 50).map_err(SchoolSystemError::validation)?;
    if let Some(phone) = &body.phone {
        validate_phone(phone).map_err(SchoolSystemError::validation)?;
    }
    if let Some(resp) = password_policy_violation(&body.password) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;

    if let Some(subject_id) = body.subject_id
        && storage.get_subject_by_id(subject_id).await?.is_none()
    {
        return Ok(subject_not_found());
    }

    body.name = body.name.trim().to_string();
    body.password = hash_password(&body.password)?;

    match storage.create_teacher(body).await {
        Ok(teacher) => {
            info!("Teacher {} ({}) created", teacher.name, teacher.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                teacher,
                "Teacher created successfully",
            )))
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

    fn new_teacher(username: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "Secur3Pass".to_string(),
            name: " Park Jisoo ".to_string(),
            phone: Some("010-1234-5678".to_string()),
            subject_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_teacher_with_account() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = TeacherService::with_storage(shared.clone());

        let resp = create_teacher(&service, &request, new_teacher("teacher01"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["name"], "Park Jisoo");

        let user = shared
            .get_user_by_username("teacher01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::Teacher);

        let resp = create_teacher(&service, &request, new_teacher("teacher01"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_teacher_unknown_subject() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = TeacherService::with_storage(shared.clone());

        let mut body = new_teacher("teacher02");
        body.subject_id = Some(42);
        let resp = create_teacher(&service, &request, body).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
