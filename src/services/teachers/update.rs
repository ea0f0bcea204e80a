use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, subject_not_found, teacher_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode, teachers::requests::UpdateTeacherRequest};
use crate::services::current_user;
use crate::utils::validate::{validate_phone, validate_text};

/// 管理员或教师本人可修改档案
pub async fn update_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(teacher) = storage.get_teacher_by_id(id).await? else {
        return Ok(teacher_not_found());
    };
    if !user.is_admin() && teacher.user_id != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::TeacherPermissionDenied,
            "You can only update your own profile",
        )));
    }

    if let Some(name) = body.name.as_mut() {
        validate_text("name", name, 50).map_err(SchoolSystemError::validation)?;
        *name = name.trim().to_string();
    }
    if let Some(Some(phone)) = &body.phone {
        validate_phone(phone).map_err(SchoolSystemError::validation)?;
    }
    if let Some(Some(subject_id)) = body.subject_id
        && storage.get_subject_by_id(subject_id).await?.is_none()
    {
        return Ok(subject_not_found());
    }

    match storage.update_teacher(id, body).await? {
        Some(teacher) => {
            info!("Teacher {} updated by user {}", teacher.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                teacher,
                "Teacher updated successfully",
            )))
        }
        None => Ok(teacher_not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_only_self_or_admin_updates() {
        let (raw, shared) = storage().await;
        let me = fixtures::teacher(&raw, "teacher01").await;
        let other = fixtures::teacher(&raw, "teacher02").await;
        let service = TeacherService::with_storage(shared.clone());

        let request = request_as(user_of(&shared, &me).await);
        let resp = update_teacher(
            &service,
            &request,
            me.id,
            UpdateTeacherRequest {
                phone: Some(Some("010-2222-3333".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["phone"], "010-2222-3333");

        let resp = update_teacher(
            &service,
            &request,
            other.id,
            UpdateTeacherRequest {
                name: Some("Changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let request = request_as(admin(&shared).await);
        let resp = update_teacher(
            &service,
            &request,
            other.id,
            UpdateTeacherRequest {
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
