use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BehaviorService, behavior_not_found, record_forbidden};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse,
    behaviors::{
        entities::Behavior,
        requests::{CreateBehaviorRequest, UpdateBehaviorRequest},
    },
    users::entities::User,
};
use crate::services::current_user;
use crate::services::students::student_not_found;
use crate::utils::validate::{validate_school_year, validate_semester, validate_text};

const CONTENT_MAX_CHARS: usize = 2000;

fn can_modify(user: &User, behavior: &Behavior) -> bool {
    user.is_admin() || behavior.written_by == Some(user.id)
}

pub async fn create_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    mut body: CreateBehaviorRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    validate_school_year(body.year).map_err(SchoolSystemError::validation)?;
    validate_semester(body.semester).map_err(SchoolSystemError::validation)?;
    validate_text("content", &body.content, CONTENT_MAX_CHARS)
        .map_err(SchoolSystemError::validation)?;
    body.content = body.content.trim().to_string();

    let storage = service.get_storage(request)?;

    if storage.get_student_by_id(body.student_id).await?.is_none() {
        return Ok(student_not_found());
    }

    let behavior = storage.create_behavior(body, user.id).await?;
    info!(
        "Behavior record {} written for student {} by {}",
        behavior.id, behavior.student_id, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        behavior,
        "Behavior record created successfully",
    )))
}

pub async fn update_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateBehaviorRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if let Some(year) = body.year {
        validate_school_year(year).map_err(SchoolSystemError::validation)?;
    }
    if let Some(semester) = body.semester {
        validate_semester(semester).map_err(SchoolSystemError::validation)?;
    }
    if let Some(content) = body.content.as_mut() {
        validate_text("content", content, CONTENT_MAX_CHARS)
            .map_err(SchoolSystemError::validation)?;
        *content = content.trim().to_string();
    }

    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_behavior_by_id(id).await? else {
        return Ok(behavior_not_found());
    };
    if !can_modify(&user, &existing) {
        return Ok(record_forbidden());
    }

    match storage.update_behavior(id, body).await? {
        Some(behavior) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            behavior,
            "Behavior record updated successfully",
        ))),
        None => Ok(behavior_not_found()),
    }
}

pub async fn delete_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_behavior_by_id(id).await? else {
        return Ok(behavior_not_found());
    };
    if !can_modify(&user, &existing) {
        return Ok(record_forbidden());
    }

    if storage.delete_behavior(id).await? {
        info!("Behavior record {} deleted by {}", id, user.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Behavior record deleted successfully",
        )))
    } else {
        Ok(behavior_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::test_support::{admin, body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_only_author_or_admin_modifies() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let author = fixtures::teacher(&raw, "teacher01").await;
        let other = fixtures::teacher(&raw, "teacher02").await;
        let service = BehaviorService::with_storage(shared.clone());

        let author_req = request_as(user_of(&shared, &author).await);
        let resp = create_behavior(
            &service,
            &author_req,
            CreateBehaviorRequest {
                student_id: student.id,
                year: 2025,
                semester: 1,
                content: "Leads group projects with care.".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let other_req = request_as(user_of(&shared, &other).await);
        let resp = update_behavior(
            &service,
            &other_req,
            id,
            UpdateBehaviorRequest {
                content: Some("Rewritten".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::RecordPermissionDenied as i32);

        let resp = update_behavior(
            &service,
            &author_req,
            id,
            UpdateBehaviorRequest {
                semester: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = delete_behavior(&service, &other_req, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let admin_req = request_as(admin(&shared).await);
        let resp = delete_behavior(&service, &admin_req, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
