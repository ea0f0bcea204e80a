use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubjectService, subject_conflict, subject_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse,
    subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest},
};
use crate::utils::validate::validate_text;

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    mut body: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    validate_text("name", &body.name, 50).map_err(SchoolSystemError::validation)?;
    body.name = body.name.trim().to_string();

    let storage = service.get_storage(request)?;

    match storage.create_subject(body).await {
        Ok(subject) => {
            info!("Subject {} created", subject.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                subject,
                "Subject created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(subject_conflict()),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = body.name.as_mut() {
        validate_text("name", name, 50).map_err(SchoolSystemError::validation)?;
        *name = name.trim().to_string();
    }

    let storage = service.get_storage(request)?;

    match storage.update_subject(id, body).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(subject_not_found()),
        Err(e) if e.is_unique_violation() => Ok(subject_conflict()),
        Err(e) => Err(e.into()),
    }
}

/// 删除科目，其评价方式、成绩与汇总级联删除
pub async fn delete_subject(
    service: &SubjectService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_subject(id).await? {
        info!("Subject {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted successfully")))
    } else {
        Ok(subject_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_subject_lifecycle() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = SubjectService::with_storage(shared.clone());

        let resp = create_subject(
            &service,
            &request,
            CreateSubjectRequest {
                name: " Mathematics ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["name"], "Mathematics");
        let id = body["data"]["id"].as_i64().unwrap();

        let resp = create_subject(
            &service,
            &request,
            CreateSubjectRequest {
                name: "Mathematics".to_string(),
                description: Some("dup".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::SubjectAlreadyExists as i32);

        let resp = update_subject(
            &service,
            &request,
            id,
            UpdateSubjectRequest {
                description: Some(Some("Algebra and geometry".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = delete_subject(&service, &request, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = delete_subject(&service, &request, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = SubjectService::with_storage(shared.clone());

        let err = create_subject(
            &service,
            &request,
            CreateSubjectRequest {
                name: "   ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
