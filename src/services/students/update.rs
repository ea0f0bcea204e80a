use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, student_conflict, student_not_found, validate_optional_phone};
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, students::requests::UpdateStudentRequest};
use crate::utils::validate::{validate_student_number, validate_text};

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(number) = &body.student_number {
        validate_student_number(number).map_err(SchoolSystemError::validation)?;
    }
    if let Some(name) = body.name.as_mut() {
        validate_text("name", name, 50).map_err(SchoolSystemError::validation)?;
        *name = name.trim().to_string();
    }
    validate_optional_phone("phone", body.phone.as_ref().and_then(|p| p.as_ref()))?;
    validate_optional_phone(
        "guardian_phone",
        body.guardian_phone.as_ref().and_then(|p| p.as_ref()),
    )?;

    let storage = service.get_storage(request)?;

    match storage.update_student(id, body).await {
        Ok(Some(student)) => {
            info!("Student {} updated", student.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(student_not_found()),
        Err(e) if e.is_unique_violation() => Ok(student_conflict()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_update_clears_optional_field() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let request = request_as(admin(&shared).await);
        let service = StudentService::with_storage(shared.clone());

        let resp = update_student(
            &service,
            &request,
            student.id,
            UpdateStudentRequest {
                address: Some(Some("Seoul".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["address"], "Seoul");

        let resp = update_student(
            &service,
            &request,
            student.id,
            UpdateStudentRequest {
                address: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert!(body["data"]["address"].is_null());

        let resp = update_student(&service, &request, student.id + 50, UpdateStudentRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
