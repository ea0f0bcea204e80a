use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, student_conflict, validate_optional_phone};
use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, students::requests::CreateStudentRequest};
use crate::utils::validate::{validate_student_number, validate_text};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    mut body: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    validate_student_number(&body.student_number).map_err(SchoolSystemError::validation)?;
    validate_text("name", &body.name, 50).map_err(SchoolSystemError::validation)?;
    validate_optional_phone("phone", body.phone.as_ref())?;
    validate_optional_phone("guardian_phone", body.guardian_phone.as_ref())?;
    body.name = body.name.trim().to_string();

    let storage = service.get_storage(request)?;

    match storage.create_student(body).await {
        Ok(student) => {
            info!("Student {} ({}) created", student.student_number, student.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(student_conflict()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_create_student_and_duplicate_number() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = StudentService::with_storage(shared.clone());

        let mut body = fixtures::new_student("20250101", "Kim Minji");
        body.guardian_phone = Some("010-9876-5432".to_string());
        let resp = create_student(&service, &request, body).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = create_student(
            &service,
            &request,
            fixtures::new_student("20250101", "Lee Jiwoo"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::StudentAlreadyExists as i32);
    }

    #[tokio::test]
    async fn test_invalid_phone_rejected() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = StudentService::with_storage(shared.clone());

        let mut body = fixtures::new_student("20250102", "Choi Yuna");
        body.phone = Some("call me".to_string());
        let err = create_student(&service, &request, body).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
