use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EvaluationMethodService, validate_weight_and_full_score};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluation_methods::{
        entities::{EvaluationScope, MethodWrite},
        requests::CreateEvaluationMethodRequest,
    },
};
use crate::services::score_summaries::{calculate, lock_scope};
use crate::utils::validate::{validate_grade, validate_school_year, validate_semester, validate_text};

pub async fn create_evaluation_method(
    service: &EvaluationMethodService,
    request: &HttpRequest,
    mut body: CreateEvaluationMethodRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    validate_school_year(body.year).map_err(SchoolSystemError::validation)?;
    validate_semester(body.semester).map_err(SchoolSystemError::validation)?;
    validate_grade(body.grade).map_err(SchoolSystemError::validation)?;
    validate_text("title", &body.title, 100).map_err(SchoolSystemError::validation)?;
    validate_weight_and_full_score(body.weight, body.full_score)
        .map_err(SchoolSystemError::validation)?;
    body.title = body.title.trim().to_string();

    if storage.get_subject_by_id(body.subject_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        )));
    }

    let scope = EvaluationScope {
        subject_id: body.subject_id,
        year: body.year,
        semester: body.semester,
        grade: body.grade,
    };
    let _guard = lock_scope(scope).await;

    // 权重上限在写入事务内校验
    match storage
        .create_evaluation_method(body, calculate::aggregate)
        .await
    {
        Ok(MethodWrite::Saved(method)) => {
            info!(
                "Evaluation method {} created for subject {}",
                method.id, method.subject_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                method,
                "Evaluation method created successfully",
            )))
        }
        Ok(MethodWrite::WeightExceeded) => Ok(weight_exceeded()),
        Ok(other) => Err(SchoolSystemError::database_operation(format!(
            "Unexpected outcome when creating evaluation method: {other:?}"
        ))
        .into()),
        Err(e) if e.is_unique_violation() => Ok(e.to_response_with(
            ErrorCode::EvaluationMethodAlreadyExists,
        )),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn weight_exceeded() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::EvaluationWeightExceeded,
        "Total weight of evaluation methods in this scope would exceed 100",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation_methods::entities::ExamType;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    fn new_method(subject_id: i64, title: &str, weight: f64) -> CreateEvaluationMethodRequest {
        CreateEvaluationMethodRequest {
            subject_id,
            year: 2025,
            semester: 1,
            grade: 3,
            exam_type: ExamType::Written,
            title: title.to_string(),
            weight,
            full_score: 100.0,
        }
    }

    #[tokio::test]
    async fn test_weight_sum_is_capped() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let request = request_as(admin(&shared).await);
        let service = EvaluationMethodService::with_storage(shared.clone());

        let resp = create_evaluation_method(&service, &request, new_method(subject.id, "Midterm", 60.0))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = create_evaluation_method(&service, &request, new_method(subject.id, "Final", 50.0))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::EvaluationWeightExceeded as i32);

        let resp = create_evaluation_method(&service, &request, new_method(subject.id, "Final", 40.0))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Korean").await;
        let request = request_as(admin(&shared).await);
        let service = EvaluationMethodService::with_storage(shared.clone());

        create_evaluation_method(&service, &request, new_method(subject.id, "Essay", 20.0))
            .await
            .unwrap();
        let resp = create_evaluation_method(&service, &request, new_method(subject.id, "Essay", 20.0))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::EvaluationMethodAlreadyExists as i32);
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let (_raw, shared) = storage().await;
        let request = request_as(admin(&shared).await);
        let service = EvaluationMethodService::with_storage(shared.clone());

        let resp = create_evaluation_method(&service, &request, new_method(99, "Quiz", 10.0))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
