use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ScoreSummaryService, calculate, lock_scope};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    evaluation_methods::entities::EvaluationScope,
    score_summaries::{
        entities::ScoreSummary, requests::RecalculateRequest, responses::RecalculateResponse,
    },
};
use crate::storage::Storage;
use crate::utils::validate::{validate_grade, validate_school_year, validate_semester};

/// 重算一个范围内的全部汇总并整体替换
///
/// 范围内没有任何成绩时清空该范围的汇总。成绩与评价方式的写入已在各自事务中
/// 刷新汇总，这里用于手动重算以及学生删除后的收尾。
pub async fn recalculate_scope(
    storage: &Arc<dyn Storage>,
    scope: EvaluationScope,
) -> Result<Vec<ScoreSummary>> {
    let _guard = lock_scope(scope).await;
    let summaries = storage.summarize_scope(scope, calculate::aggregate).await?;

    info!(
        "Recalculated score summaries for subject {} {}-{} grade {}: {} students",
        scope.subject_id,
        scope.year,
        scope.semester,
        scope.grade,
        summaries.len()
    );
    Ok(summaries)
}

pub async fn handle_recalculate(
    service: &ScoreSummaryService,
    request: &HttpRequest,
    body: RecalculateRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    validate_school_year(body.year).map_err(SchoolSystemError::validation)?;
    validate_semester(body.semester).map_err(SchoolSystemError::validation)?;
    validate_grade(body.grade).map_err(SchoolSystemError::validation)?;

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
    let items = recalculate_scope(&storage, scope).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RecalculateResponse {
            student_count: items.len() as i32,
            items,
        },
        "Score summaries recalculated",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_recalculate_replaces_scope() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let written = fixtures::method(&raw, subject.id, "Midterm", 60.0, 100.0).await;
        let first = fixtures::student(&raw, "S001").await;
        let second = fixtures::student(&raw, "S002").await;

        fixtures::scores(&raw, &written, &[(first.id, 90.0), (second.id, 50.0)]).await;

        let summaries = recalculate_scope(&shared, written.scope()).await.unwrap();
        assert_eq!(summaries.len(), 2);
        let top = summaries.iter().find(|s| s.student_id == first.id).unwrap();
        assert_eq!(top.total_score, 54.0);
        assert_eq!(top.rank, 1);
        assert_eq!(top.student_count, 2);

        // 删除评价方式后范围为空，汇总被清空
        shared
            .delete_evaluation_method(written.id, calculate::aggregate)
            .await
            .unwrap();
        let summaries = recalculate_scope(&shared, written.scope()).await.unwrap();
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_handle_recalculate_validates_input() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Science").await;
        let request = request_as(admin(&shared).await);
        let service = ScoreSummaryService::with_storage(shared.clone());

        let err = handle_recalculate(
            &service,
            &request,
            RecalculateRequest {
                subject_id: subject.id,
                year: 2025,
                semester: 3,
                grade: 3,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);

        let resp = handle_recalculate(
            &service,
            &request,
            RecalculateRequest {
                subject_id: subject.id + 100,
                year: 2025,
                semester: 1,
                grade: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::SubjectNotFound as i32);

        let resp = handle_recalculate(
            &service,
            &request,
            RecalculateRequest {
                subject_id: subject.id,
                year: 2025,
                semester: 1,
                grade: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["student_count"], 0);
    }
}
