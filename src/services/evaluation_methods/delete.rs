use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationMethodService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::score_summaries::{calculate, lock_scope};

pub async fn delete_evaluation_method(
    service: &EvaluationMethodService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(method) = storage.get_evaluation_method_by_id(id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationMethodNotFound,
            "Evaluation method not found",
        )));
    };

    // 成绩随评价方式一并删除，同一事务内重新汇总剩余方式
    let _guard = lock_scope(method.scope()).await;
    if !storage
        .delete_evaluation_method(id, calculate::aggregate)
        .await?
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationMethodNotFound,
            "Evaluation method not found",
        )));
    }
    info!("Evaluation method {} deleted", id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Evaluation method deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_delete_clears_scope_summaries() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Art").await;
        let method = fixtures::method(&raw, subject.id, "Portfolio", 100.0, 100.0).await;
        let student = fixtures::student(&raw, "S010").await;
        fixtures::scores(&raw, &method, &[(student.id, 95.0)]).await;

        let request = request_as(admin(&shared).await);
        let service = EvaluationMethodService::with_storage(shared.clone());
        let resp = delete_evaluation_method(&service, &request, method.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let summaries = shared
            .list_student_score_summaries(student.id, 2025, 1)
            .await
            .unwrap();
        assert!(summaries.is_empty());

        let resp = delete_evaluation_method(&service, &request, method.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
