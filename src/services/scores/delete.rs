use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScoreService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::score_summaries::{calculate, lock_scope};

pub async fn delete_score(
    service: &ScoreService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(score) = storage.get_score_by_id(id).await? else {
        return Ok(not_found());
    };
    let method = storage
        .get_evaluation_method_by_id(score.evaluation_method_id)
        .await?;

    // 成绩删除与汇总刷新在同一事务中完成
    let _guard = match method {
        Some(method) => Some(lock_scope(method.scope()).await),
        None => None,
    };
    if !storage.delete_score(id, calculate::aggregate).await? {
        return Ok(not_found());
    }
    info!("Score {} deleted", id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Score deleted successfully")))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ScoreNotFound,
        "Score not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_delete_drops_student_from_cohort() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let method = fixtures::method(&raw, subject.id, "Midterm", 100.0, 100.0).await;
        let first = fixtures::student(&raw, "S001").await;
        let second = fixtures::student(&raw, "S002").await;
        let saved = fixtures::scores(&raw, &method, &[(first.id, 70.0), (second.id, 90.0)]).await;

        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());
        let second_score = saved.iter().find(|s| s.student_id == second.id).unwrap();
        let resp = delete_score(&service, &request, second_score.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        assert!(
            shared
                .list_student_score_summaries(second.id, 2025, 1)
                .await
                .unwrap()
                .is_empty()
        );
        let remaining = shared
            .list_student_score_summaries(first.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(remaining[0].rank, 1);
        assert_eq!(remaining[0].student_count, 1);
    }
}
