use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, student_not_found};
use crate::errors::Result;
use crate::models::{
    ApiResponse, evaluation_methods::entities::EvaluationScope,
    score_summaries::requests::ScoreSummaryListQuery,
};
use crate::services::score_summaries::recalculate_scope;
use crate::storage::Storage;

/// 删除学生，名单、成绩与各类记录随之级联删除
///
/// 学生参与过排名的范围需要重算，其余学生的名次才会正确。
pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let scopes = scopes_of_student(&storage, id).await?;
    if !storage.delete_student(id).await? {
        return Ok(student_not_found());
    }
    for scope in scopes {
        recalculate_scope(&storage, scope).await?;
    }
    info!("Student {} deleted", id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
}

async fn scopes_of_student(storage: &Arc<dyn Storage>, student_id: i64) -> Result<HashSet<EvaluationScope>> {
    let mut scopes = HashSet::new();
    let mut page = 1;
    loop {
        let response = storage
            .list_score_summaries_with_pagination(ScoreSummaryListQuery {
                page,
                size: 100,
                student_id: Some(student_id),
                ..Default::default()
            })
            .await?;
        scopes.extend(response.items.iter().map(|s| EvaluationScope {
            subject_id: s.subject_id,
            year: s.year,
            semester: s.semester,
            grade: s.grade,
        }));
        if page as i64 >= response.pagination.total_pages {
            break;
        }
        page += 1;
    }
    Ok(scopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_delete_reranks_remaining_students() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let method = fixtures::method(&raw, subject.id, "Final", 100.0, 100.0).await;
        let top = fixtures::student(&raw, "S001").await;
        let second = fixtures::student(&raw, "S002").await;
        fixtures::scores(&raw, &method, &[(top.id, 95.0), (second.id, 80.0)]).await;

        let request = request_as(admin(&shared).await);
        let service = StudentService::with_storage(shared.clone());
        let resp = delete_student(&service, &request, top.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let remaining = shared
            .list_student_score_summaries(second.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(remaining[0].rank, 1);
        assert_eq!(remaining[0].student_count, 1);

        let resp = delete_student(&service, &request, top.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
