use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScoreService;
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluation_methods::entities::EvaluationMethod,
    scores::{
        entities::{Score, ScoreWrite},
        requests::{BatchScoreEntry, BatchScoreRequest, UpsertScoreRequest},
        responses::BatchScoreResponse,
    },
};
use crate::services::score_summaries::{calculate, lock_scope};
use crate::storage::Storage;

// 单次批量录入上限
const MAX_BATCH_ENTRIES: usize = 1000;

pub async fn upsert_score(
    service: &ScoreService,
    request: &HttpRequest,
    body: UpsertScoreRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(method) = storage
        .get_evaluation_method_by_id(body.evaluation_method_id)
        .await?
    else {
        return Ok(method_not_found());
    };

    let entries = [BatchScoreEntry {
        student_id: body.student_id,
        raw_score: body.raw_score,
    }];
    if let Err(resp) = check_students(&storage, &entries).await? {
        return Ok(resp);
    }

    let pairs = [(body.student_id, body.raw_score)];
    let mut saved = match save_scores(&storage, &method, &pairs).await? {
        Ok(saved) => saved,
        Err(resp) => return Ok(resp),
    };

    let Some(score) = saved.pop() else {
        return Err(SchoolSystemError::database_operation("Score was not saved").into());
    };
    info!(
        "Score saved for student {} on method {}",
        score.student_id, score.evaluation_method_id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(score, "Score saved successfully")))
}

/// 批量录入：全部条目校验通过后在一个事务中写入
pub async fn batch_upsert_scores(
    service: &ScoreService,
    request: &HttpRequest,
    body: BatchScoreRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if body.entries.is_empty() {
        return Err(SchoolSystemError::validation("Entries must not be empty").into());
    }
    if body.entries.len() > MAX_BATCH_ENTRIES {
        return Err(SchoolSystemError::validation(format!(
            "At most {MAX_BATCH_ENTRIES} entries per batch"
        ))
        .into());
    }
    let mut seen = HashSet::new();
    if let Some(dup) = body.entries.iter().find(|e| !seen.insert(e.student_id)) {
        return Err(SchoolSystemError::validation(format!(
            "Duplicate student_id {} in batch",
            dup.student_id
        ))
        .into());
    }

    let Some(method) = storage
        .get_evaluation_method_by_id(body.evaluation_method_id)
        .await?
    else {
        return Ok(method_not_found());
    };

    if let Err(resp) = check_students(&storage, &body.entries).await? {
        return Ok(resp);
    }

    let pairs: Vec<(i64, f64)> = body
        .entries
        .iter()
        .map(|e| (e.student_id, e.raw_score))
        .collect();
    let items = match save_scores(&storage, &method, &pairs).await? {
        Ok(items) => items,
        Err(resp) => return Ok(resp),
    };

    info!(
        "Batch saved {} scores on method {}",
        items.len(),
        method.id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BatchScoreResponse {
            evaluation_method_id: method.id,
            items,
        },
        "Scores saved successfully",
    )))
}

fn method_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::EvaluationMethodNotFound,
        "Evaluation method not found",
    ))
}

/// 校验学生存在性
async fn check_students(
    storage: &Arc<dyn Storage>,
    entries: &[BatchScoreEntry],
) -> crate::errors::Result<Result<(), HttpResponse>> {
    for entry in entries {
        if storage.get_student_by_id(entry.student_id).await?.is_none() {
            return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                format!("Student {} not found", entry.student_id),
            ))));
        }
    }
    Ok(Ok(()))
}

/// 在范围写锁内写入成绩并刷新汇总
///
/// 分数区间按事务内读到的评价方式校验，被拒绝时返回对应响应。
async fn save_scores(
    storage: &Arc<dyn Storage>,
    method: &EvaluationMethod,
    pairs: &[(i64, f64)],
) -> crate::errors::Result<Result<Vec<Score>, HttpResponse>> {
    let _guard = lock_scope(method.scope()).await;

    match storage
        .save_scores(method.id, pairs, calculate::aggregate)
        .await?
    {
        ScoreWrite::Saved(scores) => Ok(Ok(scores)),
        ScoreWrite::MethodNotFound => Ok(Err(method_not_found())),
        ScoreWrite::OutOfRange {
            student_id,
            raw_score,
            full_score,
        } => Ok(Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScoreOutOfRange,
            format!(
                "Score {raw_score} for student {student_id} must be between 0 and {full_score}"
            ),
        )))),
        ScoreWrite::GradeConflict { student_id, grade } => {
            Ok(Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ScoreGradeConflict,
                format!(
                    "Student {student_id} already has grade {grade} scores for this subject and term"
                ),
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scores::requests::ScoreListQuery;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_upsert_recalculates_summary() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let method = fixtures::method(&raw, subject.id, "Midterm", 40.0, 50.0).await;
        let student = fixtures::student(&raw, "S001").await;
        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());

        let resp = upsert_score(
            &service,
            &request,
            UpsertScoreRequest {
                student_id: student.id,
                evaluation_method_id: method.id,
                raw_score: 45.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["weighted_score"], 36.0);

        let summaries = shared
            .list_student_score_summaries(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries[0].total_score, 36.0);
        assert_eq!(summaries[0].rank, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_score_rejected() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let method = fixtures::method(&raw, subject.id, "Quiz", 10.0, 20.0).await;
        let student = fixtures::student(&raw, "S002").await;
        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());

        let resp = upsert_score(
            &service,
            &request,
            UpsertScoreRequest {
                student_id: student.id,
                evaluation_method_id: method.id,
                raw_score: 20.5,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::ScoreOutOfRange as i32);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Science").await;
        let method = fixtures::method(&raw, subject.id, "Lab", 30.0, 100.0).await;
        let first = fixtures::student(&raw, "S003").await;
        let second = fixtures::student(&raw, "S004").await;
        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());

        let resp = batch_upsert_scores(
            &service,
            &request,
            BatchScoreRequest {
                evaluation_method_id: method.id,
                entries: vec![
                    BatchScoreEntry {
                        student_id: first.id,
                        raw_score: 90.0,
                    },
                    BatchScoreEntry {
                        student_id: second.id,
                        raw_score: 120.0,
                    },
                ],
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let listed = shared
            .list_scores_with_pagination(ScoreListQuery {
                page: 1,
                size: 10,
                evaluation_method_id: Some(method.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 0);

        let resp = batch_upsert_scores(
            &service,
            &request,
            BatchScoreRequest {
                evaluation_method_id: method.id,
                entries: vec![
                    BatchScoreEntry {
                        student_id: first.id,
                        raw_score: 90.0,
                    },
                    BatchScoreEntry {
                        student_id: second.id,
                        raw_score: 60.0,
                    },
                ],
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

        let summaries = shared
            .list_student_score_summaries(second.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries[0].rank, 2);
    }

    #[tokio::test]
    async fn test_score_in_second_grade_conflicts() {
        use crate::models::evaluation_methods::{
            entities::{ExamType, MethodWrite},
            requests::CreateEvaluationMethodRequest,
        };

        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "Math").await;
        let third = fixtures::method(&raw, subject.id, "Midterm", 50.0, 100.0).await;
        let MethodWrite::Saved(fourth) = shared
            .create_evaluation_method(
                CreateEvaluationMethodRequest {
                    subject_id: subject.id,
                    year: 2025,
                    semester: 1,
                    grade: 4,
                    exam_type: ExamType::Written,
                    title: "Midterm".to_string(),
                    weight: 50.0,
                    full_score: 100.0,
                },
                calculate::aggregate,
            )
            .await
            .unwrap()
        else {
            panic!("grade 4 method not created");
        };
        let student = fixtures::student(&raw, "S006").await;
        fixtures::scores(&raw, &third, &[(student.id, 80.0)]).await;
        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());

        let resp = upsert_score(
            &service,
            &request,
            UpsertScoreRequest {
                student_id: student.id,
                evaluation_method_id: fourth.id,
                raw_score: 70.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::ScoreGradeConflict as i32);

        let summaries = shared
            .list_student_score_summaries(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].grade, 3);
        assert_eq!(summaries[0].total_score, 40.0);
    }

    #[tokio::test]
    async fn test_batch_rejects_duplicates() {
        let (raw, shared) = storage().await;
        let subject = fixtures::subject(&raw, "History").await;
        let method = fixtures::method(&raw, subject.id, "Report", 30.0, 100.0).await;
        let student = fixtures::student(&raw, "S005").await;
        let request = request_as(admin(&shared).await);
        let service = ScoreService::with_storage(shared.clone());

        let entry = BatchScoreEntry {
            student_id: student.id,
            raw_score: 50.0,
        };
        let err = batch_upsert_scores(
            &service,
            &request,
            BatchScoreRequest {
                evaluation_method_id: method.id,
                entries: vec![entry.clone(), entry],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
