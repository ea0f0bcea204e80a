use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::create::weight_exceeded;
use super::{EvaluationMethodService, validate_weight_and_full_score};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluation_methods::{entities::MethodWrite, requests::UpdateEvaluationMethodRequest},
};
use crate::services::score_summaries::{calculate, lock_scope};
use crate::utils::validate::validate_text;

pub async fn update_evaluation_method(
    service: &EvaluationMethodService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateEvaluationMethodRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_evaluation_method_by_id(id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationMethodNotFound,
            "Evaluation method not found",
        )));
    };

    if let Some(title) = body.title.as_mut() {
        validate_text("title", title, 100).map_err(SchoolSystemError::validation)?;
        *title = title.trim().to_string();
    }
    let weight = body.weight.unwrap_or(existing.weight);
    let full_score = body.full_score.unwrap_or(existing.full_score);
    validate_weight_and_full_score(weight, full_score).map_err(SchoolSystemError::validation)?;

    let rescaled = weight != existing.weight || full_score != existing.full_score;
    let _guard = lock_scope(existing.scope()).await;

    // 权重上限、满分缩小后的分数区间、折算分与汇总刷新都在同一事务内完成
    let updated = match storage
        .update_evaluation_method(id, body, calculate::aggregate)
        .await
    {
        Ok(MethodWrite::Saved(method)) => method,
        Ok(MethodWrite::NotFound) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationMethodNotFound,
                "Evaluation method not found",
            )));
        }
        Ok(MethodWrite::WeightExceeded) => return Ok(weight_exceeded()),
        Ok(MethodWrite::ScoreAboveFullScore {
            student_id,
            raw_score,
        }) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ScoreOutOfRange,
                format!(
                    "Student {student_id} has raw score {raw_score} above the new full score {full_score}"
                ),
            )));
        }
        Err(e) if e.is_unique_violation() => {
            return Ok(e.to_response_with(ErrorCode::EvaluationMethodAlreadyExists));
        }
        Err(e) => return Err(e.into()),
    };

    if rescaled {
        info!("Evaluation method {} rescaled, summaries refreshed", id);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Evaluation method updated successfully",
    )))
}
