use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScoreSummaryService;
use crate::models::{
    ApiResponse,
    score_summaries::requests::{ScoreSummaryListParams, ScoreSummaryListQuery},
};

pub async fn list_score_summaries(
    service: &ScoreSummaryService,
    request: &HttpRequest,
    query: ScoreSummaryListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_score_summaries_with_pagination(ScoreSummaryListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Score summaries retrieved successfully",
    )))
}
