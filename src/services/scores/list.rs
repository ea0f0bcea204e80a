use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScoreService;
use crate::models::{
    ApiResponse,
    scores::requests::{ScoreListParams, ScoreListQuery},
};

pub async fn list_scores(
    service: &ScoreService,
    request: &HttpRequest,
    query: ScoreListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_scores_with_pagination(ScoreListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Scores retrieved successfully",
    )))
}
