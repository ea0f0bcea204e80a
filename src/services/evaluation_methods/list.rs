use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationMethodService;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluation_methods::requests::{EvaluationMethodListParams, EvaluationMethodListQuery},
};

pub async fn list_evaluation_methods(
    service: &EvaluationMethodService,
    request: &HttpRequest,
    query: EvaluationMethodListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_evaluation_methods_with_pagination(EvaluationMethodListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Evaluation methods retrieved successfully",
    )))
}

pub async fn get_evaluation_method(
    service: &EvaluationMethodService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_evaluation_method_by_id(id).await? {
        Some(method) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            method,
            "Evaluation method retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationMethodNotFound,
            "Evaluation method not found",
        ))),
    }
}
