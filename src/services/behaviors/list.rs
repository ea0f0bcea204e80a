use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BehaviorService, behavior_not_found};
use crate::models::{
    ApiResponse,
    behaviors::requests::{BehaviorListParams, BehaviorListQuery},
};

pub async fn list_behaviors(
    service: &BehaviorService,
    request: &HttpRequest,
    query: BehaviorListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_behaviors_with_pagination(BehaviorListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Behavior records retrieved successfully",
    )))
}

pub async fn get_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_behavior_by_id(id).await? {
        Some(behavior) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            behavior,
            "Behavior record retrieved successfully",
        ))),
        None => Ok(behavior_not_found()),
    }
}
