use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CounselService, Viewer, counsel_not_found};
use crate::models::{
    ApiResponse,
    counsels::requests::{CounselListParams, CounselListQuery},
};
use crate::services::current_user;

pub async fn list_counsels(
    service: &CounselService,
    request: &HttpRequest,
    query: CounselListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let viewer = Viewer::resolve(&storage, &user).await?;

    let response = storage
        .list_counsels_with_pagination(CounselListQuery::from_params(
            query,
            viewer.visibility_filter(),
        ))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Counsel records retrieved successfully",
    )))
}

pub async fn get_counsel(
    service: &CounselService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let viewer = Viewer::resolve(&storage, &user).await?;

    // 不可见的私密记录按不存在处理
    match storage.get_counsel_by_id(id).await? {
        Some(counsel) if viewer.can_view(&counsel) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(counsel, "Counsel record retrieved successfully"),
        )),
        _ => Ok(counsel_not_found()),
    }
}
