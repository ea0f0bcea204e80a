use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassroomService, classroom_not_found};
use crate::models::{
    ApiResponse,
    classrooms::requests::{ClassroomListParams, ClassroomListQuery},
};

pub async fn list_classrooms(
    service: &ClassroomService,
    request: &HttpRequest,
    query: ClassroomListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_classrooms_with_pagination(ClassroomListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Classrooms retrieved successfully",
    )))
}

pub async fn get_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_classroom_by_id(id).await? {
        Some(classroom) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            classroom,
            "Classroom retrieved successfully",
        ))),
        None => Ok(classroom_not_found()),
    }
}
