use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, teacher_not_found};
use crate::models::{
    ApiResponse,
    teachers::requests::{TeacherListParams, TeacherListQuery},
};

pub async fn list_teachers(
    service: &TeacherService,
    request: &HttpRequest,
    query: TeacherListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_teachers_with_pagination(TeacherListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Teachers retrieved successfully",
    )))
}

pub async fn get_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_teacher_by_id(id).await? {
        Some(teacher) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teacher,
            "Teacher retrieved successfully",
        ))),
        None => Ok(teacher_not_found()),
    }
}
