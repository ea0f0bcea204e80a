use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, student_not_found};
use crate::models::{
    ApiResponse,
    students::requests::{StudentListParams, StudentListQuery},
};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_students_with_pagination(StudentListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Students retrieved successfully",
    )))
}

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_student_by_id(id).await? {
        Some(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        None => Ok(student_not_found()),
    }
}
