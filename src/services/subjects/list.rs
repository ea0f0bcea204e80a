use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, subject_not_found};
use crate::models::{
    ApiResponse,
    subjects::requests::{SubjectListParams, SubjectListQuery},
};

pub async fn list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
    query: SubjectListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage
        .list_subjects_with_pagination(SubjectListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Subjects retrieved successfully",
    )))
}

pub async fn get_subject(
    service: &SubjectService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_subject_by_id(id).await? {
        Some(subject) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject retrieved successfully",
        ))),
        None => Ok(subject_not_found()),
    }
}
