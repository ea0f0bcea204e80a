//! 科目管理，查询对所有教职工开放，修改仅限管理员

pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(SubjectService);

impl SubjectService {
    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        query: SubjectListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, request, query).await
    }

    pub async fn get_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_subject(self, request, id).await
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        body: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_subject(self, request, body).await
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_subject(self, request, id, body).await
    }

    pub async fn delete_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        manage::delete_subject(self, request, id).await
    }
}

fn subject_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ))
}

fn subject_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubjectAlreadyExists,
        "Subject name already exists",
    ))
}
