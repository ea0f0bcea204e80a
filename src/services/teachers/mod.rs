pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(
    /// 教师档案管理
    TeacherService
);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request, query).await
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_teacher(self, request, id).await
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        body: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, request, body).await
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, request, id, body).await
    }

    pub async fn delete_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, request, id).await
    }
}

pub(crate) fn teacher_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::TeacherNotFound,
        "Teacher not found",
    ))
}

pub(crate) fn subject_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ))
}
