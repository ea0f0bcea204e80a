pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classrooms::requests::{
    ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(
    /// 班级管理
    ClassroomService
);

impl ClassroomService {
    pub async fn list_classrooms(
        &self,
        request: &HttpRequest,
        query: ClassroomListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classrooms(self, request, query).await
    }

    pub async fn get_classroom(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_classroom(self, request, id).await
    }

    pub async fn create_classroom(
        &self,
        request: &HttpRequest,
        body: CreateClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_classroom(self, request, body).await
    }

    pub async fn update_classroom(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_classroom(self, request, id, body).await
    }

    pub async fn delete_classroom(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_classroom(self, request, id).await
    }
}

pub(crate) fn classroom_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassroomNotFound,
        "Classroom not found",
    ))
}
