pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::{Result, SchoolSystemError};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_phone;

crate::services::define_service!(
    /// 学生档案管理
    StudentService
);

impl StudentService {
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn get_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_student(self, request, id).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        body: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, body).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, id, body).await
    }

    pub async fn delete_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, id).await
    }
}

// 可选电话字段
fn validate_optional_phone(field: &str, phone: Option<&String>) -> Result<()> {
    match phone {
        Some(phone) => validate_phone(phone)
            .map_err(|msg| SchoolSystemError::validation(format!("{field}: {msg}"))),
        None => Ok(()),
    }
}

pub(crate) fn student_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StudentNotFound,
        "Student not found",
    ))
}

pub(crate) fn student_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::StudentAlreadyExists,
        "Student number already exists",
    ))
}
