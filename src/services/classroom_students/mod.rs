//! 班级名单
//!
//! 修改名单的路由由 `RequireHomeroom` 中间件把关（管理员或班主任）。

pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classroom_students::requests::{
    AddClassroomStudentRequest, UpdateClassroomStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(ClassroomStudentService);

impl ClassroomStudentService {
    pub async fn list_classroom_students(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_classroom_students(self, request, classroom_id).await
    }

    pub async fn add_classroom_student(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        body: AddClassroomStudentRequest,
    ) -> ActixResult<HttpResponse> {
        manage::add_classroom_student(self, request, classroom_id, body).await
    }

    pub async fn update_classroom_student(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        student_id: i64,
        body: UpdateClassroomStudentRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_classroom_student(self, request, classroom_id, student_id, body).await
    }

    pub async fn remove_classroom_student(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::remove_classroom_student(self, request, classroom_id, student_id).await
    }
}

fn entry_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassroomStudentNotFound,
        "Student is not in this classroom",
    ))
}
