pub mod list;
pub mod manage;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendances::requests::{
    AttendanceListParams, AttendanceSummaryParams, CreateAttendanceRequest,
    UpdateAttendanceRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(
    /// 出勤记录
    AttendanceService
);

impl AttendanceService {
    pub async fn list_attendances(
        &self,
        request: &HttpRequest,
        query: AttendanceListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_attendances(self, request, query).await
    }

    pub async fn get_attendance(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_attendance(self, request, id).await
    }

    pub async fn create_attendance(
        &self,
        request: &HttpRequest,
        body: CreateAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_attendance(self, request, body).await
    }

    pub async fn update_attendance(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_attendance(self, request, id, body).await
    }

    pub async fn delete_attendance(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_attendance(self, request, id).await
    }

    pub async fn attendance_summary(
        &self,
        request: &HttpRequest,
        query: AttendanceSummaryParams,
    ) -> ActixResult<HttpResponse> {
        summary::attendance_summary(self, request, query).await
    }
}

fn attendance_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AttendanceNotFound,
        "Attendance record not found",
    ))
}
