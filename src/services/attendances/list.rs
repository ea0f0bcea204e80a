use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, attendance_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse,
    attendances::requests::{AttendanceListParams, AttendanceListQuery},
};
use crate::utils::validate::validate_date_range;

pub async fn list_attendances(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceListParams,
) -> ActixResult<HttpResponse> {
    validate_date_range(query.from, query.to).map_err(SchoolSystemError::validation)?;

    let storage = service.get_storage(request)?;

    let response = storage
        .list_attendances_with_pagination(AttendanceListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Attendance records retrieved successfully",
    )))
}

pub async fn get_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_attendance_by_id(id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Attendance record retrieved successfully",
        ))),
        None => Ok(attendance_not_found()),
    }
}
