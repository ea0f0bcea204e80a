use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, attendance_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    attendances::requests::{CreateAttendanceRequest, UpdateAttendanceRequest},
};
use crate::services::current_user;
use crate::services::students::student_not_found;
use crate::utils::validate::validate_text;

const NOTE_MAX_CHARS: usize = 500;

fn already_recorded() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::AttendanceAlreadyRecorded,
        "Attendance already recorded for this student on this date",
    ))
}

pub async fn create_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: CreateAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if let Some(note) = &body.note {
        validate_text("note", note, NOTE_MAX_CHARS).map_err(SchoolSystemError::validation)?;
    }

    let storage = service.get_storage(request)?;

    if storage.get_student_by_id(body.student_id).await?.is_none() {
        return Ok(student_not_found());
    }

    match storage.create_attendance(body, user.id).await {
        Ok(record) => {
            info!(
                "Attendance {} recorded for student {} on {}",
                record.attendance_type, record.student_id, record.date
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                record,
                "Attendance recorded successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(already_recorded()),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
    body: UpdateAttendanceRequest,
) -> ActixResult<HttpResponse> {
    if let Some(Some(note)) = &body.note {
        validate_text("note", note, NOTE_MAX_CHARS).map_err(SchoolSystemError::validation)?;
    }

    let storage = service.get_storage(request)?;

    match storage.update_attendance(id, body).await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Attendance updated successfully",
        ))),
        Ok(None) => Ok(attendance_not_found()),
        Err(e) if e.is_unique_violation() => Ok(already_recorded()),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_attendance(id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Attendance deleted successfully",
        )))
    } else {
        Ok(attendance_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendances::entities::{AttendanceReason, AttendanceType};
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    fn new_record(student_id: i64, day: u32) -> CreateAttendanceRequest {
        CreateAttendanceRequest {
            student_id,
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            attendance_type: AttendanceType::Tardy,
            reason: AttendanceReason::Illness,
            note: Some("Hospital visit".to_string()),
        }
    }

    #[tokio::test]
    async fn test_one_record_per_day() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let me = admin(&shared).await;
        let request = request_as(me.clone());
        let service = AttendanceService::with_storage(shared.clone());

        let resp = create_attendance(&service, &request, new_record(student.id, 7))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["recorded_by"], me.id);
        assert_eq!(body["data"]["date"], "2025-04-07");

        let resp = create_attendance(&service, &request, new_record(student.id, 7))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::AttendanceAlreadyRecorded as i32);
    }

    #[tokio::test]
    async fn test_unknown_student_and_update() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S002").await;
        let request = request_as(admin(&shared).await);
        let service = AttendanceService::with_storage(shared.clone());

        let resp = create_attendance(&service, &request, new_record(student.id + 9, 1))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = create_attendance(&service, &request, new_record(student.id, 2))
            .await
            .unwrap();
        let id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = update_attendance(
            &service,
            &request,
            id,
            UpdateAttendanceRequest {
                attendance_type: Some(AttendanceType::Absence),
                note: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["attendance_type"], "absence");
        assert!(body["data"]["note"].is_null());

        let resp = delete_attendance(&service, &request, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = delete_attendance(&service, &request, id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
