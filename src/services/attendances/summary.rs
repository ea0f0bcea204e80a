use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse,
    attendances::{entities::AttendanceSummary, requests::AttendanceSummaryParams},
};
use crate::services::students::student_not_found;
use crate::utils::validate::validate_date_range;

/// 学生在区间内按类型、事由统计的出勤次数
pub async fn attendance_summary(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceSummaryParams,
) -> ActixResult<HttpResponse> {
    validate_date_range(query.from, query.to).map_err(SchoolSystemError::validation)?;

    let storage = service.get_storage(request)?;

    if storage.get_student_by_id(query.student_id).await?.is_none() {
        return Ok(student_not_found());
    }
    let records = storage
        .list_student_attendances(query.student_id, query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSummary::tally(query.student_id, query.from, query.to, &records),
        "Attendance summary retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendances::{
        entities::{AttendanceReason, AttendanceType},
        requests::CreateAttendanceRequest,
    };
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_summary_counts_within_range() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let me = admin(&shared).await;
        for (day, attendance_type, reason) in [
            (3, AttendanceType::Absence, AttendanceReason::Illness),
            (10, AttendanceType::Tardy, AttendanceReason::Unauthorized),
            (20, AttendanceType::Absence, AttendanceReason::Authorized),
        ] {
            shared
                .create_attendance(
                    CreateAttendanceRequest {
                        student_id: student.id,
                        date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
                        attendance_type,
                        reason,
                        note: None,
                    },
                    me.id,
                )
                .await
                .unwrap();
        }

        let request = request_as(me);
        let service = AttendanceService::with_storage(shared.clone());
        let resp = attendance_summary(
            &service,
            &request,
            AttendanceSummaryParams {
                student_id: student.id,
                from: NaiveDate::from_ymd_opt(2025, 5, 1),
                to: NaiveDate::from_ymd_opt(2025, 5, 10),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["by_type"]["absence"], 1);
        assert_eq!(body["data"]["by_type"]["tardy"], 1);
        assert_eq!(body["data"]["by_reason"]["unauthorized"], 1);
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S002").await;
        let request = request_as(admin(&shared).await);
        let service = AttendanceService::with_storage(shared.clone());

        let err = attendance_summary(
            &service,
            &request,
            AttendanceSummaryParams {
                student_id: student.id,
                from: NaiveDate::from_ymd_opt(2025, 6, 1),
                to: NaiveDate::from_ymd_opt(2025, 5, 1),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
