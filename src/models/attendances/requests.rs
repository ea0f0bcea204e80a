use super::entities::{AttendanceReason, AttendanceType};
use crate::models::common::{PaginationQuery, deserialize_nullable, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub classroom_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub from: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub to: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceSummaryParams {
    pub student_id: i64,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct CreateAttendanceRequest {
    pub student_id: i64,
    pub date: chrono::NaiveDate,
    pub attendance_type: AttendanceType,
    pub reason: AttendanceReason,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub date: Option<chrono::NaiveDate>,
    pub attendance_type: Option<AttendanceType>,
    pub reason: Option<AttendanceReason>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub note: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

impl From<AttendanceListParams> for AttendanceListQuery {
    fn from(params: AttendanceListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            classroom_id: params.classroom_id,
            from: params.from,
            to: params.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[test]
    fn test_list_params_parse_dates() {
        let params = Query::<AttendanceListParams>::from_query(
            "student_id=4&from=2025-03-01&to=2025-03-31",
        )
        .unwrap()
        .into_inner();
        assert_eq!(params.student_id, Some(4));
        assert_eq!(params.from, chrono::NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(params.to, chrono::NaiveDate::from_ymd_opt(2025, 3, 31));
    }

    #[test]
    fn test_list_params_reject_bad_date() {
        assert!(Query::<AttendanceListParams>::from_query("from=2025-13-01").is_err());
    }
}
