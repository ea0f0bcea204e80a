use super::entities::Attendance;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<Attendance>,
    pub pagination: PaginationInfo,
}
