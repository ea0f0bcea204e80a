use super::entities::ClassroomStudent;
use serde::Serialize;
use ts_rs::TS;

// 班级名单（按班内学号排序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/classroom_student.ts")]
pub struct ClassroomStudentListResponse {
    pub classroom_id: i64,
    pub items: Vec<ClassroomStudent>,
}
