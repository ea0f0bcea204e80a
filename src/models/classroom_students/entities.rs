use crate::models::students::entities::Student;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级名单条目：班级与学生的关联，带班内学号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom_student.ts")]
pub struct ClassroomStudent {
    pub id: i64,
    pub classroom_id: i64,
    pub student_id: i64,
    // 班内学号
    pub number: i32,
    pub student: Student,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
