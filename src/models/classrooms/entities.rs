use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom.ts")]
pub struct Classroom {
    // 班级ID
    pub id: i64,
    // 学年
    pub year: i32,
    // 年级 1..=6
    pub grade: i32,
    // 班号
    pub class_number: i32,
    // 班主任（教师档案ID）
    pub homeroom_teacher_id: Option<i64>,
    // 在册学生数
    pub student_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
