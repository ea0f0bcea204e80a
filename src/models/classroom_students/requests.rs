use serde::Deserialize;
use ts_rs::TS;

// 加入班级名单；number 缺省时取当前最大值 + 1
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom_student.ts")]
pub struct AddClassroomStudentRequest {
    pub student_id: i64,
    pub number: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom_student.ts")]
pub struct UpdateClassroomStudentRequest {
    pub number: i32,
}
