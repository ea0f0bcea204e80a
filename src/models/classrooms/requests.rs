use crate::models::common::{PaginationQuery, deserialize_nullable, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom.ts")]
pub struct ClassroomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub grade: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom.ts")]
pub struct CreateClassroomRequest {
    pub year: i32,
    pub grade: i32,
    pub class_number: i32,
    pub homeroom_teacher_id: Option<i64>,
}

// 更新班级请求，homeroom_teacher_id 传 null 表示撤销班主任
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/classroom.ts")]
pub struct UpdateClassroomRequest {
    pub year: Option<i32>,
    pub grade: Option<i32>,
    pub class_number: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub homeroom_teacher_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassroomListQuery {
    pub page: u64,
    pub size: u64,
    pub year: Option<i32>,
    pub grade: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
}

impl From<ClassroomListParams> for ClassroomListQuery {
    fn from(params: ClassroomListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            year: params.year,
            grade: params.grade,
            homeroom_teacher_id: params.homeroom_teacher_id,
        }
    }
}
