use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/behavior.ts")]
pub struct BehaviorListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub semester: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/behavior.ts")]
pub struct CreateBehaviorRequest {
    pub student_id: i64,
    pub year: i32,
    pub semester: i32,
    pub content: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/behavior.ts")]
pub struct UpdateBehaviorRequest {
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BehaviorListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

impl From<BehaviorListParams> for BehaviorListQuery {
    fn from(params: BehaviorListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            year: params.year,
            semester: params.semester,
        }
    }
}
