use super::entities::CounselCategory;
use crate::models::common::{PaginationQuery, deserialize_nullable, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/counsel.ts")]
pub struct CounselListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub category: Option<CounselCategory>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/counsel.ts")]
pub struct CreateCounselRequest {
    pub student_id: i64,
    pub counsel_date: chrono::NaiveDate,
    pub category: CounselCategory,
    pub content: String,
    pub next_plan: Option<String>,
    pub next_counsel_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub is_shared: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/counsel.ts")]
pub struct UpdateCounselRequest {
    pub counsel_date: Option<chrono::NaiveDate>,
    pub category: Option<CounselCategory>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub next_plan: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub next_counsel_date: Option<Option<chrono::NaiveDate>>,
    pub is_shared: Option<bool>,
}

/// 咨询记录列表查询（存储层）
///
/// `viewer_teacher_id` 为 Some 时只返回共享记录与该教师本人撰写的记录。
#[derive(Debug, Clone, Default)]
pub struct CounselListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub category: Option<CounselCategory>,
    pub viewer_teacher_id: Option<i64>,
}

impl CounselListQuery {
    pub fn from_params(params: CounselListParams, viewer_teacher_id: Option<i64>) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            teacher_id: params.teacher_id,
            category: params.category,
            viewer_teacher_id,
        }
    }
}
