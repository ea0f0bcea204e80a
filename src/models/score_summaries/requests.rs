use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub struct ScoreSummaryListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub classroom_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub semester: Option<i32>,
}

// 手动重算某个汇总范围
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub struct RecalculateRequest {
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreSummaryListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

impl From<ScoreSummaryListParams> for ScoreSummaryListQuery {
    fn from(params: ScoreSummaryListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            classroom_id: params.classroom_id,
            subject_id: params.subject_id,
            year: params.year,
            semester: params.semester,
        }
    }
}
