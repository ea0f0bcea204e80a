use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct ScoreListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub evaluation_method_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub classroom_id: Option<i64>,
}

// 录入或覆盖一条成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct UpsertScoreRequest {
    pub student_id: i64,
    pub evaluation_method_id: i64,
    pub raw_score: f64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct BatchScoreEntry {
    pub student_id: i64,
    pub raw_score: f64,
}

// 批量录入：同一评价方式下的多名学生，全部校验通过才写入
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct BatchScoreRequest {
    pub evaluation_method_id: i64,
    pub entries: Vec<BatchScoreEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreListQuery {
    pub page: u64,
    pub size: u64,
    pub student_id: Option<i64>,
    pub evaluation_method_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

impl From<ScoreListParams> for ScoreListQuery {
    fn from(params: ScoreListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            student_id: params.student_id,
            evaluation_method_id: params.evaluation_method_id,
            classroom_id: params.classroom_id,
        }
    }
}
